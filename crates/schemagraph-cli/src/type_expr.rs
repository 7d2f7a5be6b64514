//! Type expression parsing
//!
//! Field types and alias targets in the manifest are written as Rust type
//! syntax and parsed with `syn`. Standard containers map onto the
//! declaration model: sequences become arrays, `Option`/`Box`/references are
//! indirection, and maps, channels, functions, and trait objects are kept as
//! the unsupported forms the resolver reports.

use anyhow::{Context, Result};
use schemagraph_core::{ScalarKind, TypeExpr};
use syn::{GenericArgument, PathArguments, PathSegment, Type, TypeParamBound};

/// Parse a type expression written in the package `package`.
///
/// Unqualified names refer to types in the same package.
pub fn parse_type_expr(text: &str, package: &str) -> Result<TypeExpr> {
    let ty: Type =
        syn::parse_str(text).with_context(|| format!("Invalid type expression `{}`", text))?;
    convert(&ty, package)
}

fn convert(ty: &Type, package: &str) -> Result<TypeExpr> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => {
            convert_path(&type_path.path, package)
        }
        Type::Reference(reference) => Ok(TypeExpr::pointer(convert(&reference.elem, package)?)),
        Type::Ptr(pointer) => Ok(TypeExpr::pointer(convert(&pointer.elem, package)?)),
        Type::Paren(paren) => Ok(TypeExpr::Group(Box::new(convert(&paren.elem, package)?))),
        Type::Group(group) => Ok(TypeExpr::Group(Box::new(convert(&group.elem, package)?))),
        Type::Slice(slice) => Ok(TypeExpr::array(convert(&slice.elem, package)?)),
        Type::Array(array) => Ok(TypeExpr::array(convert(&array.elem, package)?)),
        Type::BareFn(_) => Ok(TypeExpr::Func),
        Type::TraitObject(object) => Ok(TypeExpr::Interface {
            name: trait_name(object.bounds.iter()),
        }),
        Type::ImplTrait(bounds) => Ok(TypeExpr::Interface {
            name: trait_name(bounds.bounds.iter()),
        }),
        _ => anyhow::bail!("Unsupported type expression: {}", quote::quote!(#ty)),
    }
}

fn convert_path(path: &syn::Path, package: &str) -> Result<TypeExpr> {
    let segment = path
        .segments
        .last()
        .context("Type path has no segments")?;
    let ident = segment.ident.to_string();

    if path.segments.len() == 1 && path.leading_colon.is_none() {
        if let Some(kind) = builtin_scalar(&ident) {
            return Ok(TypeExpr::Builtin(kind));
        }
    }

    match ident.as_str() {
        "Vec" | "VecDeque" | "HashSet" | "BTreeSet" => {
            Ok(TypeExpr::array(convert(generic_arg(segment, 0)?, package)?))
        }
        "Option" | "Box" | "Rc" | "Arc" => {
            Ok(TypeExpr::pointer(convert(generic_arg(segment, 0)?, package)?))
        }
        "HashMap" | "BTreeMap" => Ok(TypeExpr::map(
            convert(generic_arg(segment, 0)?, package)?,
            convert(generic_arg(segment, 1)?, package)?,
        )),
        "Sender" | "SyncSender" | "Receiver" => Ok(TypeExpr::Channel(Box::new(convert(
            generic_arg(segment, 0)?,
            package,
        )?))),
        _ => {
            let qualifier = path
                .segments
                .iter()
                .take(path.segments.len() - 1)
                .map(|segment| segment.ident.to_string())
                .collect::<Vec<_>>()
                .join("::");
            let package = if qualifier.is_empty() {
                package.to_string()
            } else {
                qualifier
            };
            Ok(TypeExpr::ident(package, ident))
        }
    }
}

/// Map a primitive type name to its JSON kind
fn builtin_scalar(ident: &str) -> Option<ScalarKind> {
    match ident {
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" => Some(ScalarKind::Integer),
        "f32" | "f64" => Some(ScalarKind::Number),
        "bool" => Some(ScalarKind::Boolean),
        "String" | "str" | "char" => Some(ScalarKind::String),
        _ => None,
    }
}

fn generic_arg(segment: &PathSegment, index: usize) -> Result<&Type> {
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        anyhow::bail!("`{}` requires type arguments", segment.ident);
    };

    args.args
        .iter()
        .filter_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        })
        .nth(index)
        .with_context(|| format!("`{}` is missing type argument {}", segment.ident, index + 1))
}

fn trait_name<'a>(mut bounds: impl Iterator<Item = &'a TypeParamBound>) -> String {
    bounds
        .find_map(|bound| match bound {
            TypeParamBound::Trait(bound) => bound
                .path
                .segments
                .last()
                .map(|segment| segment.ident.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "dyn".to_string())
}
