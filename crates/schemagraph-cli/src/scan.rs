//! Declaration scanning
//!
//! Turns a validated [`Manifest`] into the immutable declaration model the
//! resolver consumes: one [`Declaration`] per declared type, plus the
//! [`RegistrationSet`] naming the roots and per-union discriminator overrides.

use crate::manifest::{FieldDefinition, Manifest, TypeDefinition, TypeKind};
use crate::type_expr::parse_type_expr;
use anyhow::{Context, Result};
use schemagraph_core::{
    Alternative, Declaration, DeclarationSet, EnumValue, Field, Literal, RegistrationSet,
    ScalarKind, TypeExpr, TypeIdentity,
};
use tracing::debug;

/// Marker accepted in place of a type expression for inline structs
const INLINE_STRUCT: &str = "struct";

/// Wire name that skips a field
const SKIP_NAME: &str = "-";

/// Declarations and registrations scanned from one manifest
#[derive(Debug, Clone)]
pub struct Scan {
    pub declarations: DeclarationSet,
    pub registrations: RegistrationSet,
}

/// Build the declaration model for a manifest
pub fn scan(manifest: &Manifest) -> Result<Scan> {
    let mut declarations = DeclarationSet::new();
    let mut registrations = RegistrationSet::builder();

    for package in &manifest.packages {
        for definition in &package.types {
            let declaration = declare(manifest, &package.path, definition).with_context(|| {
                format!(
                    "{}: failed to declare `{}::{}`",
                    manifest.position_of(&definition.name),
                    package.path,
                    definition.name.get_ref()
                )
            })?;

            if let Some(property) = &definition.discriminator {
                registrations = registrations.discriminator(declaration.id.clone(), property);
            }

            debug!(type_name = %declaration.id, kind = declaration.kind.label(), "declared type");
            declarations.insert(declaration);
        }
    }

    for root in &manifest.project.roots {
        registrations = registrations.root(TypeIdentity::parse(root.get_ref()));
    }

    for (root, description) in &manifest.project.descriptions {
        registrations = registrations.description(TypeIdentity::parse(root), description);
    }

    Ok(Scan {
        declarations,
        registrations: registrations.build(),
    })
}

fn declare(manifest: &Manifest, package: &str, definition: &TypeDefinition) -> Result<Declaration> {
    let id = TypeIdentity::new(package, definition.name.get_ref().as_str());

    let declaration = match definition.kind {
        TypeKind::Scalar => {
            let kind = definition.scalar.context("scalar types require `scalar`")?;
            Declaration::scalar(id, kind)
        }
        TypeKind::Alias => {
            let target = definition
                .target
                .as_deref()
                .context("alias types require `target`")?;
            Declaration::definition(id, parse_type_expr(target, package)?)
        }
        TypeKind::Struct => {
            Declaration::structure(id, declare_fields(manifest, package, &definition.fields)?)
        }
        TypeKind::Enum => {
            let kind = definition.repr.unwrap_or(ScalarKind::String);
            let values = definition
                .values
                .iter()
                .map(|value| {
                    let literal = match &value.value {
                        Some(literal) => Some(literal_text(literal)?),
                        // A string constant without a value is its own name
                        None if kind == ScalarKind::String => Some(value.name.clone()),
                        None => None,
                    };
                    Ok(EnumValue {
                        name: value.name.clone(),
                        literal,
                        doc: value.doc.clone(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Declaration::enum_set(id, kind, values).with_enum_mode(definition.mode)
        }
        TypeKind::Interface => {
            let implementations = definition
                .implementations
                .iter()
                .map(|name| qualify(name, package))
                .collect();
            Declaration::interface_union(id, implementations)
        }
        TypeKind::Alternatives => {
            let position = manifest.position_of(&definition.name);
            let alternatives = definition
                .alternatives
                .iter()
                .map(|alternative| Alternative {
                    label: alternative.label.clone().unwrap_or_default(),
                    source: qualify(&alternative.source, package),
                    conversion_fn: alternative.convert.clone(),
                    position: position.clone(),
                })
                .collect();
            Declaration::alternative_union(id, alternatives)
        }
    };

    Ok(declaration
        .with_doc(definition.doc.clone())
        .at(manifest.position_of(&definition.name)))
}

fn declare_fields(
    manifest: &Manifest,
    package: &str,
    definitions: &[FieldDefinition],
) -> Result<Vec<Field>> {
    definitions
        .iter()
        .map(|definition| declare_field(manifest, package, definition))
        .collect()
}

fn declare_field(manifest: &Manifest, package: &str, definition: &FieldDefinition) -> Result<Field> {
    let name = definition.name.get_ref().clone();
    let position = manifest.position_of(&definition.name);

    let type_expr = match definition.type_expr.as_deref() {
        Some(INLINE_STRUCT) => {
            TypeExpr::InlineStruct(declare_fields(manifest, package, &definition.fields)?)
        }
        Some(expr) => parse_type_expr(expr, package)
            .with_context(|| format!("{}: field `{}`", position, name))?,
        None if definition.embedded => parse_type_expr(&name, package)?,
        None => anyhow::bail!("{}: field `{}` requires `type`", position, name),
    };

    let json_name = definition.json.clone().unwrap_or_else(|| name.clone());
    let skip = json_name == SKIP_NAME || !definition.exported;

    let enum_override = definition
        .enum_values
        .as_ref()
        .map(|values| values.iter().map(literal_value).collect::<Result<Vec<_>>>())
        .transpose()
        .with_context(|| format!("{}: field `{}` enum values", position, name))?;

    Ok(Field {
        name,
        json_name,
        type_expr,
        embedded: definition.embedded,
        doc: definition.doc.clone(),
        skip,
        optional: definition.optional,
        enum_override,
        enum_mode: definition.enum_mode,
        position,
    })
}

/// Resolve a type reference relative to the declaring package
fn qualify(name: &str, package: &str) -> TypeIdentity {
    if name.contains("::") {
        TypeIdentity::parse(name)
    } else {
        TypeIdentity::new(package, name)
    }
}

fn literal_text(value: &toml::Value) -> Result<String> {
    match value {
        toml::Value::String(text) => Ok(text.clone()),
        toml::Value::Integer(number) => Ok(number.to_string()),
        toml::Value::Float(number) => Ok(number.to_string()),
        toml::Value::Boolean(flag) => Ok(flag.to_string()),
        other => anyhow::bail!("Unsupported enum literal: {}", other),
    }
}

fn literal_value(value: &toml::Value) -> Result<Literal> {
    match value {
        toml::Value::String(text) => Ok(Literal::String(text.clone())),
        toml::Value::Integer(number) => Ok(Literal::Integer(*number)),
        toml::Value::Float(number) if number.is_finite() => Ok(Literal::Number(*number)),
        toml::Value::Boolean(flag) => Ok(Literal::Boolean(*flag)),
        other => anyhow::bail!("Unsupported enum literal: {}", other),
    }
}

#[cfg(test)]
#[path = "scan/scan_tests.rs"]
mod scan_tests;
