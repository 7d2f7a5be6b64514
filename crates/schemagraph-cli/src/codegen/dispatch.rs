//! Rust dispatch functions for discriminated unions.
//!
//! Every [`DispatchTable`] becomes a `decode_<union>` function that reads the
//! discriminator, strips it, and deserializes the remaining properties into
//! the selected option. Alternative options are passed through their
//! conversion function. An `encode_<union>` helper puts the discriminator
//! back in front of a serialized option.
//!
//! Generated code depends on `serde`, `serde_json` and `schemagraph_core`.

use super::naming::to_snake_case;
use anyhow::{Context, Result};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use schemagraph_core::{DispatchEntry, DispatchTable, TypeIdentity, UnionKind};
use std::collections::HashMap;
use tracing::debug;

/// First line of every generated file
pub const GENERATED_HEADER: &str = "// @generated by schemagraph. Do not edit.";

/// Generate dispatch source for all tables
pub fn generate_dispatch(tables: &[&DispatchTable], module_root: &str) -> Result<String> {
    let mut owners: HashMap<String, &TypeIdentity> = HashMap::new();
    let mut items = Vec::with_capacity(tables.len());

    for table in tables {
        let snake = to_snake_case(table.union.type_name());
        if let Some(first) = owners.insert(snake.clone(), &table.union) {
            anyhow::bail!(
                "Unions `{}` and `{}` would both generate `decode_{}`",
                first,
                table.union,
                snake
            );
        }

        let tokens = union_items(table, &snake, module_root)
            .with_context(|| format!("Failed to generate dispatch for `{}`", table.union))?;

        // Reject anything that is not a valid Rust file before it is written
        let file = syn::parse2::<syn::File>(tokens.clone())
            .with_context(|| format!("Generated invalid code for `{}`", table.union))?;
        debug!(union = %table.union, items = file.items.len(), "generated dispatch");

        items.push(tokens.to_string());
    }

    let mut source = String::from(GENERATED_HEADER);
    source.push_str("\n\n");
    source.push_str(&items.join("\n\n"));
    source.push('\n');
    Ok(source)
}

fn union_items(table: &DispatchTable, snake: &str, module_root: &str) -> Result<TokenStream> {
    let union_name = table.union.to_string();
    let property = &table.discriminator_property;
    let property_const = format_ident!("{}_DISCRIMINATOR", snake.to_uppercase());
    let decode_fn = format_ident!("decode_{}", snake);
    let encode_fn = format_ident!("encode_{}", snake);

    let union_path = type_path(module_root, &table.union)?;
    let output = match table.kind {
        UnionKind::Interface => quote!(::std::boxed::Box<dyn #union_path>),
        UnionKind::Alternative => quote!(#union_path),
    };

    let arms = table
        .entries
        .iter()
        .map(|entry| decode_arm(table, entry, module_root))
        .collect::<Result<Vec<_>>>()?;

    let decode_doc = format!(" Decode a `{}` by its `{}` property.", union_name, property);
    let encode_doc = format!(
        " Serialize an option of `{}` with its discriminator label in front.",
        union_name
    );

    Ok(quote! {
        pub const #property_const: &str = #property;

        #[doc = #decode_doc]
        pub fn #decode_fn(
            value: &::serde_json::Value,
        ) -> ::core::result::Result<#output, ::schemagraph_core::decode::DecodeError> {
            let label = ::schemagraph_core::decode::read_discriminator(value, #union_name, #property_const)?;
            let option = ::schemagraph_core::decode::strip_discriminator(value, #property_const);
            match label {
                #(#arms)*
                other => ::core::result::Result::Err(
                    ::schemagraph_core::decode::DecodeError::unknown(#union_name, #property_const, other),
                ),
            }
        }

        #[doc = #encode_doc]
        pub fn #encode_fn<T: ::serde::Serialize + ?Sized>(
            label: &str,
            option: &T,
        ) -> ::core::result::Result<::serde_json::Value, ::serde_json::Error> {
            let value = ::serde_json::to_value(option)?;
            ::core::result::Result::Ok(
                ::schemagraph_core::decode::insert_discriminator(value, #property_const, label),
            )
        }
    })
}

fn decode_arm(
    table: &DispatchTable,
    entry: &DispatchEntry,
    module_root: &str,
) -> Result<TokenStream> {
    let label = &entry.label;
    let target = type_path(module_root, &entry.target)?;

    match (&table.kind, &entry.conversion) {
        (UnionKind::Alternative, Some(conversion)) => {
            let union_name = table.union.to_string();
            let convert = conversion_path(module_root, &table.union, conversion)?;
            Ok(quote! {
                #label => {
                    let source = ::serde_json::from_value::<#target>(option)?;
                    #convert(source).map_err(|err| {
                        ::schemagraph_core::decode::DecodeError::conversion(#union_name, #label, err)
                    })
                }
            })
        }
        (UnionKind::Alternative, None) => {
            anyhow::bail!("Alternative `{}` has no conversion function", label)
        }
        (UnionKind::Interface, _) => Ok(quote! {
            #label => ::core::result::Result::Ok(::std::boxed::Box::new(
                ::serde_json::from_value::<#target>(option)?,
            )),
        }),
    }
}

/// `<module_root>::<package>::<Name>` as a path
fn type_path(module_root: &str, id: &TypeIdentity) -> Result<syn::Path> {
    let text = qualified(module_root, id.package_path(), id.type_name());
    syn::parse_str::<syn::Path>(&text).with_context(|| format!("Invalid type path `{}`", text))
}

/// Conversion functions are used as written when qualified, and otherwise
/// looked up in the union's package
fn conversion_path(module_root: &str, union: &TypeIdentity, conversion: &str) -> Result<syn::Path> {
    let text = if conversion.contains("::") {
        conversion.to_string()
    } else {
        qualified(module_root, union.package_path(), conversion)
    };
    syn::parse_str::<syn::Path>(&text)
        .with_context(|| format!("Invalid conversion function path `{}`", text))
}

fn qualified(module_root: &str, package: &str, name: &str) -> String {
    [module_root, package, name]
        .iter()
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace('/', "::"))
        .collect::<Vec<_>>()
        .join("::")
}
