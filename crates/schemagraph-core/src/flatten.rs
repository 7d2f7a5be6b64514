//! Struct flattening and field projection
//!
//! Embedded structs are spliced into the embedding struct in their own
//! declared order. Wire names are collected over the whole embedding graph
//! before any field is resolved, so a collision is reported up front rather
//! than letting the last field win.

use crate::declaration::{DeclarationKind, DeclarationSource, EnumMode, Field};
use crate::error::{Nesting, SchemaError, SchemaResult};
use crate::identity::TypeIdentity;
use crate::position::Position;
use crate::enums;
use crate::resolver::{Placement, Resolver};
use crate::schema::{ObjectProp, PropertyNode, SchemaNode};
use std::collections::HashMap;
use std::sync::Arc;

/// Flatten the fields of a named struct
pub(crate) fn flatten_struct<'a, S: DeclarationSource + ?Sized>(
    resolver: &mut Resolver<'a, S>,
    owner: &TypeIdentity,
    fields: &'a [Field],
    placement: Placement,
) -> SchemaResult<Vec<ObjectProp>> {
    let mut seen = HashMap::new();
    let mut embedding = vec![owner.clone()];
    collect_names(resolver, &owner.to_string(), fields, &mut seen, &mut embedding)?;

    let mut properties = Vec::with_capacity(seen.len());
    project_fields(resolver, fields, placement, &mut properties)?;
    Ok(properties)
}

/// Flatten the fields of an anonymous struct declared at `site`.
///
/// Fields of an inline struct are never direct fields of a named struct, so
/// union-typed fields are rejected inside it.
pub(crate) fn flatten_inline<'a, S: DeclarationSource + ?Sized>(
    resolver: &mut Resolver<'a, S>,
    fields: &'a [Field],
    site: &Position,
) -> SchemaResult<Vec<ObjectProp>> {
    let mut seen = HashMap::new();
    let owner = format!("inline struct at {}", site);
    collect_names(resolver, &owner, fields, &mut seen, &mut Vec::new())?;

    let mut properties = Vec::with_capacity(seen.len());
    project_fields(
        resolver,
        fields,
        Placement::Nested(Nesting::InlineStruct),
        &mut properties,
    )?;
    Ok(properties)
}

fn collect_names<'a, S: DeclarationSource + ?Sized>(
    resolver: &Resolver<'a, S>,
    owner: &str,
    fields: &'a [Field],
    seen: &mut HashMap<String, Position>,
    embedding: &mut Vec<TypeIdentity>,
) -> SchemaResult<()> {
    for field in fields.iter().filter(|field| !field.skip) {
        if field.embedded {
            let (id, embedded_fields) = embedded_struct(resolver, field)?;
            if embedding.contains(&id) {
                let chain = embedding
                    .iter()
                    .chain(std::iter::once(&id))
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" -> ");
                return Err(SchemaError::CyclicType {
                    type_name: id.to_string(),
                    chain,
                    position: field.position.clone(),
                });
            }
            embedding.push(id);
            collect_names(resolver, owner, embedded_fields, seen, embedding)?;
            embedding.pop();
        } else if let Some(first) = seen.get(&field.json_name) {
            return Err(SchemaError::DuplicateJsonName {
                name: field.json_name.clone(),
                owner: owner.to_string(),
                first: first.clone(),
                position: field.position.clone(),
            });
        } else {
            seen.insert(field.json_name.clone(), field.position.clone());
        }
    }
    Ok(())
}

fn project_fields<'a, S: DeclarationSource + ?Sized>(
    resolver: &mut Resolver<'a, S>,
    fields: &'a [Field],
    placement: Placement,
    properties: &mut Vec<ObjectProp>,
) -> SchemaResult<()> {
    for field in fields.iter().filter(|field| !field.skip) {
        if field.embedded {
            let (_, embedded_fields) = embedded_struct(resolver, field)?;
            project_fields(resolver, embedded_fields, placement, properties)?;
            continue;
        }

        let node = match field.enum_mode {
            Some(mode) => enum_in_mode(resolver, field, mode)?,
            None => resolver.resolve_expr(&field.type_expr, placement, &field.position)?,
        };
        properties.push(ObjectProp {
            name: field.json_name.clone(),
            schema: apply_field_overrides(node, field)?,
            optional: field.optional,
        });
    }
    Ok(())
}

/// The fields of the struct an embedded field refers to
fn embedded_struct<'a, S: DeclarationSource + ?Sized>(
    resolver: &Resolver<'a, S>,
    field: &Field,
) -> SchemaResult<(TypeIdentity, &'a [Field])> {
    let Some(id) = field.type_expr.identity() else {
        return Err(SchemaError::UnsupportedType {
            detail: format!("embedded field `{}` must name a struct type", field.name),
            position: field.position.clone(),
        });
    };

    let declaration = resolver.declaration(&id, Some(&field.position))?;
    match &declaration.kind {
        DeclarationKind::Struct(fields) => Ok((id.concrete(), fields.as_slice())),
        other => Err(SchemaError::UnsupportedType {
            detail: format!(
                "embedded field `{}` refers to {} `{}`, expected a struct",
                field.name,
                other.label(),
                id
            ),
            position: field.position.clone(),
        }),
    }
}

/// Render the enumeration a field refers to in the field's own mode.
///
/// The result is local to the field and never memoized.
fn enum_in_mode<'a, S: DeclarationSource + ?Sized>(
    resolver: &Resolver<'a, S>,
    field: &Field,
    mode: EnumMode,
) -> SchemaResult<Arc<SchemaNode>> {
    let not_an_enum = |what: String| SchemaError::UnsupportedType {
        detail: format!(
            "field `{}` sets enum mode `{}` but {}",
            field.name,
            mode.as_str(),
            what
        ),
        position: field.position.clone(),
    };

    let Some(id) = field.type_expr.identity() else {
        return Err(not_an_enum("its type is not a named enumeration".to_string()));
    };
    let declaration = resolver.declaration(&id.concrete(), Some(&field.position))?;
    match &declaration.kind {
        DeclarationKind::EnumSet { kind, values, .. } => {
            let node = enums::synthesize_enum(
                declaration,
                *kind,
                values,
                mode,
                &resolver.config().description_separator,
            )?;
            Ok(Arc::new(node))
        }
        other => Err(not_an_enum(format!("`{}` is {}", id, other.label()))),
    }
}

/// Apply the field-site enum override and description to a resolved node
fn apply_field_overrides(
    node: Arc<SchemaNode>,
    field: &Field,
) -> SchemaResult<Arc<SchemaNode>> {
    let mut node = node;

    if let Some(values) = &field.enum_override {
        let SchemaNode::Property(property) = node.as_ref() else {
            return Err(SchemaError::UnsupportedType {
                detail: format!(
                    "field `{}` declares enum values but resolves to {}",
                    field.name,
                    node.kind_name()
                ),
                position: field.position.clone(),
            });
        };
        node = Arc::new(SchemaNode::Property(PropertyNode {
            enum_values: values.clone(),
            ..property.clone()
        }));
    }

    // Field-local documentation wins over the referenced type's own.
    if !field.doc.is_empty() {
        node = Arc::new(node.with_description(&field.doc));
    }
    Ok(node)
}

#[cfg(test)]
#[path = "flatten/flatten_tests.rs"]
mod flatten_tests;
