//! Union synthesis and discriminator assignment
//!
//! A union (an interface with registered implementations, or a destination
//! type reachable from alternative source types) becomes a [`UnionNode`] whose
//! options are object schemas tagged with a unique discriminator label. The
//! same step records a [`DispatchTable`] that generated decoders switch on.

use crate::declaration::{Alternative, Declaration, DeclarationSource, ScalarKind};
use crate::error::{SchemaError, SchemaResult};
use crate::identity::TypeIdentity;
use crate::position::Position;
use crate::resolver::Resolver;
use crate::schema::{Literal, ObjectNode, ObjectProp, PropertyNode, SchemaNode, UnionNode};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// How the options of a union relate to the union type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnionKind {
    /// Options implement the union's interface and are used as-is
    Interface,
    /// Options are converted into the union type by a named function
    Alternative,
}

/// One row of a dispatch table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchEntry {
    pub label: String,
    pub target: TypeIdentity,
    /// Conversion function, for alternative unions only
    pub conversion: Option<String>,
}

/// Discriminator label to concrete type mapping for one union
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchTable {
    pub union: TypeIdentity,
    pub kind: UnionKind,
    pub discriminator_property: String,
    pub entries: Vec<DispatchEntry>,
}

impl DispatchTable {
    pub fn lookup(&self, label: &str) -> Option<&DispatchEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }
}

/// An option before its label is made unique
pub(crate) struct Candidate<'a> {
    source: &'a TypeIdentity,
    label: &'a str,
    conversion: Option<&'a str>,
    position: &'a Position,
}

pub(crate) fn interface_candidates<'a>(
    declaration: &'a Declaration,
    implementations: &'a [TypeIdentity],
) -> Vec<Candidate<'a>> {
    implementations
        .iter()
        .map(|id| Candidate {
            source: id,
            label: id.type_name(),
            conversion: None,
            position: &declaration.position,
        })
        .collect()
}

pub(crate) fn alternative_candidates<'a>(
    declaration: &'a Declaration,
    alternatives: &'a [Alternative],
) -> Vec<Candidate<'a>> {
    alternatives
        .iter()
        .map(|alternative| Candidate {
            source: &alternative.source,
            label: if alternative.label.is_empty() {
                alternative.source.type_name()
            } else {
                &alternative.label
            },
            conversion: Some(alternative.conversion_fn.as_str()),
            position: if alternative.position.is_unknown() {
                &declaration.position
            } else {
                &alternative.position
            },
        })
        .collect()
}

pub(crate) fn synthesize_union<'a, S: DeclarationSource + ?Sized>(
    resolver: &mut Resolver<'a, S>,
    declaration: &'a Declaration,
    kind: UnionKind,
    candidates: Vec<Candidate<'a>>,
) -> SchemaResult<(UnionNode, DispatchTable)> {
    let property = resolver
        .registrations()
        .discriminator_override(&declaration.id)
        .unwrap_or(resolver.config().discriminator_property.as_str())
        .to_string();

    let base_labels: Vec<&str> = candidates.iter().map(|candidate| candidate.label).collect();
    let labels = assign_discriminators(&base_labels);

    let mut options = Vec::with_capacity(candidates.len());
    let mut entries = Vec::with_capacity(candidates.len());

    for (candidate, label) in candidates.iter().zip(labels) {
        if label != candidate.label {
            debug!(
                union = %declaration.id,
                option = %candidate.source,
                label = %label,
                "deduplicated discriminator label"
            );
        }

        let node = resolver.resolve_named(candidate.source, Some(candidate.position))?;
        let SchemaNode::Object(object) = node.as_ref() else {
            return Err(SchemaError::NonObjectUnionOption {
                union: declaration.id.to_string(),
                option: candidate.source.to_string(),
                found: node.kind_name(),
                position: candidate.position.clone(),
            });
        };

        if object.property(&property).is_some() {
            return Err(SchemaError::DuplicateJsonName {
                name: property,
                owner: candidate.source.to_string(),
                first: candidate.position.clone(),
                position: declaration.position.clone(),
            });
        }

        options.push(ObjectNode {
            discriminator_label: label.clone(),
            ..object.clone()
        });
        entries.push(DispatchEntry {
            label,
            target: candidate.source.concrete(),
            conversion: candidate.conversion.map(str::to_string),
        });
    }

    let table = DispatchTable {
        union: declaration.id.clone(),
        kind,
        discriminator_property: property.clone(),
        entries,
    };
    let node = UnionNode {
        discriminator_property: property,
        options,
    };
    Ok((node, table))
}

/// Make discriminator labels unique, preserving input order.
///
/// The first occurrence of a label keeps it. A later collision strips any
/// trailing digits and takes the lowest unused numeric suffix, so
/// `Foo, Foo, Foo` becomes `Foo, Foo1, Foo2`.
pub fn assign_discriminators<T: AsRef<str>>(names: &[T]) -> Vec<String> {
    let mut used = HashSet::with_capacity(names.len());
    let mut labels = Vec::with_capacity(names.len());

    for name in names {
        let name = name.as_ref();
        if used.insert(name.to_string()) {
            labels.push(name.to_string());
            continue;
        }

        let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
        let mut suffix = 1usize;
        loop {
            let candidate = format!("{}{}", stem, suffix);
            if used.insert(candidate.clone()) {
                labels.push(candidate);
                break;
            }
            suffix += 1;
        }
    }

    labels
}

/// Copy an option with its discriminator inserted as the first, required property.
///
/// The memoized object is left untouched; the same struct may appear outside
/// any union without the discriminator.
pub fn prepend_discriminator(object: &ObjectNode, property: &str) -> ObjectNode {
    let discriminator = ObjectProp {
        name: property.to_string(),
        schema: Arc::new(SchemaNode::Property(PropertyNode {
            const_value: Some(Literal::String(object.discriminator_label.clone())),
            ..PropertyNode::new(ScalarKind::String)
        })),
        optional: false,
    };

    let mut properties = Vec::with_capacity(object.properties.len() + 1);
    properties.push(discriminator);
    properties.extend(object.properties.iter().cloned());

    ObjectNode {
        description: object.description.clone(),
        properties,
        discriminator_label: object.discriminator_label.clone(),
    }
}
