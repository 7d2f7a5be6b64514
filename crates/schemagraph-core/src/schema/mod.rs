//! Schema node model
//!
//! [`SchemaNode`] is the synthesized output for one type expression. Nodes are
//! shared through `Arc` once stored and are never mutated; use-site changes
//! such as a field description go through [`SchemaNode::with_description`],
//! which returns a shallow copy.

mod json;

pub use json::JSON_SCHEMA_DRAFT;

use crate::declaration::ScalarKind;
use std::fmt;
use std::sync::Arc;

/// A constant value used in `enum` and `const` keywords
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Integer(i64),
    Boolean(bool),
    Number(f64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(value) => f.write_str(value),
            Literal::Integer(value) => write!(f, "{}", value),
            Literal::Boolean(value) => write!(f, "{}", value),
            Literal::Number(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

/// A scalar property, optionally constrained by `enum` or `const`
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNode {
    pub kind: ScalarKind,
    pub description: String,
    pub enum_values: Vec<Literal>,
    pub const_value: Option<Literal>,
}

impl PropertyNode {
    pub fn new(kind: ScalarKind) -> Self {
        Self {
            kind,
            description: String::new(),
            enum_values: Vec::new(),
            const_value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    pub description: String,
    pub items: Arc<SchemaNode>,
}

/// One property of an object, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProp {
    pub name: String,
    pub schema: Arc<SchemaNode>,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    pub description: String,
    pub properties: Vec<ObjectProp>,
    /// Label written into the discriminator property when this object is a union option
    pub discriminator_label: String,
}

impl ObjectNode {
    pub fn property(&self, name: &str) -> Option<&ObjectProp> {
        self.properties.iter().find(|prop| prop.name == name)
    }

    /// Names of the properties listed under `required`
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|prop| !prop.optional)
            .map(|prop| prop.name.as_str())
    }
}

/// A discriminated union rendered as `anyOf`
#[derive(Debug, Clone, PartialEq)]
pub struct UnionNode {
    pub discriminator_property: String,
    /// Options carrying their assigned labels, without the discriminator property
    pub options: Vec<ObjectNode>,
}

impl UnionNode {
    /// Options as they appear on the wire, each with the discriminator prepended
    pub fn wire_options(&self) -> Vec<ObjectNode> {
        self.options
            .iter()
            .map(|option| crate::union::prepend_discriminator(option, &self.discriminator_property))
            .collect()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .map(|option| option.discriminator_label.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Property(PropertyNode),
    Array(ArrayNode),
    Object(ObjectNode),
    Union(UnionNode),
}

impl SchemaNode {
    /// A shallow copy with the description replaced.
    ///
    /// Unions carry no description of their own and are returned unchanged.
    pub fn with_description(&self, description: impl Into<String>) -> SchemaNode {
        let description = description.into();
        match self {
            SchemaNode::Property(node) => SchemaNode::Property(PropertyNode {
                description,
                ..node.clone()
            }),
            SchemaNode::Array(node) => SchemaNode::Array(ArrayNode {
                description,
                items: Arc::clone(&node.items),
            }),
            SchemaNode::Object(node) => SchemaNode::Object(ObjectNode {
                description,
                ..node.clone()
            }),
            SchemaNode::Union(node) => SchemaNode::Union(node.clone()),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            SchemaNode::Property(node) => Some(&node.description),
            SchemaNode::Array(node) => Some(&node.description),
            SchemaNode::Object(node) => Some(&node.description),
            SchemaNode::Union(_) => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyNode> {
        match self {
            SchemaNode::Property(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            SchemaNode::Array(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            SchemaNode::Object(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionNode> {
        match self {
            SchemaNode::Union(node) => Some(node),
            _ => None,
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(self, SchemaNode::Union(_))
    }

    /// Short label used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            SchemaNode::Property(_) => "property",
            SchemaNode::Array(_) => "array",
            SchemaNode::Object(_) => "object",
            SchemaNode::Union(_) => "union",
        }
    }
}
