//! JSON Schema rendering
//!
//! Key order is part of the output contract and relies on `serde_json`'s
//! `preserve_order` feature:
//! - property: `type`, `description`, `const`, `enum`
//! - array: `type`, `description`, `items`
//! - object: `type`, `description`, `properties`, `required`
//! - union: `anyOf`, with the discriminator prepended to every option

use super::{ArrayNode, Literal, ObjectNode, PropertyNode, SchemaNode, UnionNode};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

/// Dialect written into every root document
pub const JSON_SCHEMA_DRAFT: &str = "http://json-schema.org/draft-07/schema#";

impl SchemaNode {
    /// Render this node as a JSON Schema fragment
    pub fn to_json(&self) -> Value {
        match self {
            SchemaNode::Property(node) => property_json(node),
            SchemaNode::Array(node) => array_json(node),
            SchemaNode::Object(node) => object_json(node),
            SchemaNode::Union(node) => union_json(node),
        }
    }

    /// Render this node as a standalone schema document with a `$schema` header
    pub fn to_document(&self) -> Value {
        let mut document = Map::new();
        document.insert("$schema".to_string(), json!(JSON_SCHEMA_DRAFT));
        if let Value::Object(body) = self.to_json() {
            document.extend(body);
        }
        Value::Object(document)
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl Literal {
    pub fn to_json(&self) -> Value {
        match self {
            Literal::String(value) => json!(value),
            Literal::Integer(value) => json!(value),
            Literal::Boolean(value) => json!(value),
            Literal::Number(value) => json!(value),
        }
    }
}

fn insert_description(map: &mut Map<String, Value>, description: &str) {
    if !description.is_empty() {
        map.insert("description".to_string(), json!(description));
    }
}

fn property_json(node: &PropertyNode) -> Value {
    let mut map = Map::new();
    map.insert("type".to_string(), json!(node.kind.as_str()));
    insert_description(&mut map, &node.description);
    if let Some(value) = &node.const_value {
        map.insert("const".to_string(), value.to_json());
    }
    if !node.enum_values.is_empty() {
        let values: Vec<Value> = node.enum_values.iter().map(Literal::to_json).collect();
        map.insert("enum".to_string(), Value::Array(values));
    }
    Value::Object(map)
}

fn array_json(node: &ArrayNode) -> Value {
    let mut map = Map::new();
    map.insert("type".to_string(), json!("array"));
    insert_description(&mut map, &node.description);
    map.insert("items".to_string(), node.items.to_json());
    Value::Object(map)
}

fn object_json(node: &ObjectNode) -> Value {
    let mut map = Map::new();
    map.insert("type".to_string(), json!("object"));
    insert_description(&mut map, &node.description);

    let mut properties = Map::new();
    for prop in &node.properties {
        properties.insert(prop.name.clone(), prop.schema.to_json());
    }
    map.insert("properties".to_string(), Value::Object(properties));

    let required: Vec<&str> = node.required().collect();
    if !required.is_empty() {
        map.insert("required".to_string(), json!(required));
    }
    Value::Object(map)
}

fn union_json(node: &UnionNode) -> Value {
    let options: Vec<Value> = node.wire_options().iter().map(object_json).collect();
    json!({ "anyOf": options })
}
