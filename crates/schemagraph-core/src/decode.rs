//! Runtime support for generated union decoders
//!
//! Generated dispatch functions read the discriminator property, pick the
//! matching option, and decode the remaining properties into it. Everything
//! that can go wrong at that point is a [`DecodeError`]; an unknown
//! discriminator is an ordinary error value, never a panic.

use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Errors raised while decoding a discriminated union
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The discriminator names no option of the union
    #[error("unknown discriminator {value:?} in property {property:?} for union {union}")]
    UnknownDiscriminator {
        union: String,
        property: String,
        value: String,
    },

    /// The discriminator property is absent or not a string
    #[error("missing string discriminator property {property:?} for union {union}")]
    MissingDiscriminator { union: String, property: String },

    /// The input is not a JSON object
    #[error("expected a JSON object for union {union}, found {found}")]
    NotAnObject { union: String, found: &'static str },

    /// The selected option failed to deserialize
    #[error("invalid option payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The conversion function of an alternative rejected its input
    #[error("conversion of option {label} into union {union} failed: {message}")]
    Conversion {
        union: String,
        label: String,
        message: String,
    },
}

impl DecodeError {
    /// Wrap a conversion function's error
    pub fn conversion(union: &str, label: &str, err: impl fmt::Display) -> Self {
        DecodeError::Conversion {
            union: union.to_string(),
            label: label.to_string(),
            message: err.to_string(),
        }
    }

    pub fn unknown(union: &str, property: &str, value: &str) -> Self {
        DecodeError::UnknownDiscriminator {
            union: union.to_string(),
            property: property.to_string(),
            value: value.to_string(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read the discriminator label of a union value
pub fn read_discriminator<'v>(
    value: &'v Value,
    union: &str,
    property: &str,
) -> Result<&'v str, DecodeError> {
    let Value::Object(object) = value else {
        return Err(DecodeError::NotAnObject {
            union: union.to_string(),
            found: json_kind(value),
        });
    };

    object
        .get(property)
        .and_then(Value::as_str)
        .ok_or_else(|| DecodeError::MissingDiscriminator {
            union: union.to_string(),
            property: property.to_string(),
        })
}

/// The option's own properties, without the discriminator
pub fn strip_discriminator(value: &Value, property: &str) -> Value {
    match value {
        Value::Object(object) => Value::Object(
            object
                .iter()
                .filter(|(key, _)| key.as_str() != property)
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Put the discriminator in front of an encoded option.
///
/// Non-object values are returned unchanged.
pub fn insert_discriminator(value: Value, property: &str, label: &str) -> Value {
    match value {
        Value::Object(object) => {
            let mut tagged = Map::with_capacity(object.len() + 1);
            tagged.insert(property.to_string(), Value::String(label.to_string()));
            tagged.extend(object.into_iter().filter(|(key, _)| key != property));
            Value::Object(tagged)
        }
        other => other,
    }
}

type DecodeFn<T> = Box<dyn Fn(Value) -> Result<T, DecodeError> + Send + Sync>;

/// A table-driven decoder for one union
pub struct UnionDecoder<T> {
    union: String,
    property: String,
    arms: Vec<(String, DecodeFn<T>)>,
}

impl<T> UnionDecoder<T> {
    pub fn new(union: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            union: union.into(),
            property: property.into(),
            arms: Vec::new(),
        }
    }

    /// Add an option; `decode` receives the value without its discriminator
    pub fn arm<F>(mut self, label: impl Into<String>, decode: F) -> Self
    where
        F: Fn(Value) -> Result<T, DecodeError> + Send + Sync + 'static,
    {
        self.arms.push((label.into(), Box::new(decode)));
        self
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.arms.iter().map(|(label, _)| label.as_str())
    }

    pub fn decode(&self, value: &Value) -> Result<T, DecodeError> {
        let label = read_discriminator(value, &self.union, &self.property)?;
        let (_, decode) = self
            .arms
            .iter()
            .find(|(candidate, _)| candidate == label)
            .ok_or_else(|| DecodeError::unknown(&self.union, &self.property, label))?;
        decode(strip_discriminator(value, &self.property))
    }

    pub fn decode_str(&self, json: &str) -> Result<T, DecodeError> {
        let value: Value = serde_json::from_str(json)?;
        self.decode(&value)
    }
}

impl<T> fmt::Debug for UnionDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionDecoder")
            .field("union", &self.union)
            .field("property", &self.property)
            .field("labels", &self.labels().collect::<Vec<_>>())
            .finish()
    }
}
