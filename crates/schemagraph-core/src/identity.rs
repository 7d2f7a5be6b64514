//! Type identities
//!
//! A [`TypeIdentity`] names one declared type by package path and type name.
//! The indirection flag records whether a reference went through a pointer;
//! it never takes part in equality, hashing, or ordering, so every identity
//! can be used as a store key directly. [`TypeIdentity::concrete`] strips it
//! explicitly where the stored value must not carry use-site information.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// How a type was referenced at a use site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indirection {
    #[default]
    Concrete,
    Pointer,
}

/// Identity of a named type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeIdentity {
    package_path: String,
    type_name: String,
    #[serde(default)]
    indirection: Indirection,
}

impl TypeIdentity {
    /// Create a concrete identity
    pub fn new(package_path: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            package_path: package_path.into(),
            type_name: type_name.into(),
            indirection: Indirection::Concrete,
        }
    }

    /// Create an identity referenced through a pointer
    pub fn pointer(package_path: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            indirection: Indirection::Pointer,
            ..Self::new(package_path, type_name)
        }
    }

    /// Parse a qualified name such as `geo::shapes::Circle`.
    ///
    /// An unqualified name gets an empty package path.
    pub fn parse(qualified: &str) -> Self {
        match qualified.rsplit_once("::") {
            Some((path, name)) => Self::new(path, name),
            None => Self::new("", qualified),
        }
    }

    pub fn package_path(&self) -> &str {
        &self.package_path
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn indirection(&self) -> Indirection {
        self.indirection
    }

    pub fn is_pointer(&self) -> bool {
        self.indirection == Indirection::Pointer
    }

    /// The same identity with indirection stripped
    pub fn concrete(&self) -> Self {
        Self {
            package_path: self.package_path.clone(),
            type_name: self.type_name.clone(),
            indirection: Indirection::Concrete,
        }
    }

    /// The same identity marked as referenced through a pointer
    pub fn as_pointer(&self) -> Self {
        Self {
            indirection: Indirection::Pointer,
            ..self.clone()
        }
    }
}

impl PartialEq for TypeIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.package_path == other.package_path && self.type_name == other.type_name
    }
}

impl Eq for TypeIdentity {}

impl Hash for TypeIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.package_path.hash(state);
        self.type_name.hash(state);
    }
}

impl PartialOrd for TypeIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeIdentity {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.package_path, &self.type_name).cmp(&(&other.package_path, &other.type_name))
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package_path.is_empty() {
            write!(f, "{}", self.type_name)
        } else {
            write!(f, "{}::{}", self.package_path, self.type_name)
        }
    }
}
