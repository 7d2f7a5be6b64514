//! Declaration model
//!
//! Declarations are the read-only facts a scanner produces about each named
//! type. They are built once, before resolution starts, and never mutated.

use crate::identity::TypeIdentity;
use crate::position::Position;
use crate::schema::Literal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Primitive JSON kinds a scalar type maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Integer,
    String,
    Boolean,
    Number,
}

impl ScalarKind {
    /// JSON Schema `type` keyword for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::Integer => "integer",
            ScalarKind::String => "string",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Number => "number",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type expression as written at a use site
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A built-in primitive
    Builtin(ScalarKind),
    /// A reference to a named type
    Ident { path: String, name: String },
    Pointer(Box<TypeExpr>),
    /// A parenthesized single-element grouping
    Group(Box<TypeExpr>),
    Array(Box<TypeExpr>),
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Channel(Box<TypeExpr>),
    Func,
    /// An interface or trait object that is not registered as a union
    Interface { name: String },
    /// An anonymous struct declared inline
    InlineStruct(Vec<Field>),
}

impl TypeExpr {
    pub fn ident(path: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpr::Ident {
            path: path.into(),
            name: name.into(),
        }
    }

    pub fn pointer(inner: TypeExpr) -> Self {
        TypeExpr::Pointer(Box::new(inner))
    }

    pub fn array(elem: TypeExpr) -> Self {
        TypeExpr::Array(Box::new(elem))
    }

    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// The named type this expression refers to, looking through pointers and groups.
    ///
    /// A reference through a pointer yields a pointer identity.
    pub fn identity(&self) -> Option<TypeIdentity> {
        match self {
            TypeExpr::Ident { path, name } => Some(TypeIdentity::new(path.clone(), name.clone())),
            TypeExpr::Pointer(inner) => inner.identity().map(|id| id.as_pointer()),
            TypeExpr::Group(inner) => inner.identity(),
            _ => None,
        }
    }
}

/// A struct field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    /// Wire name used as the JSON property
    pub json_name: String,
    pub type_expr: TypeExpr,
    pub embedded: bool,
    pub doc: String,
    /// Unexported or explicitly ignored
    pub skip: bool,
    /// Excluded from the object's `required` list
    pub optional: bool,
    /// Field-level enumeration literals, replacing any `enum` of the resolved scalar
    pub enum_override: Option<Vec<Literal>>,
    /// Field-level rendering of an enumeration-typed field
    pub enum_mode: Option<EnumMode>,
    pub position: Position,
}

impl Field {
    /// Create a field whose wire name equals its declared name
    pub fn new(name: impl Into<String>, type_expr: TypeExpr) -> Self {
        let name = name.into();
        Self {
            json_name: name.clone(),
            name,
            type_expr,
            embedded: false,
            doc: String::new(),
            skip: false,
            optional: false,
            enum_override: None,
            enum_mode: None,
            position: Position::default(),
        }
    }

    /// Create an embedded field for the given named type
    pub fn embedded(identity: &TypeIdentity) -> Self {
        Self {
            embedded: true,
            ..Self::new(
                identity.type_name(),
                TypeExpr::ident(identity.package_path(), identity.type_name()),
            )
        }
    }

    pub fn json(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = json_name.into();
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_enum(mut self, values: Vec<Literal>) -> Self {
        self.enum_override = Some(values);
        self
    }

    /// Render the field's enumeration type in `mode` at this field only
    pub fn with_enum_mode(mut self, mode: EnumMode) -> Self {
        self.enum_mode = Some(mode);
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// One constant of an enumeration
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    /// Literal text of the constant, `None` for counter-based constants
    pub literal: Option<String>,
    pub doc: String,
}

impl EnumValue {
    pub fn literal(name: impl Into<String>, literal: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            literal: Some(literal.into()),
            doc: String::new(),
        }
    }

    /// A constant whose value comes from a counter rather than a literal
    pub fn counter(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            literal: None,
            doc: String::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }
}

/// One option of an alternative union
#[derive(Debug, Clone, PartialEq)]
pub struct Alternative {
    /// Explicit discriminator label, empty to derive it from the source type name
    pub label: String,
    pub source: TypeIdentity,
    /// Path of the function converting the source type into the destination
    pub conversion_fn: String,
    pub position: Position,
}

impl Alternative {
    pub fn new(source: TypeIdentity, conversion_fn: impl Into<String>) -> Self {
        Self {
            label: String::new(),
            source,
            conversion_fn: conversion_fn.into(),
            position: Position::default(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// What kind of type a declaration describes
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
    Scalar(ScalarKind),
    Definition(TypeExpr),
    Struct(Vec<Field>),
    EnumSet {
        kind: ScalarKind,
        values: Vec<EnumValue>,
        mode: EnumMode,
    },
    InterfaceUnion {
        implementations: Vec<TypeIdentity>,
    },
    AlternativeUnion {
        alternatives: Vec<Alternative>,
    },
}

impl DeclarationKind {
    /// Short label used in diagnostics and logs
    pub fn label(&self) -> &'static str {
        match self {
            DeclarationKind::Scalar(_) => "scalar",
            DeclarationKind::Definition(_) => "definition",
            DeclarationKind::Struct(_) => "struct",
            DeclarationKind::EnumSet { .. } => "enum",
            DeclarationKind::InterfaceUnion { .. } => "interface union",
            DeclarationKind::AlternativeUnion { .. } => "alternative union",
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(
            self,
            DeclarationKind::InterfaceUnion { .. } | DeclarationKind::AlternativeUnion { .. }
        )
    }
}

/// How an enumeration is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumMode {
    /// The literal value of each constant, typed by the group's kind
    #[default]
    Literals,
    /// A string enumeration of the constant names; literals are not required
    Names,
}

impl EnumMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnumMode::Literals => "literals",
            EnumMode::Names => "names",
        }
    }
}

/// Scanner-provided facts about one named type
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub id: TypeIdentity,
    pub doc: String,
    pub position: Position,
    pub kind: DeclarationKind,
}

impl Declaration {
    pub fn new(id: TypeIdentity, kind: DeclarationKind) -> Self {
        Self {
            id: id.concrete(),
            doc: String::new(),
            position: Position::default(),
            kind,
        }
    }

    pub fn scalar(id: TypeIdentity, kind: ScalarKind) -> Self {
        Self::new(id, DeclarationKind::Scalar(kind))
    }

    pub fn definition(id: TypeIdentity, underlying: TypeExpr) -> Self {
        Self::new(id, DeclarationKind::Definition(underlying))
    }

    pub fn structure(id: TypeIdentity, fields: Vec<Field>) -> Self {
        Self::new(id, DeclarationKind::Struct(fields))
    }

    pub fn enum_set(id: TypeIdentity, kind: ScalarKind, values: Vec<EnumValue>) -> Self {
        Self::new(
            id,
            DeclarationKind::EnumSet {
                kind,
                values,
                mode: EnumMode::Literals,
            },
        )
    }

    /// An enumeration rendered as the names of its constants
    pub fn enum_names(id: TypeIdentity, kind: ScalarKind, values: Vec<EnumValue>) -> Self {
        Self::new(
            id,
            DeclarationKind::EnumSet {
                kind,
                values,
                mode: EnumMode::Names,
            },
        )
    }

    pub fn interface_union(id: TypeIdentity, implementations: Vec<TypeIdentity>) -> Self {
        Self::new(id, DeclarationKind::InterfaceUnion { implementations })
    }

    pub fn alternative_union(id: TypeIdentity, alternatives: Vec<Alternative>) -> Self {
        Self::new(id, DeclarationKind::AlternativeUnion { alternatives })
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Set the rendering mode of an enumeration; other kinds are left as they are
    pub fn with_enum_mode(mut self, enum_mode: EnumMode) -> Self {
        if let DeclarationKind::EnumSet { mode, .. } = &mut self.kind {
            *mode = enum_mode;
        }
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// Lookup of declarations by identity
pub trait DeclarationSource {
    /// Find the declaration for a type, ignoring indirection
    fn get_declaration(&self, id: &TypeIdentity) -> Option<&Declaration>;
}

/// An in-memory collection of declarations
#[derive(Debug, Clone, Default)]
pub struct DeclarationSet {
    declarations: BTreeMap<TypeIdentity, Declaration>,
}

impl DeclarationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration, returning the one it replaced
    pub fn insert(&mut self, declaration: Declaration) -> Option<Declaration> {
        self.declarations
            .insert(declaration.id.clone(), declaration)
    }

    pub fn contains(&self, id: &TypeIdentity) -> bool {
        self.declarations.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.values()
    }
}

impl DeclarationSource for DeclarationSet {
    fn get_declaration(&self, id: &TypeIdentity) -> Option<&Declaration> {
        self.declarations.get(id)
    }
}

impl FromIterator<Declaration> for DeclarationSet {
    fn from_iter<I: IntoIterator<Item = Declaration>>(iter: I) -> Self {
        let mut set = Self::new();
        for declaration in iter {
            set.insert(declaration);
        }
        set
    }
}

/// The types registered for schema generation, plus per-union settings.
///
/// Built once by the scanner through [`RegistrationSet::builder`] and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct RegistrationSet {
    roots: Vec<TypeIdentity>,
    discriminator_overrides: BTreeMap<TypeIdentity, String>,
    descriptions: BTreeMap<TypeIdentity, String>,
}

impl RegistrationSet {
    pub fn builder() -> RegistrationSetBuilder {
        RegistrationSetBuilder::default()
    }

    /// Root types in registration order
    pub fn roots(&self) -> &[TypeIdentity] {
        &self.roots
    }

    /// Discriminator property override for a union, if one was registered
    pub fn discriminator_override(&self, union: &TypeIdentity) -> Option<&str> {
        self.discriminator_overrides.get(union).map(String::as_str)
    }

    /// Description registered for a root, replacing its type documentation
    pub fn description(&self, root: &TypeIdentity) -> Option<&str> {
        self.descriptions.get(root).map(String::as_str)
    }
}

/// Builder for [`RegistrationSet`]
#[derive(Debug, Default)]
pub struct RegistrationSetBuilder {
    roots: Vec<TypeIdentity>,
    discriminator_overrides: BTreeMap<TypeIdentity, String>,
    descriptions: BTreeMap<TypeIdentity, String>,
}

impl RegistrationSetBuilder {
    /// Register a root type. Registering the same type twice keeps the first position.
    pub fn root(mut self, id: TypeIdentity) -> Self {
        let id = id.concrete();
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
        self
    }

    pub fn discriminator(mut self, union: TypeIdentity, property: impl Into<String>) -> Self {
        self.discriminator_overrides
            .insert(union.concrete(), property.into());
        self
    }

    /// Override the top-level description of a root's schema
    pub fn description(mut self, root: TypeIdentity, text: impl Into<String>) -> Self {
        self.descriptions.insert(root.concrete(), text.into());
        self
    }

    pub fn build(self) -> RegistrationSet {
        RegistrationSet {
            roots: self.roots,
            discriminator_overrides: self.discriminator_overrides,
            descriptions: self.descriptions,
        }
    }
}
