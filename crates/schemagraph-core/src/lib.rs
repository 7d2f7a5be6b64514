//! schemagraph-core - Type graph resolution and JSON Schema synthesis
//!
//! This crate provides:
//! - [`DeclarationSet`] and [`RegistrationSet`], the immutable input model
//! - [`Resolver`] which walks the type graph and memoizes one [`SchemaNode`] per named type
//! - [`DispatchTable`] describing how generated code decodes each discriminated union
//! - [`decode`] runtime helpers used by generated dispatch functions
//!
//! # Example
//!
//! ```
//! use schemagraph_core::prelude::*;
//!
//! let circle = TypeIdentity::new("shapes", "Circle");
//! let shape = TypeIdentity::new("shapes", "Shape");
//! let drawing = TypeIdentity::new("shapes", "Drawing");
//!
//! let mut declarations = DeclarationSet::new();
//! declarations.insert(Declaration::structure(
//!     circle.clone(),
//!     vec![Field::new("radius", TypeExpr::Builtin(ScalarKind::Number))],
//! ));
//! declarations.insert(Declaration::interface_union(shape.clone(), vec![circle]));
//! declarations.insert(Declaration::structure(
//!     drawing.clone(),
//!     vec![Field::new("mainShape", TypeExpr::ident("shapes", "Shape"))],
//! ));
//!
//! let registrations = RegistrationSet::builder().root(drawing.clone()).build();
//! let resolution = Resolver::new(&declarations, &registrations, ResolverConfig::default()).run();
//!
//! assert!(resolution.is_success());
//! assert!(resolution.get_schema(&drawing).is_some());
//! assert_eq!(resolution.dispatch_tables().count(), 1);
//! ```

pub mod config;
pub mod declaration;
pub mod decode;
pub mod error;
pub mod identity;
pub mod position;
pub mod resolver;
pub mod schema;
pub mod store;
pub mod union;

mod enums;
mod flatten;

pub use config::ResolverConfig;
pub use declaration::{
    Alternative, Declaration, DeclarationKind, DeclarationSet, DeclarationSource, EnumMode,
    EnumValue, Field, RegistrationSet, RegistrationSetBuilder, ScalarKind, TypeExpr,
};
pub use decode::{DecodeError, UnionDecoder};
pub use error::{Nesting, SchemaError, SchemaResult};
pub use identity::{Indirection, TypeIdentity};
pub use position::Position;
pub use resolver::{Resolution, Resolver};
pub use schema::{ArrayNode, Literal, ObjectNode, ObjectProp, PropertyNode, SchemaNode, UnionNode};
pub use store::SchemaStore;
pub use union::{DispatchEntry, DispatchTable, UnionKind, assign_discriminators, prepend_discriminator};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Declaration, DeclarationSet, Field, RegistrationSet, Resolution, Resolver,
        ResolverConfig, ScalarKind, SchemaError, SchemaNode, TypeExpr, TypeIdentity,
    };
}

#[cfg(test)]
mod test_support;
