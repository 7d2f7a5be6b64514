//! Declaration fixtures shared by unit tests

use crate::config::ResolverConfig;
use crate::declaration::{Declaration, DeclarationSet, Field, RegistrationSet, ScalarKind, TypeExpr};
use crate::identity::TypeIdentity;
use crate::resolver::Resolver;

pub(crate) const PKG: &str = "shapes";

pub(crate) fn id(name: &str) -> TypeIdentity {
    TypeIdentity::new(PKG, name)
}

pub(crate) fn named(name: &str) -> TypeExpr {
    TypeExpr::ident(PKG, name)
}

pub(crate) fn number() -> TypeExpr {
    TypeExpr::Builtin(ScalarKind::Number)
}

pub(crate) fn string() -> TypeExpr {
    TypeExpr::Builtin(ScalarKind::String)
}

pub(crate) fn structure(name: &str, fields: Vec<Field>) -> Declaration {
    Declaration::structure(id(name), fields)
}

/// `Circle{radius}`, `Rectangle{width, height}`, the `Shape` interface over both,
/// and `Drawing{mainShape Shape}`.
pub(crate) fn shapes() -> DeclarationSet {
    [
        structure("Circle", vec![Field::new("radius", number())]).with_doc("A circle"),
        structure(
            "Rectangle",
            vec![Field::new("width", number()), Field::new("height", number())],
        ),
        Declaration::interface_union(id("Shape"), vec![id("Circle"), id("Rectangle")]),
        structure("Drawing", vec![Field::new("mainShape", named("Shape"))]),
    ]
    .into_iter()
    .collect()
}

pub(crate) fn roots(names: &[&str]) -> RegistrationSet {
    names
        .iter()
        .fold(RegistrationSet::builder(), |builder, name| builder.root(id(name)))
        .build()
}

pub(crate) fn resolver<'a>(
    declarations: &'a DeclarationSet,
    registrations: &'a RegistrationSet,
) -> Resolver<'a, DeclarationSet> {
    Resolver::new(declarations, registrations, ResolverConfig::default())
}
