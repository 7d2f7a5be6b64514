#![allow(non_snake_case)]

use super::*;
use crate::declaration::{DeclarationSet, Field, ScalarKind};
use crate::test_support::*;
use test_case::test_case;

// ============================================================================
// Unsupported field types
// ============================================================================

#[test_case(TypeExpr::Func, "function" ; "function")]
#[test_case(TypeExpr::Channel(Box::new(string())), "channel" ; "channel")]
#[test_case(TypeExpr::map(string(), number()), "map" ; "map of scalars")]
#[test_case(TypeExpr::Interface { name: "Reader".into() }, "Reader" ; "unregistered interface")]
#[test_case(TypeExpr::array(TypeExpr::Func), "function" ; "array of functions")]
#[test_case(TypeExpr::pointer(TypeExpr::map(string(), string())), "map" ; "pointer to map")]
fn Resolver___unsupported_field_type___fails_with_positioned_error(expr: TypeExpr, mentions: &str) {
    let position = Position::new("types.toml", 7, 3);
    let declarations: DeclarationSet =
        [structure("Holder", vec![Field::new("value", expr).at(position.clone())])]
            .into_iter()
            .collect();
    let registrations = roots(&["Holder"]);
    let mut resolver = resolver(&declarations, &registrations);

    let err = resolver.resolve(&id("Holder")).unwrap_err();

    match err {
        SchemaError::UnsupportedType { detail, position: at } => {
            assert!(detail.contains(mentions), "{detail}");
            assert_eq!(at, position);
        }
        other => panic!("expected UnsupportedType, got {other:?}"),
    }
}

// ============================================================================
// Union placement
// ============================================================================

#[test_case(named("Shape"), None ; "direct field")]
#[test_case(TypeExpr::pointer(named("Shape")), None ; "pointer field")]
#[test_case(named("ShapeAlias"), None ; "alias of union")]
#[test_case(TypeExpr::array(named("Shape")), Some(Nesting::Array) ; "slice")]
#[test_case(TypeExpr::array(TypeExpr::array(named("Shape"))), Some(Nesting::Array) ; "nested slice")]
#[test_case(named("Shapes"), Some(Nesting::Array) ; "named slice of union")]
#[test_case(TypeExpr::array(named("ShapeAlias")), Some(Nesting::Array) ; "slice of alias")]
#[test_case(TypeExpr::map(string(), named("ShapeAlias")), Some(Nesting::Map) ; "map of alias")]
fn Resolver___union_field_placement___is_checked(expr: TypeExpr, rejected_in: Option<Nesting>) {
    let mut declarations = shapes();
    declarations.insert(Declaration::definition(id("ShapeAlias"), named("Shape")));
    declarations.insert(Declaration::definition(id("Shapes"), TypeExpr::array(named("Shape"))));
    declarations.insert(structure("Holder", vec![Field::new("value", expr)]));
    let registrations = roots(&["Holder"]);
    let mut resolver = resolver(&declarations, &registrations);

    let result = resolver.resolve(&id("Holder"));

    match rejected_in {
        None => {
            let holder = result.unwrap();
            let value = holder.as_object().unwrap().property("value").unwrap();
            assert!(value.schema.is_union());
        }
        Some(container) => {
            let err = result.unwrap_err();
            assert!(
                matches!(err, SchemaError::IllegalUnionPlacement { container: found, .. } if found == container),
                "{err:?}"
            );
        }
    }
}

// ============================================================================
// Builtin scalars
// ============================================================================

#[test_case(ScalarKind::Integer, "integer")]
#[test_case(ScalarKind::String, "string")]
#[test_case(ScalarKind::Boolean, "boolean")]
#[test_case(ScalarKind::Number, "number")]
fn Resolver___builtin_field___renders_json_type(kind: ScalarKind, expected: &str) {
    let declarations: DeclarationSet =
        [structure("Holder", vec![Field::new("value", TypeExpr::Builtin(kind))])]
            .into_iter()
            .collect();
    let registrations = roots(&["Holder"]);
    let mut resolver = resolver(&declarations, &registrations);

    let holder = resolver.resolve(&id("Holder")).unwrap();

    assert_eq!(holder.to_json()["properties"]["value"]["type"], expected);
}
