#![allow(non_snake_case)]

use super::*;
use crate::declaration::{Declaration, DeclarationSet, EnumValue, RegistrationSet, ScalarKind, TypeExpr};
use crate::schema::Literal;
use crate::test_support::*;

fn names(node: &SchemaNode) -> Vec<String> {
    node.as_object()
        .unwrap()
        .properties
        .iter()
        .map(|prop| prop.name.clone())
        .collect()
}

#[test]
fn flatten___skipped_fields___are_omitted() {
    let declarations: DeclarationSet = [structure(
        "User",
        vec![
            Field::new("name", string()),
            Field::new("password", string()).skipped(),
            Field::new("email", string()),
        ],
    )]
    .into_iter()
    .collect();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let user = resolver.resolve(&id("User")).unwrap();

    assert_eq!(names(&user), vec!["name", "email"]);
}

#[test]
fn flatten___json_name___is_used_as_property_name() {
    let declarations: DeclarationSet = [structure(
        "User",
        vec![Field::new("DisplayName", string()).json("display_name")],
    )]
    .into_iter()
    .collect();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let user = resolver.resolve(&id("User")).unwrap();

    assert_eq!(names(&user), vec!["display_name"]);
}

#[test]
fn flatten___embedded_struct___splices_fields_in_place() {
    let declarations: DeclarationSet = [
        structure(
            "Meta",
            vec![Field::new("createdAt", string()), Field::new("updatedAt", string())],
        ),
        structure(
            "Post",
            vec![
                Field::new("id", string()),
                Field::embedded(&id("Meta")),
                Field::new("title", string()),
            ],
        ),
    ]
    .into_iter()
    .collect();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let post = resolver.resolve(&id("Post")).unwrap();

    assert_eq!(names(&post), vec!["id", "createdAt", "updatedAt", "title"]);
}

#[test]
fn flatten___nested_embedding_through_pointer___splices_recursively() {
    let declarations: DeclarationSet = [
        structure("Base", vec![Field::new("id", string())]),
        structure("Meta", vec![Field::embedded(&id("Base")), Field::new("tags", string())]),
        structure(
            "Post",
            vec![Field {
                type_expr: TypeExpr::pointer(named("Meta")),
                ..Field::embedded(&id("Meta"))
            }],
        ),
    ]
    .into_iter()
    .collect();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let post = resolver.resolve(&id("Post")).unwrap();

    assert_eq!(names(&post), vec!["id", "tags"]);
}

#[test]
fn flatten___two_embedded_structs_with_same_name___fail_with_duplicate() {
    let declarations: DeclarationSet = [
        structure("A", vec![Field::new("id", string()).at(Position::new("t.toml", 2, 1))]),
        structure("B", vec![Field::new("id", string()).at(Position::new("t.toml", 5, 1))]),
        structure("Both", vec![Field::embedded(&id("A")), Field::embedded(&id("B"))]),
    ]
    .into_iter()
    .collect();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let err = resolver.resolve(&id("Both")).unwrap_err();

    assert_eq!(
        err,
        SchemaError::DuplicateJsonName {
            name: "id".into(),
            owner: "shapes::Both".into(),
            first: Position::new("t.toml", 2, 1),
            position: Position::new("t.toml", 5, 1),
        }
    );
}

#[test]
fn flatten___embedded_collision_with_outer_field___fails_before_any_resolution() {
    let declarations: DeclarationSet = [
        structure("A", vec![Field::new("id", string())]),
        structure(
            "Outer",
            vec![
                Field::new("meta", named("Expensive")),
                Field::new("id", string()),
                Field::embedded(&id("A")),
            ],
        ),
        structure("Expensive", vec![Field::new("value", string())]),
    ]
    .into_iter()
    .collect();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let err = resolver.resolve(&id("Outer")).unwrap_err();

    assert!(matches!(err, SchemaError::DuplicateJsonName { .. }));
    assert!(!resolver.store().contains(&id("Expensive")));
}

#[test]
fn flatten___direct_fields_with_same_wire_name___fail_with_duplicate() {
    let declarations: DeclarationSet = [structure(
        "User",
        vec![Field::new("Name", string()).json("name"), Field::new("name", string())],
    )]
    .into_iter()
    .collect();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let err = resolver.resolve(&id("User")).unwrap_err();

    assert!(matches!(err, SchemaError::DuplicateJsonName { name, .. } if name == "name"));
}

#[test]
fn flatten___skipped_field_with_same_wire_name___does_not_collide() {
    let declarations: DeclarationSet = [structure(
        "User",
        vec![Field::new("secret", string()).json("name").skipped(), Field::new("name", string())],
    )]
    .into_iter()
    .collect();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let user = resolver.resolve(&id("User")).unwrap();

    assert_eq!(names(&user), vec!["name"]);
}

#[test]
fn flatten___embedding_itself___fails_with_cyclic_type() {
    let declarations: DeclarationSet = [
        structure("A", vec![Field::embedded(&id("B"))]),
        structure("B", vec![Field::embedded(&id("A"))]),
    ]
    .into_iter()
    .collect();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let err = resolver.resolve(&id("A")).unwrap_err();

    assert!(matches!(err, SchemaError::CyclicType { chain, .. } if chain == "shapes::A -> shapes::B -> shapes::A"));
}

#[test]
fn flatten___embedded_non_struct___fails_with_unsupported_type() {
    let declarations: DeclarationSet = [
        Declaration::scalar(id("Code"), ScalarKind::Integer),
        structure("Holder", vec![Field::embedded(&id("Code"))]),
    ]
    .into_iter()
    .collect();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let err = resolver.resolve(&id("Holder")).unwrap_err();

    assert!(matches!(err, SchemaError::UnsupportedType { detail, .. } if detail.contains("expected a struct")));
}

#[test]
fn flatten___field_doc___overrides_type_description() {
    let declarations: DeclarationSet = [
        structure("Point", vec![Field::new("x", number())]).with_doc("A point"),
        structure(
            "Line",
            vec![
                Field::new("start", named("Point")).doc("Where the line starts"),
                Field::new("end", named("Point")),
            ],
        ),
    ]
    .into_iter()
    .collect();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let line = resolver.resolve(&id("Line")).unwrap();
    let point = resolver.resolve(&id("Point")).unwrap();

    let line = line.as_object().unwrap();
    assert_eq!(line.property("start").unwrap().schema.description(), Some("Where the line starts"));
    assert_eq!(line.property("end").unwrap().schema.description(), Some("A point"));
    assert_eq!(point.description(), Some("A point"));
}

#[test]
fn flatten___optional_field___is_not_required() {
    let declarations: DeclarationSet = [structure(
        "User",
        vec![Field::new("name", string()), Field::new("nickname", string()).optional()],
    )]
    .into_iter()
    .collect();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let user = resolver.resolve(&id("User")).unwrap();

    let required: Vec<&str> = user.as_object().unwrap().required().collect();
    assert_eq!(required, vec!["name"]);
}

#[test]
fn flatten___enum_override___replaces_enum_values_on_scalar_field() {
    let declarations: DeclarationSet = [structure(
        "Task",
        vec![Field::new("priority", TypeExpr::Builtin(ScalarKind::Integer))
            .with_enum(vec![Literal::Integer(0), Literal::Integer(1)])],
    )]
    .into_iter()
    .collect();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let task = resolver.resolve(&id("Task")).unwrap();

    let priority = task.as_object().unwrap().property("priority").unwrap();
    let property = priority.schema.as_property().unwrap();
    assert_eq!(property.kind, ScalarKind::Integer);
    assert_eq!(property.enum_values, vec![Literal::Integer(0), Literal::Integer(1)]);
}

#[test]
fn flatten___enum_override_on_object_field___fails_with_unsupported_type() {
    let declarations: DeclarationSet = [
        structure("Point", vec![Field::new("x", number())]),
        structure(
            "Line",
            vec![Field::new("start", named("Point")).with_enum(vec![Literal::from("a")])],
        ),
    ]
    .into_iter()
    .collect();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let err = resolver.resolve(&id("Line")).unwrap_err();

    assert!(matches!(err, SchemaError::UnsupportedType { .. }));
}

fn alerts() -> DeclarationSet {
    [
        Declaration::enum_set(
            id("Level"),
            ScalarKind::Integer,
            vec![
                EnumValue::literal("Low", "1"),
                EnumValue::literal("Medium", "2"),
                EnumValue::literal("High", "3").doc("Page someone"),
            ],
        ),
        structure(
            "Alert",
            vec![
                Field::new("level", named("Level")).with_enum_mode(EnumMode::Names),
                Field::new("raw", named("Level")),
            ],
        ),
    ]
    .into_iter()
    .collect()
}

#[test]
fn flatten___field_enum_mode_names___renders_constant_names_at_that_field_only() {
    let declarations = alerts();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let alert = resolver.resolve(&id("Alert")).unwrap();
    let level = resolver.resolve(&id("Level")).unwrap();

    let alert = alert.as_object().unwrap();
    let named_level = alert.property("level").unwrap().schema.as_property().unwrap();
    assert_eq!(named_level.kind, ScalarKind::String);
    assert_eq!(
        named_level.enum_values,
        vec![Literal::from("Low"), Literal::from("Medium"), Literal::from("High")]
    );
    assert_eq!(named_level.description, "High: Page someone");

    let raw_level = alert.property("raw").unwrap().schema.as_property().unwrap();
    assert_eq!(raw_level.kind, ScalarKind::Integer);
    assert_eq!(
        raw_level.enum_values,
        vec![Literal::Integer(1), Literal::Integer(2), Literal::Integer(3)]
    );
    assert_eq!(level.as_property().unwrap().kind, ScalarKind::Integer);
}

#[test]
fn flatten___field_enum_mode_on_struct_field___fails_with_unsupported_type() {
    let declarations: DeclarationSet = [
        structure("Point", vec![Field::new("x", number())]),
        structure(
            "Line",
            vec![Field::new("start", named("Point")).with_enum_mode(EnumMode::Names)],
        ),
    ]
    .into_iter()
    .collect();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let err = resolver.resolve(&id("Line")).unwrap_err();

    assert!(matches!(err, SchemaError::UnsupportedType { ref detail, .. } if detail.contains("enum mode `names`")));
}

#[test]
fn flatten___inline_struct___becomes_anonymous_object() {
    let declarations: DeclarationSet = [structure(
        "Config",
        vec![Field::new(
            "limits",
            TypeExpr::InlineStruct(vec![Field::new("max", number()), Field::new("min", number())]),
        )],
    )]
    .into_iter()
    .collect();
    let registrations = RegistrationSet::default();
    let mut resolver = resolver(&declarations, &registrations);

    let config = resolver.resolve(&id("Config")).unwrap();

    let limits = config.as_object().unwrap().property("limits").unwrap();
    assert_eq!(names(&limits.schema), vec!["max", "min"]);
    // Config only; inline structs are not memoized
    assert_eq!(resolver.store().synthesis_count(), 1);
}
