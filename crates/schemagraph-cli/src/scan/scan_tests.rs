#![allow(non_snake_case)]

use super::*;
use schemagraph_core::{DeclarationKind, EnumMode};

fn scan_str(types: &str) -> Scan {
    let toml = format!(
        r#"
[project]
name = "test"
roots = ["app::Root"]

[[packages]]
path = "app"

[[packages.types]]
name = "Root"
kind = "struct"
fields = [{{ name = "id", type = "String" }}]
{}
"#,
        types
    );
    let manifest = Manifest::from_str(&toml).unwrap();
    scan(&manifest).unwrap()
}

fn declaration<'a>(scan: &'a Scan, name: &str) -> &'a Declaration {
    let id = TypeIdentity::new("app", name);
    scan.declarations.iter().find(|decl| decl.id == id).unwrap()
}

fn fields(declaration: &Declaration) -> &[Field] {
    match &declaration.kind {
        DeclarationKind::Struct(fields) => fields,
        other => panic!("expected struct, found {:?}", other),
    }
}

#[test]
fn scan___roots___registered_in_order() {
    let scan = scan_str("");

    assert_eq!(scan.registrations.roots(), &[TypeIdentity::new("app", "Root")]);
    assert_eq!(scan.declarations.len(), 1);
}

#[test]
fn scan___struct_field___defaults_wire_name_and_position() {
    let scan = scan_str("");

    let field = &fields(declaration(&scan, "Root"))[0];

    assert_eq!(field.json_name, "id");
    assert_eq!(field.type_expr, TypeExpr::Builtin(ScalarKind::String));
    assert_eq!(field.position.file, "<inline>");
    assert_eq!(field.position.line, 12);
}

#[test]
fn scan___declaration___carries_doc_and_position() {
    let scan = scan_str(
        r#"
[[packages.types]]
name = "Id"
kind = "scalar"
scalar = "integer"
doc = "An identifier"
"#,
    );

    let decl = declaration(&scan, "Id");

    assert_eq!(decl.doc, "An identifier");
    assert_eq!(decl.position.line, 15);
    assert!(matches!(decl.kind, DeclarationKind::Scalar(ScalarKind::Integer)));
}

#[test]
fn scan___skip_markers___mark_field_skipped() {
    let scan = scan_str(
        r#"
[[packages.types]]
name = "Secretive"
kind = "struct"
fields = [
    { name = "hidden", type = "String", json = "-" },
    { name = "internal", type = "String", exported = false },
    { name = "shown", type = "String", json = "visible" },
]
"#,
    );

    let fields = fields(declaration(&scan, "Secretive"));

    assert!(fields[0].skip);
    assert!(fields[1].skip);
    assert!(!fields[2].skip);
    assert_eq!(fields[2].json_name, "visible");
}

#[test]
fn scan___embedded_without_type___uses_field_name() {
    let scan = scan_str(
        r#"
[[packages.types]]
name = "Extended"
kind = "struct"
fields = [{ name = "Root", embedded = true }]
"#,
    );

    let field = &fields(declaration(&scan, "Extended"))[0];

    assert!(field.embedded);
    assert_eq!(field.type_expr, TypeExpr::ident("app", "Root"));
}

#[test]
fn scan___inline_struct___nests_fields() {
    let scan = scan_str(
        r#"
[[packages.types]]
name = "Outer"
kind = "struct"

[[packages.types.fields]]
name = "inner"
type = "struct"
fields = [{ name = "x", type = "i32" }]
"#,
    );

    let field = &fields(declaration(&scan, "Outer"))[0];

    match &field.type_expr {
        TypeExpr::InlineStruct(inner) => assert_eq!(inner[0].name, "x"),
        other => panic!("expected inline struct, found {:?}", other),
    }
}

#[test]
fn scan___field_enum___becomes_literal_override() {
    let scan = scan_str(
        r#"
[[packages.types]]
name = "Paint"
kind = "struct"
fields = [{ name = "coats", type = "i64", enum = [1, 2, 3] }]
"#,
    );

    let field = &fields(declaration(&scan, "Paint"))[0];

    assert_eq!(
        field.enum_override,
        Some(vec![Literal::Integer(1), Literal::Integer(2), Literal::Integer(3)])
    );
}

#[test]
fn scan___string_enum_without_values___uses_constant_names() {
    let scan = scan_str(
        r#"
[[packages.types]]
name = "Color"
kind = "enum"
values = [{ name = "red", doc = "Warm" }, { name = "blue", value = "BLUE" }]
"#,
    );

    match &declaration(&scan, "Color").kind {
        DeclarationKind::EnumSet { kind, values, mode } => {
            assert_eq!(*kind, ScalarKind::String);
            assert_eq!(*mode, EnumMode::Literals);
            assert_eq!(values[0].literal.as_deref(), Some("red"));
            assert_eq!(values[0].doc, "Warm");
            assert_eq!(values[1].literal.as_deref(), Some("BLUE"));
        }
        other => panic!("expected enum, found {:?}", other),
    }
}

#[test]
fn scan___integer_enum_without_value___is_counter_based() {
    let scan = scan_str(
        r#"
[[packages.types]]
name = "Level"
kind = "enum"
repr = "integer"
values = [{ name = "Low" }, { name = "High", value = 2 }]
"#,
    );

    match &declaration(&scan, "Level").kind {
        DeclarationKind::EnumSet { values, .. } => {
            assert_eq!(values[0].literal, None);
            assert_eq!(values[1].literal.as_deref(), Some("2"));
        }
        other => panic!("expected enum, found {:?}", other),
    }
}

#[test]
fn scan___interface___qualifies_implementations_and_registers_discriminator() {
    let scan = scan_str(
        r#"
[[packages.types]]
name = "Node"
kind = "interface"
implementations = ["Root", "other::Leaf"]
discriminator = "kind"
"#,
    );

    let node = TypeIdentity::new("app", "Node");
    match &declaration(&scan, "Node").kind {
        DeclarationKind::InterfaceUnion { implementations } => {
            assert_eq!(implementations[0], TypeIdentity::new("app", "Root"));
            assert_eq!(implementations[1], TypeIdentity::new("other", "Leaf"));
        }
        other => panic!("expected interface, found {:?}", other),
    }
    assert_eq!(scan.registrations.discriminator_override(&node), Some("kind"));
}

#[test]
fn scan___alternatives___keep_label_and_conversion() {
    let scan = scan_str(
        r#"
[[packages.types]]
name = "Payment"
kind = "alternatives"
alternatives = [
    { source = "Root", convert = "from_root", label = "root" },
    { source = "Root", convert = "from_plain" },
]
"#,
    );

    match &declaration(&scan, "Payment").kind {
        DeclarationKind::AlternativeUnion { alternatives } => {
            assert_eq!(alternatives[0].label, "root");
            assert_eq!(alternatives[0].conversion_fn, "from_root");
            assert_eq!(alternatives[1].label, "");
            assert_eq!(alternatives[1].source, TypeIdentity::new("app", "Root"));
        }
        other => panic!("expected alternatives, found {:?}", other),
    }
}

#[test]
fn scan___alias___parses_target_expression() {
    let scan = scan_str(
        r#"
[[packages.types]]
name = "Ids"
kind = "alias"
target = "Vec<String>"
"#,
    );

    match &declaration(&scan, "Ids").kind {
        DeclarationKind::Definition(expr) => {
            assert_eq!(*expr, TypeExpr::array(TypeExpr::Builtin(ScalarKind::String)));
        }
        other => panic!("expected alias, found {:?}", other),
    }
}

#[test]
fn scan___enum_mode___carried_at_type_and_field_level() {
    let scan = scan_str(
        r#"
[[packages.types]]
name = "Level"
kind = "enum"
repr = "integer"
mode = "names"
values = [{ name = "Low" }, { name = "High" }]

[[packages.types]]
name = "Alert"
kind = "struct"
fields = [{ name = "state", type = "Level", enum_mode = "names" }, { name = "raw", type = "Level" }]
"#,
    );

    assert!(matches!(
        declaration(&scan, "Level").kind,
        DeclarationKind::EnumSet { mode: EnumMode::Names, .. }
    ));
    let alert = fields(declaration(&scan, "Alert"));
    assert_eq!(alert[0].enum_mode, Some(EnumMode::Names));
    assert_eq!(alert[1].enum_mode, None);
}

#[test]
fn scan___project_descriptions___registered_for_roots() {
    let manifest = Manifest::from_str(
        r#"
[project]
name = "test"
roots = ["teams::Team"]
descriptions = { "teams::Team" = "A team of people working together" }

[[packages]]
path = "teams"

[[packages.types]]
name = "Team"
kind = "struct"
doc = "Team record"
fields = [{ name = "name", type = "String" }]
"#,
    )
    .unwrap();

    let scan = scan(&manifest).unwrap();

    assert_eq!(
        scan.registrations.description(&TypeIdentity::new("teams", "Team")),
        Some("A team of people working together")
    );
}
