//! Enumeration synthesis

use crate::declaration::{Declaration, EnumMode, EnumValue, ScalarKind};
use crate::error::{SchemaError, SchemaResult};
use crate::schema::{Literal, PropertyNode, SchemaNode};

/// Build the property schema of an enumeration.
///
/// Values keep their declared order. The description starts with the type's
/// own documentation, followed by one `<value>: <doc>` block per documented value.
/// In [`EnumMode::Names`] the schema is a string enumeration of the constant
/// names and the blocks are keyed by name.
pub(crate) fn synthesize_enum(
    declaration: &Declaration,
    kind: ScalarKind,
    values: &[EnumValue],
    mode: EnumMode,
    separator: &str,
) -> SchemaResult<SchemaNode> {
    let mut enum_values = Vec::with_capacity(values.len());
    let mut blocks = Vec::new();

    if !declaration.doc.is_empty() {
        blocks.push(declaration.doc.clone());
    }

    for value in values {
        let literal = match mode {
            EnumMode::Literals => parse_literal(declaration, kind, value)?,
            EnumMode::Names => Literal::String(value.name.clone()),
        };
        if !value.doc.is_empty() {
            blocks.push(format!("{}: {}", literal, value.doc));
        }
        enum_values.push(literal);
    }

    let kind = match mode {
        EnumMode::Literals => kind,
        EnumMode::Names => ScalarKind::String,
    };

    Ok(SchemaNode::Property(PropertyNode {
        kind,
        description: blocks.join(separator),
        enum_values,
        const_value: None,
    }))
}

fn parse_literal(
    declaration: &Declaration,
    kind: ScalarKind,
    value: &EnumValue,
) -> SchemaResult<Literal> {
    let non_literal = || SchemaError::NonLiteralEnum {
        type_name: declaration.id.to_string(),
        constant: value.name.clone(),
        position: declaration.position.clone(),
    };

    let text = value.literal.as_deref().ok_or_else(non_literal)?;
    match kind {
        ScalarKind::String => Ok(Literal::String(text.to_string())),
        ScalarKind::Integer => text
            .trim()
            .parse()
            .map(Literal::Integer)
            .map_err(|_| non_literal()),
        // NaN and infinities have no JSON representation
        ScalarKind::Number => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .map(Literal::Number)
            .ok_or_else(non_literal),
        ScalarKind::Boolean => text
            .trim()
            .parse()
            .map(Literal::Boolean)
            .map_err(|_| non_literal()),
    }
}
