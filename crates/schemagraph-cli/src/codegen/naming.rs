//! Naming convention utilities for generated dispatch code.

/// Convert a type name or label to snake_case.
///
/// Acronym runs stay together and any character that cannot appear in a
/// Rust identifier becomes an underscore.
///
/// # Examples
///
/// ```
/// use schemagraph_cli::codegen::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("Shape"), "shape");
/// assert_eq!(to_snake_case("MainShape"), "main_shape");
/// assert_eq!(to_snake_case("HTTPServer"), "http_server");
/// assert_eq!(to_snake_case("Circle2"), "circle2");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (index, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }

        if c.is_ascii_uppercase() && index > 0 {
            let previous = chars[index - 1];
            let next_is_lower = chars
                .get(index + 1)
                .is_some_and(|next| next.is_ascii_lowercase());
            let boundary = previous.is_ascii_lowercase()
                || previous.is_ascii_digit()
                || (previous.is_ascii_uppercase() && next_is_lower);
            if boundary && !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
        }

        result.push(c.to_ascii_lowercase());
    }

    while result.ends_with('_') {
        result.pop();
    }

    result
}
