//! Shared utility functions for code generation.

/// Convert a string to PascalCase (e.g., "hello_world" -> "HelloWorld")
///
/// Underscores, dashes, dots and spaces all act as word separators.
pub fn to_pascal_case(s: &str) -> String {
    s.split(['_', '-', '.', ' '])
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Convert a string to snake_case (e.g., "HelloWorld" -> "hello_world")
///
/// Runs of capitals are treated as one word, so "OrderID" becomes
/// "order_id" and "HTTPStatus" becomes "http_status".
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '-' | '.' | ' ' | '_') {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !result.ends_with('_') {
                result.push('_');
            }
        }

        result.extend(c.to_lowercase());
    }

    result
}

/// Check whether `name` is a valid identifier: a letter or underscore
/// followed by letters, digits or underscores.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
