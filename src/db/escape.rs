//! String escaping utilities for MySQL statements.

/// Escape a string for use inside a single-quoted MySQL string literal.
pub fn escape_string_literal(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 2);
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\0' => result.push_str("\\0"),
            '\u{1a}' => result.push_str("\\Z"),
            c => result.push(c),
        }
    }
    result
}

/// Escape the LIKE wildcards in `s` so the pattern only matches `s` itself.
///
/// The result still needs [`escape_string_literal`] before it is placed in
/// a statement.
pub fn escape_like_pattern(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 2);
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}
