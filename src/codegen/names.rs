//! Name Policy
//!
//! Decides whether a source name can appear bare in Zig output or must be
//! written with the `@"..."` identifier syntax.

/// Source names that collide with Zig keywords in practice
const RESERVED: &[&str] = &["type", "async", "struct", "enum", "export", "import", "error"];

/// Escape a name for use as a declaration, field, or case name
pub fn escape_name(name: &str) -> String {
    if needs_escape(name) {
        format!("@\"{}\"", escape_string_body(name))
    } else {
        name.to_string()
    }
}

fn needs_escape(name: &str) -> bool {
    if RESERVED.contains(&name) {
        return true;
    }
    let mut chars = name.chars();
    match chars.next() {
        None => true,
        Some(first) if first.is_ascii_digit() => true,
        Some(_) => !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
    }
}

/// Render a Zig string literal, quotes included
pub fn string_literal(value: &str) -> String {
    format!("\"{}\"", escape_string_body(value))
}

fn escape_string_body(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
