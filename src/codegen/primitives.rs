//! Primitive type spellings

/// Map a primitive name to its Zig spelling.
///
/// Unknown names pass through unchanged.
pub fn map_primitive(name: &str) -> &str {
    match name {
        "string" => "[]const u8",
        "number" | "integer" => "i64",
        "uinteger" => "u64",
        "decimal" => "f64",
        "boolean" => "bool",
        "object" | "any" | "unknown" => "std.json.Value",
        "null" | "undefined" | "void" => "void",
        "never" => "noreturn",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_primitive() {
        assert_eq!(map_primitive("string"), "[]const u8");
        assert_eq!(map_primitive("number"), "i64");
        assert_eq!(map_primitive("uinteger"), "u64");
        assert_eq!(map_primitive("boolean"), "bool");
        assert_eq!(map_primitive("unknown"), "std.json.Value");
    }

    #[test]
    fn test_unknown_names_pass_through() {
        assert_eq!(map_primitive("DocumentUri"), "DocumentUri");
        assert_eq!(map_primitive("u32"), "u32");
    }
}
