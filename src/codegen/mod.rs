//! Code Generation
//!
//! Lowers reflection declarations into Zig source text.
//!
//! Architecture:
//! - Emitter: bound to one schema document, appends to a shared output buffer
//! - types: type node translation (unions, intersections, tuples, ...)
//! - decls: declaration translation (interfaces, namespaces, enums, ...)
//! - EmittedNames: names already emitted this run, shared by both emitters

pub mod decls;
pub mod filter;
pub mod names;
pub mod primitives;
pub mod types;

pub use filter::ExclusionFilter;
pub use names::escape_name;
pub use primitives::map_primitive;

use std::collections::HashSet;
use tracing::debug;

use crate::error::Result;
use crate::schema::{Declaration, Resolver, SchemaHandle};

/// Mixin requested by literal-only unions (declared in the preamble)
pub const STRING_ENUM_MIXIN: &str = "StringBackedEnumStringify";

/// Mixin requested by integer-backed namespaces (declared in the preamble)
pub const INT_ENUM_MIXIN: &str = "IntBackedEnumStringify";

/// Emitted in place of indexed access types
pub const INDEXED_ACCESS_PLACEHOLDER: &str =
    "@compileError(\"indexed access types are not supported\")";

/// Emitted in place of `typeof` queries
pub const TYPE_QUERY_PLACEHOLDER: &str = "@compileError(\"type queries are not supported\")";

/// Emitted where a human has to finish the translation
pub const MANUAL_PLACEHOLDER: &str = "@compileError(\"manual translation required\")";

// =============================================================================
// Emitted Names
// =============================================================================

/// Names emitted so far, in emission order. Only ever grows.
#[derive(Debug, Default)]
pub struct EmittedNames {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl EmittedNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a name; false if it was already present
    pub fn insert(&mut self, name: &str) -> bool {
        if !self.seen.insert(name.to_string()) {
            return false;
        }
        self.order.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Emitted names with this suffix, in emission order
    pub fn ending_with<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a str> {
        self.iter().filter(move |name| name.ends_with(suffix))
    }
}

// =============================================================================
// Emitter
// =============================================================================

/// Emits declarations of one schema document into a shared buffer
pub struct Emitter<'a> {
    resolver: &'a dyn Resolver,
    /// Document currently being read; switches to the companion while
    /// inlining intersection members
    schema: SchemaHandle,
    emitted: &'a mut EmittedNames,
    out: &'a mut String,
}

impl<'a> Emitter<'a> {
    pub fn new(
        resolver: &'a dyn Resolver,
        schema: SchemaHandle,
        emitted: &'a mut EmittedNames,
        out: &'a mut String,
    ) -> Self {
        Self {
            resolver,
            schema,
            emitted,
            out,
        }
    }

    pub fn schema(&self) -> SchemaHandle {
        self.schema
    }

    /// Emit a top-level declaration unless its name was already emitted.
    ///
    /// Returns whether anything was written.
    pub fn emit_top_level(&mut self, decl: &Declaration) -> Result<bool> {
        if self.emitted.contains(&decl.name) {
            debug!(name = %decl.name, schema = %self.schema, "already emitted, skipping");
            return Ok(false);
        }

        let written = self.emit_declaration(decl)?;
        if written {
            self.emitted.insert(&decl.name);
            self.out.push('\n');
        }
        Ok(written)
    }

    pub(crate) fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Run `f` while reading from another document
    pub(crate) fn in_schema<T>(
        &mut self,
        schema: SchemaHandle,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let previous = std::mem::replace(&mut self.schema, schema);
        let result = f(self);
        self.schema = previous;
        result
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::{json, Value};

    use super::{EmittedNames, Emitter};
    use crate::error::Result;
    use crate::schema::{Declaration, SchemaDocument, SchemaHandle, SchemaSet};

    pub fn document(children: Value) -> SchemaDocument {
        let root: Declaration =
            serde_json::from_value(json!({ "id": 0, "name": "root", "children": children })).unwrap();
        SchemaDocument::new(root)
    }

    pub fn set(types: Value, protocol: Value) -> SchemaSet {
        SchemaSet::new(document(types), document(protocol))
    }

    pub fn decl(value: Value) -> Declaration {
        serde_json::from_value(value).unwrap()
    }

    /// Run `f` against a fresh emitter and return what it wrote
    pub fn render(
        set: &SchemaSet,
        schema: SchemaHandle,
        f: impl FnOnce(&mut Emitter<'_>) -> Result<()>,
    ) -> String {
        let mut out = String::new();
        let mut emitted = EmittedNames::new();
        let mut emitter = Emitter::new(set, schema, &mut emitted, &mut out);
        f(&mut emitter).unwrap();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_emitted_names_are_monotonic() {
        let mut names = EmittedNames::new();
        assert!(names.insert("Position"));
        assert!(!names.insert("Position"));
        assert!(names.insert("InitializeRequest"));
        assert_eq!(names.len(), 2);
        assert_eq!(names.ending_with("Request").collect::<Vec<_>>(), vec!["InitializeRequest"]);
    }

    #[test]
    fn test_top_level_skips_emitted_names() {
        let set = set(json!([]), json!([]));
        let position = decl(json!({
            "id": 1, "name": "Position", "kindString": "Type alias",
            "type": { "type": "intrinsic", "name": "number" }
        }));

        let mut out = String::new();
        let mut emitted = EmittedNames::new();
        {
            let mut types = Emitter::new(&set, SchemaHandle::Types, &mut emitted, &mut out);
            assert!(types.emit_top_level(&position).unwrap());
        }
        {
            let mut protocol = Emitter::new(&set, SchemaHandle::Protocol, &mut emitted, &mut out);
            assert!(!protocol.emit_top_level(&position).unwrap());
        }
        assert_eq!(out.matches("pub const Position").count(), 1);
    }

    #[test]
    fn test_skipped_declarations_are_not_recorded() {
        let set = set(json!([]), json!([]));
        let method = decl(json!({ "id": 1, "name": "create", "kindString": "Function" }));

        let mut out = String::new();
        let mut emitted = EmittedNames::new();
        let mut emitter = Emitter::new(&set, SchemaHandle::Types, &mut emitted, &mut out);
        assert!(!emitter.emit_top_level(&method).unwrap());
        assert!(!emitted.contains("create"));
        assert!(out.is_empty());
    }
}
