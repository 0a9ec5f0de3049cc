//! Schema Documents
//!
//! Loads TypeDoc reflection projects and provides lookup by id and by name.
//! Documents are immutable after loading; the emitter reaches them through
//! the [`Resolver`] capability so cross-document lookups stay explicit.

pub mod model;

pub use model::{
    Comment, Declaration, DeclarationKind, Flags, LiteralValue, SourceRef, TypeNode, TypeParameter,
};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{GenError, Result};

/// Name TypeDoc gives the container of non-exported declarations
pub const INTERNAL_CONTAINER: &str = "<internal>";

/// Child-index path from the document root to a declaration
type DeclPath = Vec<usize>;

// =============================================================================
// Schema Document
// =============================================================================

/// One reflection project, indexed for lookup
#[derive(Debug)]
pub struct SchemaDocument {
    root: Declaration,
    by_id: HashMap<u64, DeclPath>,
    /// Names of container-level declarations; candidates in id order
    by_name: HashMap<String, Vec<DeclPath>>,
}

impl SchemaDocument {
    /// Build the indexes for a reflection root
    pub fn new(root: Declaration) -> Self {
        let mut doc = Self {
            root,
            by_id: HashMap::new(),
            by_name: HashMap::new(),
        };

        let mut by_id = HashMap::new();
        let mut by_name: HashMap<String, Vec<DeclPath>> = HashMap::new();
        index_children(&doc.root, &mut Vec::new(), true, &mut by_id, &mut by_name);

        for paths in by_name.values_mut() {
            paths.sort_by_key(|p| resolve_path(&doc.root, p).map(|d| d.id));
        }

        doc.by_id = by_id;
        doc.by_name = by_name;
        doc
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let root: Declaration = serde_json::from_str(json)?;
        Ok(Self::new(root))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
            .map_err(|e| GenError::InvalidSchema(format!("{}: {}", path.display(), e)))
    }

    pub fn root(&self) -> &Declaration {
        &self.root
    }

    /// Top-level declarations in id order
    pub fn top_level(&self) -> Vec<&Declaration> {
        self.root.sorted_children()
    }

    /// The `<internal>` container, if the project has one
    pub fn internal(&self) -> Option<&Declaration> {
        self.root.children.iter().find(|c| c.name == INTERNAL_CONTAINER)
    }

    pub fn by_id(&self, id: u64) -> Option<&Declaration> {
        self.by_id.get(&id).and_then(|p| resolve_path(&self.root, p))
    }

    /// All container-level declarations with this name, in id order
    pub fn by_name(&self, name: &str) -> Vec<&Declaration> {
        self.by_name
            .get(name)
            .map(|paths| paths.iter().filter_map(|p| resolve_path(&self.root, p)).collect())
            .unwrap_or_default()
    }

    /// Whether a namespace without callable members claims this name
    pub fn has_data_namespace(&self, name: &str) -> bool {
        self.by_name(name)
            .iter()
            .any(|d| d.kind == DeclarationKind::Namespace && !d.has_callable_child())
    }

    /// Search declaration names (fuzzy), best match first
    pub fn search(&self, query: &str, limit: usize) -> Vec<String> {
        let matcher = SkimMatcherV2::default();
        let mut results: Vec<(i64, &str)> = self
            .by_name
            .keys()
            .filter_map(|name| matcher.fuzzy_match(name, query).map(|score| (score, name.as_str())))
            .collect();

        results.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));

        results
            .into_iter()
            .take(limit)
            .map(|(_, name)| name.to_string())
            .collect()
    }

    pub fn declaration_count(&self) -> usize {
        self.by_id.len()
    }
}

fn index_children(
    parent: &Declaration,
    path: &mut DeclPath,
    named: bool,
    by_id: &mut HashMap<u64, DeclPath>,
    by_name: &mut HashMap<String, Vec<DeclPath>>,
) {
    for (i, child) in parent.children.iter().enumerate() {
        path.push(i);
        by_id.insert(child.id, path.clone());
        if named {
            by_name.entry(child.name.clone()).or_default().push(path.clone());
        }
        let child_named =
            named && (child.kind == DeclarationKind::Namespace || child.name == INTERNAL_CONTAINER);
        index_children(child, path, child_named, by_id, by_name);
        path.pop();
    }
}

fn resolve_path<'a>(root: &'a Declaration, path: &[usize]) -> Option<&'a Declaration> {
    path.iter().try_fold(root, |decl, &i| decl.children.get(i))
}

// =============================================================================
// Resolution
// =============================================================================

/// Which of the two documents a lookup targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaHandle {
    /// Foundational type definitions
    Types,
    /// Protocol operations built on the types
    Protocol,
}

impl SchemaHandle {
    /// The other document of the pair
    pub fn companion(self) -> Self {
        match self {
            Self::Types => Self::Protocol,
            Self::Protocol => Self::Types,
        }
    }
}

impl fmt::Display for SchemaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Types => write!(f, "types"),
            Self::Protocol => write!(f, "protocol"),
        }
    }
}

/// Lookup capability over a pair of schema documents.
///
/// A failed lookup is fatal: the documents are mismatched or broken.
pub trait Resolver {
    fn document(&self, schema: SchemaHandle) -> &SchemaDocument;

    fn by_id(&self, schema: SchemaHandle, id: u64) -> Result<&Declaration> {
        self.document(schema)
            .by_id(id)
            .ok_or(GenError::UnresolvedId { schema, id })
    }

    /// Resolve a name, preferring interfaces, then anything with children
    fn by_name(&self, schema: SchemaHandle, name: &str) -> Result<&Declaration> {
        let doc = self.document(schema);
        let candidates = doc.by_name(name);

        candidates
            .iter()
            .find(|d| d.kind == DeclarationKind::Interface)
            .or_else(|| candidates.iter().find(|d| !d.children.is_empty()))
            .or_else(|| candidates.first())
            .copied()
            .ok_or_else(|| GenError::UnresolvedName {
                schema,
                name: name.to_string(),
                suggestions: doc.search(name, 3),
            })
    }
}

/// The two documents of one run
#[derive(Debug)]
pub struct SchemaSet {
    pub types: SchemaDocument,
    pub protocol: SchemaDocument,
}

impl SchemaSet {
    pub fn new(types: SchemaDocument, protocol: SchemaDocument) -> Self {
        Self { types, protocol }
    }

    pub fn load(types: &Path, protocol: &Path) -> Result<Self> {
        Ok(Self::new(
            SchemaDocument::from_path(types)?,
            SchemaDocument::from_path(protocol)?,
        ))
    }
}

impl Resolver for SchemaSet {
    fn document(&self, schema: SchemaHandle) -> &SchemaDocument {
        match schema {
            SchemaHandle::Types => &self.types,
            SchemaHandle::Protocol => &self.protocol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> SchemaDocument {
        let root: Declaration = serde_json::from_value(json!({
            "id": 0,
            "name": "types",
            "kindString": "Project",
            "children": [
                {
                    "id": 20, "name": "Position", "kindString": "Namespace",
                    "children": [{ "id": 21, "name": "create", "kindString": "Function" }]
                },
                {
                    "id": 10, "name": "Position", "kindString": "Interface",
                    "children": [
                        { "id": 11, "name": "line", "kindString": "Property",
                          "type": { "type": "intrinsic", "name": "number" } }
                    ]
                },
                {
                    "id": 30, "name": "<internal>", "kindString": "Namespace",
                    "children": [{ "id": 31, "name": "Hidden", "kindString": "Interface" }]
                }
            ]
        }))
        .unwrap();
        SchemaDocument::new(root)
    }

    #[test]
    fn test_lookup_by_id() {
        let doc = sample();
        assert_eq!(doc.by_id(11).map(|d| d.name.as_str()), Some("line"));
        assert_eq!(doc.by_id(31).map(|d| d.name.as_str()), Some("Hidden"));
        assert!(doc.by_id(99).is_none());
    }

    #[test]
    fn test_lookup_by_name_is_id_ordered() {
        let doc = sample();
        let ids: Vec<u64> = doc.by_name("Position").iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![10, 20]);
        // Fields are not container-level names
        assert!(doc.by_name("line").is_empty());
        // Namespace members are
        assert_eq!(doc.by_name("Hidden").len(), 1);
    }

    #[test]
    fn test_internal_members_are_named_whatever_its_kind() {
        let doc = SchemaDocument::from_json(
            r#"{ "id": 0, "name": "protocol", "children": [
                { "id": 1, "name": "<internal>", "kindString": "Project",
                  "children": [{ "id": 2, "name": "WorkDoneProgressParams", "kindString": "Interface" }] }
            ] }"#,
        )
        .unwrap();
        assert_eq!(doc.by_name("WorkDoneProgressParams").len(), 1);
    }

    #[test]
    fn test_top_level_and_internal() {
        let doc = sample();
        let ids: Vec<u64> = doc.top_level().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
        assert_eq!(doc.internal().map(|d| d.id), Some(30));
    }

    #[test]
    fn test_data_namespace_detection() {
        let doc = sample();
        // Position namespace only holds a function
        assert!(!doc.has_data_namespace("Position"));
    }

    #[test]
    fn test_resolver_prefers_interface() {
        let empty = SchemaDocument::new(serde_json::from_value(json!({ "id": 0, "name": "p" })).unwrap());
        let set = SchemaSet::new(sample(), empty);
        let decl = set.by_name(SchemaHandle::Types, "Position").unwrap();
        assert_eq!(decl.kind, DeclarationKind::Interface);
    }

    #[test]
    fn test_resolver_failures_are_errors() {
        let empty = SchemaDocument::new(serde_json::from_value(json!({ "id": 0, "name": "p" })).unwrap());
        let set = SchemaSet::new(sample(), empty);

        assert!(matches!(
            set.by_id(SchemaHandle::Protocol, 10),
            Err(GenError::UnresolvedId { id: 10, .. })
        ));

        match set.by_name(SchemaHandle::Types, "Positon") {
            Err(GenError::UnresolvedName { suggestions, .. }) => {
                assert_eq!(suggestions.first().map(String::as_str), Some("Position"));
            }
            other => panic!("Expected UnresolvedName, got {:?}", other),
        }
    }

    #[test]
    fn test_companion() {
        assert_eq!(SchemaHandle::Types.companion(), SchemaHandle::Protocol);
        assert_eq!(SchemaHandle::Protocol.companion(), SchemaHandle::Types);
    }
}
