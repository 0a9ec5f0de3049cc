//! Reflection Model
//!
//! Typed view of a TypeDoc reflection tree. Declaration kinds and type node
//! shapes are closed enums so the emitter dispatch is an exhaustive match.

use serde::Deserialize;
use std::fmt;

// =============================================================================
// Declaration
// =============================================================================

/// One named reflection (interface, property, namespace, ...)
#[derive(Debug, Clone, Deserialize)]
pub struct Declaration {
    /// Stable identifier assigned by the reflection tool, in source order
    pub id: u64,

    pub name: String,

    #[serde(rename = "kindString", default)]
    pub kind: DeclarationKind,

    #[serde(default)]
    pub flags: Flags,

    #[serde(default)]
    pub comment: Option<Comment>,

    /// Children in serialized (alphabetical) order; see [`Declaration::sorted_children`]
    #[serde(default)]
    pub children: Vec<Declaration>,

    #[serde(rename = "type", default)]
    pub ty: Option<TypeNode>,

    #[serde(rename = "typeParameter", alias = "typeParameters", default)]
    pub type_parameters: Vec<TypeParameter>,

    /// Target id of a `Reference` declaration
    #[serde(default)]
    pub target: Option<u64>,

    #[serde(default)]
    pub sources: Vec<SourceRef>,

    /// Initializer as source text (enum members, variables)
    #[serde(rename = "defaultValue", default)]
    pub default_value: Option<String>,

    /// Call signatures of a function-shaped type literal
    #[serde(default)]
    pub signatures: Vec<Declaration>,
}

impl Declaration {
    /// Children ordered by ascending id (original declaration order)
    pub fn sorted_children(&self) -> Vec<&Declaration> {
        let mut children: Vec<&Declaration> = self.children.iter().collect();
        children.sort_by_key(|c| c.id);
        children
    }

    /// Doc blurb, if any
    pub fn doc(&self) -> Option<String> {
        self.comment.as_ref().and_then(Comment::blurb)
    }

    pub fn is_optional(&self) -> bool {
        self.flags.is_optional
    }

    /// Functions, methods, signatures, and variables holding a function literal
    pub fn is_callable(&self) -> bool {
        if self.kind.is_behavior() {
            return true;
        }
        matches!(&self.ty, Some(TypeNode::Reflection { declaration }) if !declaration.signatures.is_empty())
    }

    pub fn has_callable_child(&self) -> bool {
        self.children.iter().any(Declaration::is_callable)
    }

    /// Source files this declaration was reflected from
    pub fn source_files(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.file_name.as_str())
    }

    /// The literal value of this declaration's type, if it is a single literal
    pub fn literal_type(&self) -> Option<&LiteralValue> {
        match &self.ty {
            Some(TypeNode::Literal { value }) => Some(value),
            _ => None,
        }
    }
}

/// Reflection kind, read from `kindString`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DeclarationKind {
    /// Re-export of another declaration (`export { A as B }`)
    Reference,
    Interface,
    /// Data field of an interface or type literal
    Property,
    TypeAlias,
    /// Anonymous structural type (`{ a: string }`)
    TypeLiteral,
    /// Namespace or module
    Namespace,
    /// `const`/`let` binding
    Variable,
    Enumeration,
    EnumerationMember,
    Method,
    Class,
    Function,
    Constructor,
    CallSignature,
    ConstructorSignature,
    Other(String),
}

impl DeclarationKind {
    /// Kinds that describe behavior rather than data shape
    pub fn is_behavior(&self) -> bool {
        matches!(
            self,
            Self::Method
                | Self::Class
                | Self::Function
                | Self::Constructor
                | Self::CallSignature
                | Self::ConstructorSignature
        )
    }
}

impl Default for DeclarationKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for DeclarationKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Reference" => Self::Reference,
            "Interface" => Self::Interface,
            "Property" => Self::Property,
            "Type alias" => Self::TypeAlias,
            "Type literal" => Self::TypeLiteral,
            "Namespace" | "Module" => Self::Namespace,
            "Variable" => Self::Variable,
            "Enumeration" => Self::Enumeration,
            "Enumeration member" | "Enumeration Member" => Self::EnumerationMember,
            "Method" => Self::Method,
            "Class" => Self::Class,
            "Function" => Self::Function,
            "Constructor" => Self::Constructor,
            "Call signature" => Self::CallSignature,
            "Constructor signature" => Self::ConstructorSignature,
            _ => Self::Other(value),
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => write!(f, "Reference"),
            Self::Interface => write!(f, "Interface"),
            Self::Property => write!(f, "Property"),
            Self::TypeAlias => write!(f, "Type alias"),
            Self::TypeLiteral => write!(f, "Type literal"),
            Self::Namespace => write!(f, "Namespace"),
            Self::Variable => write!(f, "Variable"),
            Self::Enumeration => write!(f, "Enumeration"),
            Self::EnumerationMember => write!(f, "Enumeration member"),
            Self::Method => write!(f, "Method"),
            Self::Class => write!(f, "Class"),
            Self::Function => write!(f, "Function"),
            Self::Constructor => write!(f, "Constructor"),
            Self::CallSignature => write!(f, "Call signature"),
            Self::ConstructorSignature => write!(f, "Constructor signature"),
            Self::Other(kind) => write!(f, "{}", kind),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Flags {
    #[serde(rename = "isOptional", default)]
    pub is_optional: bool,
}

/// Doc comment in either the `shortText` or the `summary` layout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Comment {
    #[serde(rename = "shortText", default)]
    pub short_text: Option<String>,

    #[serde(default)]
    pub summary: Vec<CommentPart>,
}

impl Comment {
    pub fn blurb(&self) -> Option<String> {
        let text = match &self.short_text {
            Some(text) => text.clone(),
            None => self.summary.iter().map(|p| p.text.as_str()).collect(),
        };
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentPart {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeParameter {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceRef {
    #[serde(rename = "fileName")]
    pub file_name: String,
}

// =============================================================================
// Type Node
// =============================================================================

/// A type expression
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TypeNode {
    Intrinsic {
        name: String,
    },
    Reference {
        name: String,
        #[serde(rename = "typeArguments", default)]
        type_arguments: Vec<TypeNode>,
    },
    Array {
        #[serde(rename = "elementType")]
        element_type: Box<TypeNode>,
    },
    Literal {
        value: LiteralValue,
    },
    Union {
        types: Vec<TypeNode>,
    },
    Tuple {
        #[serde(default)]
        elements: Vec<TypeNode>,
    },
    Intersection {
        types: Vec<TypeNode>,
    },
    IndexedAccess {
        #[serde(rename = "objectType", default)]
        object_type: Option<Box<TypeNode>>,
        #[serde(rename = "indexType", default)]
        index_type: Option<Box<TypeNode>>,
    },
    /// `typeof X`
    Query {
        #[serde(rename = "queryType", default)]
        query_type: Option<Box<TypeNode>>,
    },
    /// Inline anonymous declaration
    Reflection {
        declaration: Box<Declaration>,
    },
}

impl TypeNode {
    /// Shape name, used as the fallback tagged-union case name
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Intrinsic { .. } => "intrinsic",
            Self::Reference { .. } => "reference",
            Self::Array { .. } => "array",
            Self::Literal { .. } => "literal",
            Self::Union { .. } => "union",
            Self::Tuple { .. } => "tuple",
            Self::Intersection { .. } => "intersection",
            Self::IndexedAccess { .. } => "indexedAccess",
            Self::Query { .. } => "query",
            Self::Reflection { .. } => "reflection",
        }
    }

    /// Name of a named member (intrinsic or reference)
    pub fn own_name(&self) -> Option<&str> {
        match self {
            Self::Intrinsic { name } | Self::Reference { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }

    pub fn is_null(&self) -> bool {
        match self {
            Self::Literal { value } => matches!(value, LiteralValue::Null),
            Self::Intrinsic { name } => name == "null",
            _ => false,
        }
    }
}

/// Literal value of a literal type
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl LiteralValue {
    /// Text used when the literal names an enum case
    pub fn case_name(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_from_kind_string() {
        assert_eq!(DeclarationKind::from("Type alias".to_string()), DeclarationKind::TypeAlias);
        assert_eq!(DeclarationKind::from("Module".to_string()), DeclarationKind::Namespace);
        assert_eq!(
            DeclarationKind::from("Accessor".to_string()),
            DeclarationKind::Other("Accessor".to_string())
        );
    }

    #[test]
    fn test_deserialize_property() {
        let decl: Declaration = serde_json::from_value(json!({
            "id": 7,
            "name": "x",
            "kindString": "Property",
            "flags": { "isOptional": true },
            "comment": { "shortText": "The x coordinate." },
            "type": { "type": "intrinsic", "name": "number" }
        }))
        .unwrap();

        assert_eq!(decl.kind, DeclarationKind::Property);
        assert!(decl.is_optional());
        assert_eq!(decl.doc().as_deref(), Some("The x coordinate."));
        assert!(matches!(decl.ty, Some(TypeNode::Intrinsic { ref name }) if name == "number"));
    }

    #[test]
    fn test_summary_comment() {
        let comment: Comment = serde_json::from_value(json!({
            "summary": [{ "kind": "text", "text": "Line one" }, { "kind": "code", "text": " `x`" }]
        }))
        .unwrap();
        assert_eq!(comment.blurb().as_deref(), Some("Line one `x`"));
    }

    #[test]
    fn test_literal_values() {
        let node: TypeNode = serde_json::from_value(json!({ "type": "literal", "value": null })).unwrap();
        assert!(node.is_null());

        let node: TypeNode = serde_json::from_value(json!({ "type": "literal", "value": 3 })).unwrap();
        assert!(matches!(node, TypeNode::Literal { value: LiteralValue::Integer(3) }));

        let node: TypeNode = serde_json::from_value(json!({ "type": "literal", "value": "a" })).unwrap();
        assert!(matches!(node, TypeNode::Literal { value: LiteralValue::String(ref s) } if s == "a"));
    }

    #[test]
    fn test_type_query() {
        let node: TypeNode = serde_json::from_value(json!({
            "type": "query",
            "queryType": { "type": "reference", "id": 12, "name": "EOL" }
        }))
        .unwrap();
        assert!(matches!(node, TypeNode::Query { query_type: Some(_) }));
        assert_eq!(node.kind_name(), "query");
    }

    #[test]
    fn test_unknown_type_shape_is_rejected() {
        let result: Result<TypeNode, _> =
            serde_json::from_value(json!({ "type": "conditional", "checkType": {} }));
        assert!(result.is_err());
    }

    #[test]
    fn test_sorted_children_follow_ids() {
        let decl: Declaration = serde_json::from_value(json!({
            "id": 1,
            "name": "Range",
            "kindString": "Interface",
            "children": [
                { "id": 5, "name": "end", "kindString": "Property" },
                { "id": 3, "name": "start", "kindString": "Property" }
            ]
        }))
        .unwrap();
        let names: Vec<&str> = decl.sorted_children().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["start", "end"]);
    }

    #[test]
    fn test_callable_detection() {
        let decl: Declaration = serde_json::from_value(json!({
            "id": 1,
            "name": "create",
            "kindString": "Variable",
            "type": {
                "type": "reflection",
                "declaration": {
                    "id": 2,
                    "name": "__type",
                    "kindString": "Type literal",
                    "signatures": [{ "id": 3, "name": "__call", "kindString": "Call signature" }]
                }
            }
        }))
        .unwrap();
        assert!(decl.is_callable());
    }
}
