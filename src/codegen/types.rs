//! Type Node Translation
//!
//! Renders a type expression as Zig type syntax. Zig has no structural
//! unions, so unions are lowered by shape:
//!
//! | Union shape | Rendering |
//! |-------------|-----------|
//! | only literals | `enum { a, b, usingnamespace StringBackedEnumStringify(@This()); }` |
//! | `T \| null` | `?T` |
//! | `A \| B \| null` | `?union(enum) { A: A, B: B }` |
//! | `A \| B` | `union(enum) { A: A, B: B }` |
//!
//! Intersections are flattened into one anonymous struct holding the fields
//! of every member. Members are looked up in the companion document first,
//! then in the document being walked.

use std::collections::HashMap;
use tracing::warn;

use super::names::{escape_name, string_literal};
use super::primitives::map_primitive;
use super::{Emitter, INDEXED_ACCESS_PLACEHOLDER, STRING_ENUM_MIXIN, TYPE_QUERY_PLACEHOLDER};
use crate::error::{GenError, Result};
use crate::schema::{Declaration, LiteralValue, SchemaHandle, TypeNode};

impl<'a> Emitter<'a> {
    /// Emit the Zig rendering of a type node
    pub fn emit_type(&mut self, ty: &TypeNode) -> Result<()> {
        match ty {
            TypeNode::Intrinsic { name } => self.push(map_primitive(name)),
            TypeNode::Reference {
                name,
                type_arguments,
                ..
            } => {
                self.push(&escape_name(name));
                if !type_arguments.is_empty() {
                    self.push("(");
                    self.emit_type_list(type_arguments)?;
                    self.push(")");
                }
            }
            TypeNode::Array { element_type } => {
                self.push("[]const ");
                self.emit_type(element_type)?;
            }
            TypeNode::Literal { value } => self.push(&render_literal(value)),
            TypeNode::Tuple { elements } => {
                self.push("std.meta.Tuple(&.{ ");
                self.emit_type_list(elements)?;
                self.push(" })");
            }
            TypeNode::Union { types } => self.emit_union(types)?,
            TypeNode::Intersection { types } => self.emit_intersection(types)?,
            TypeNode::IndexedAccess { .. } => {
                warn!(schema = %self.schema, "indexed access type is not supported");
                self.push(INDEXED_ACCESS_PLACEHOLDER);
            }
            TypeNode::Query { .. } => {
                warn!(schema = %self.schema, "type query is not supported");
                self.push(TYPE_QUERY_PLACEHOLDER);
            }
            TypeNode::Reflection { declaration } => {
                self.emit_declaration(declaration)?;
            }
        }
        Ok(())
    }

    fn emit_type_list(&mut self, types: &[TypeNode]) -> Result<()> {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.emit_type(ty)?;
        }
        Ok(())
    }

    fn emit_union(&mut self, members: &[TypeNode]) -> Result<()> {
        if members.iter().all(TypeNode::is_literal) {
            self.emit_literal_enum(members);
            return Ok(());
        }

        let nullable = members.iter().any(TypeNode::is_null);
        let cases: Vec<&TypeNode> = members.iter().filter(|m| !m.is_null()).collect();

        if nullable {
            self.push("?");
            match cases.as_slice() {
                [] => {
                    self.push("void");
                    return Ok(());
                }
                [only] => return self.emit_type(only),
                _ => {}
            }
        }

        self.emit_tagged_union(&cases)
    }

    fn emit_literal_enum(&mut self, members: &[TypeNode]) {
        self.push("enum { ");
        for member in members {
            if let TypeNode::Literal { value } = member {
                self.push(&escape_name(&value.case_name()));
                self.push(", ");
            }
        }
        self.push(&format!("usingnamespace {}(@This()); }}", STRING_ENUM_MIXIN));
    }

    fn emit_tagged_union(&mut self, cases: &[&TypeNode]) -> Result<()> {
        self.push("union(enum) { ");
        for (i, (case, member)) in case_names(cases).into_iter().zip(cases).enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push(&escape_name(&case));
            self.push(": ");
            self.emit_type(member)?;
        }
        self.push(" }");
        Ok(())
    }

    fn emit_intersection(&mut self, members: &[TypeNode]) -> Result<()> {
        self.push("struct {\n");
        for member in members {
            match member {
                TypeNode::Reference { name, .. } => {
                    let (home, interface) = self.locate_member(name)?;
                    self.in_schema(home, |e| {
                        for child in interface.sorted_children() {
                            e.emit_declaration(child)?;
                        }
                        Ok(())
                    })?;
                }
                other => {
                    warn!(
                        kind = other.kind_name(),
                        schema = %self.schema,
                        "unhandled intersection member, skipping"
                    );
                }
            }
        }
        self.push("}");
        Ok(())
    }

    /// Find an intersection member in the companion document, falling back to
    /// the document being walked (including its `<internal>` container)
    fn locate_member(&self, name: &str) -> Result<(SchemaHandle, &'a Declaration)> {
        let resolver = self.resolver;
        let companion = self.schema.companion();
        match resolver.by_name(companion, name) {
            Ok(decl) => Ok((companion, decl)),
            Err(err @ GenError::UnresolvedName { .. }) => match resolver.by_name(self.schema, name) {
                Ok(decl) => Ok((self.schema, decl)),
                Err(_) => Err(err),
            },
            Err(err) => Err(err),
        }
    }
}

/// Case names for a tagged union: the member's own name, else its shape.
/// Repeats get a numeric suffix so every case stays distinct.
fn case_names(members: &[&TypeNode]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    members
        .iter()
        .map(|member| {
            let base = member.own_name().unwrap_or(member.kind_name()).to_string();
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

/// Render a literal in Zig literal syntax
pub fn render_literal(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Null => "null".to_string(),
        LiteralValue::Bool(b) => b.to_string(),
        LiteralValue::Integer(i) => i.to_string(),
        LiteralValue::Float(f) => format!("{:?}", f),
        LiteralValue::String(s) => string_literal(s),
    }
}

/// The Zig type a literal value is bound with
pub fn literal_type(value: &LiteralValue) -> &'static str {
    match value {
        LiteralValue::Null => "?void",
        LiteralValue::Bool(_) => "bool",
        LiteralValue::Integer(_) => "i64",
        LiteralValue::Float(_) => "f64",
        LiteralValue::String(_) => "[]const u8",
    }
}
