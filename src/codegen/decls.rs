//! Declaration Translation
//!
//! Renders one named declaration, dispatching on its kind. Container bodies
//! (interfaces, type literals, namespaces, enumerations) recurse over their
//! children in id order.

use tracing::{debug, warn};

use super::names::escape_name;
use super::types::{literal_type, render_literal};
use super::{Emitter, INT_ENUM_MIXIN, MANUAL_PLACEHOLDER};
use crate::error::{GenError, Result};
use crate::schema::{Declaration, DeclarationKind, LiteralValue, TypeNode, INTERNAL_CONTAINER};

impl<'a> Emitter<'a> {
    /// Emit one declaration. Returns whether anything was written.
    pub fn emit_declaration(&mut self, decl: &Declaration) -> Result<bool> {
        if decl.name == INTERNAL_CONTAINER {
            return Ok(false);
        }

        match &decl.kind {
            DeclarationKind::Reference => self.emit_reference(decl),
            DeclarationKind::Interface => self.emit_interface(decl),
            DeclarationKind::Property => self.emit_field(decl),
            DeclarationKind::TypeAlias => self.emit_type_alias(decl),
            DeclarationKind::TypeLiteral => self.emit_type_literal(decl),
            DeclarationKind::Namespace => self.emit_namespace(decl),
            DeclarationKind::Variable => self.emit_variable(decl),
            DeclarationKind::Enumeration => self.emit_enumeration(decl),
            DeclarationKind::EnumerationMember => self.emit_enum_member(decl),
            DeclarationKind::Method
            | DeclarationKind::Class
            | DeclarationKind::Function
            | DeclarationKind::Constructor
            | DeclarationKind::CallSignature
            | DeclarationKind::ConstructorSignature => Ok(false),
            DeclarationKind::Other(kind) => {
                warn!(name = %decl.name, kind = %kind, "unhandled declaration kind, skipping");
                Ok(false)
            }
        }
    }

    fn emit_doc(&mut self, decl: &Declaration) {
        if let Some(doc) = decl.doc() {
            for line in doc.lines() {
                let line = line.trim_end();
                if line.is_empty() {
                    self.push("///\n");
                } else {
                    self.push(&format!("/// {}\n", line));
                }
            }
        }
    }

    fn emit_children(&mut self, decl: &Declaration) -> Result<()> {
        for child in decl.sorted_children() {
            self.emit_declaration(child)?;
        }
        Ok(())
    }

    // =========================================================================
    // Aliases
    // =========================================================================

    fn emit_reference(&mut self, decl: &Declaration) -> Result<bool> {
        let target_id = decl.target.ok_or_else(|| {
            GenError::InvalidSchema(format!("reference `{}` has no target", decl.name))
        })?;
        let resolver = self.resolver;
        let target = resolver.by_id(self.schema, target_id)?;

        self.emit_doc(decl);
        self.push(&format!(
            "pub const {} = {};\n",
            escape_name(&decl.name),
            escape_name(&target.name)
        ));
        Ok(true)
    }

    fn emit_type_alias(&mut self, decl: &Declaration) -> Result<bool> {
        let Some(ty) = &decl.ty else {
            warn!(name = %decl.name, "type alias without a type, skipping");
            return Ok(false);
        };

        if matches!(ty, TypeNode::Reflection { .. }) {
            debug!(name = %decl.name, "type alias of an inline type literal, skipping");
            return Ok(false);
        }

        if self.resolver.document(self.schema).has_data_namespace(&decl.name) {
            debug!(name = %decl.name, "type alias superseded by namespace, skipping");
            return Ok(false);
        }

        self.emit_doc(decl);
        if decl.type_parameters.is_empty() {
            self.push(&format!("pub const {} = ", escape_name(&decl.name)));
            self.emit_type(ty)?;
            self.push(";\n");
        } else {
            self.push(&generic_header(decl));
            self.push("return ");
            self.emit_type(ty)?;
            self.push(";\n}\n");
        }
        Ok(true)
    }

    // =========================================================================
    // Structures
    // =========================================================================

    fn emit_interface(&mut self, decl: &Declaration) -> Result<bool> {
        self.emit_doc(decl);
        if decl.type_parameters.is_empty() {
            self.push(&format!("pub const {} = struct {{\n", escape_name(&decl.name)));
            self.emit_children(decl)?;
            self.push("};\n");
        } else {
            self.push(&generic_header(decl));
            self.push("return struct {\n");
            self.emit_children(decl)?;
            self.push("};\n}\n");
        }
        Ok(true)
    }

    fn emit_type_literal(&mut self, decl: &Declaration) -> Result<bool> {
        if decl.children.is_empty() {
            warn!(name = %decl.name, schema = %self.schema, "type literal without members needs manual translation");
            self.push(MANUAL_PLACEHOLDER);
        } else {
            self.push("struct {\n");
            self.emit_children(decl)?;
            self.push("}");
        }
        Ok(true)
    }

    fn emit_field(&mut self, decl: &Declaration) -> Result<bool> {
        let Some(ty) = &decl.ty else {
            warn!(name = %decl.name, "property without a type, skipping");
            return Ok(false);
        };

        self.emit_doc(decl);
        let name = escape_name(&decl.name);
        match ty {
            TypeNode::Literal { value } => {
                self.push(&format!(
                    "comptime {}: {} = {},\n",
                    name,
                    literal_type(value),
                    render_literal(value)
                ));
            }
            _ if decl.is_optional() => {
                self.push(&format!("{}: ?", name));
                self.emit_type(ty)?;
                self.push(" = null,\n");
            }
            _ => {
                self.push(&format!("{}: ", name));
                self.emit_type(ty)?;
                self.push(",\n");
            }
        }
        Ok(true)
    }

    // =========================================================================
    // Namespaces and Constants
    // =========================================================================

    fn emit_namespace(&mut self, decl: &Declaration) -> Result<bool> {
        if decl.has_callable_child() {
            debug!(name = %decl.name, "namespace with callable members, skipping");
            return Ok(false);
        }

        let numeric = decl
            .children
            .iter()
            .any(|c| c.literal_type().is_some_and(LiteralValue::is_numeric));

        self.emit_doc(decl);
        if numeric {
            self.push(&format!("pub const {} = enum(i64) {{\n", escape_name(&decl.name)));
            for child in decl.sorted_children() {
                match child.literal_type() {
                    Some(value @ LiteralValue::Integer(_)) => {
                        self.emit_doc(child);
                        self.push(&format!(
                            "{} = {},\n",
                            escape_name(&child.name),
                            render_literal(value)
                        ));
                    }
                    _ => warn!(
                        namespace = %decl.name,
                        name = %child.name,
                        "non-integer member in integer-backed namespace, skipping"
                    ),
                }
            }
            self.push(&format!("usingnamespace {}(@This());\n}};\n", INT_ENUM_MIXIN));
        } else {
            self.push(&format!("pub const {} = struct {{\n", escape_name(&decl.name)));
            for child in decl.sorted_children() {
                if !child.is_callable() {
                    self.emit_declaration(child)?;
                }
            }
            self.push("};\n");
        }
        Ok(true)
    }

    /// `pub const name = ...;` from the literal type, else the initializer,
    /// else the declared type
    fn emit_variable(&mut self, decl: &Declaration) -> Result<bool> {
        if decl.is_callable() {
            debug!(name = %decl.name, "function-valued variable, skipping");
            return Ok(false);
        }

        let name = escape_name(&decl.name);
        if let Some(value) = decl.literal_type() {
            self.emit_doc(decl);
            self.push(&format!("pub const {} = {};\n", name, render_literal(value)));
            return Ok(true);
        }

        if let Some(source) = decl.default_value.as_deref() {
            let value = default_value_literal(source).unwrap_or_else(|| {
                warn!(name = %decl.name, initializer = %source, "initializer needs manual translation");
                MANUAL_PLACEHOLDER.to_string()
            });
            self.emit_doc(decl);
            self.push(&format!("pub const {} = {};\n", name, value));
            return Ok(true);
        }

        let Some(ty) = &decl.ty else {
            warn!(name = %decl.name, "variable without a type or initializer, skipping");
            return Ok(false);
        };
        self.emit_doc(decl);
        self.push(&format!("pub const {} = ", name));
        self.emit_type(ty)?;
        self.push(";\n");
        Ok(true)
    }

    fn emit_enumeration(&mut self, decl: &Declaration) -> Result<bool> {
        self.emit_doc(decl);
        self.push(&format!("pub const {} = struct {{\n", escape_name(&decl.name)));
        self.emit_children(decl)?;
        self.push("};\n");
        Ok(true)
    }

    fn emit_enum_member(&mut self, decl: &Declaration) -> Result<bool> {
        let value = match decl.literal_type() {
            Some(value) => render_literal(value),
            None => match decl.default_value.as_deref().and_then(default_value_literal) {
                Some(value) => value,
                None => {
                    warn!(name = %decl.name, "enum member without a value needs manual translation");
                    MANUAL_PLACEHOLDER.to_string()
                }
            },
        };

        self.emit_doc(decl);
        self.push(&format!("pub const {} = {};\n", escape_name(&decl.name), value));
        Ok(true)
    }
}

/// `pub fn Name(comptime T: type, ...) type {` for parameterized declarations
fn generic_header(decl: &Declaration) -> String {
    let params: Vec<String> = decl
        .type_parameters
        .iter()
        .map(|p| format!("comptime {}: type", escape_name(&p.name)))
        .collect();
    format!("pub fn {}({}) type {{\n", escape_name(&decl.name), params.join(", "))
}

/// Convert an initializer's source text into a Zig expression. Only quoted
/// strings, numbers, and dotted identifiers carry over; anything else (`...`,
/// constructor calls, object literals) has no Zig counterpart.
fn default_value_literal(source: &str) -> Option<String> {
    let source = source.trim();
    if let Some(inner) = source.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return Some(super::names::string_literal(inner));
    }
    if is_number(source) || is_identifier_path(source) {
        return Some(source.to_string());
    }
    None
}

fn is_number(source: &str) -> bool {
    let digits = source.strip_prefix('-').unwrap_or(source);
    digits.starts_with(|c: char| c.is_ascii_digit()) && digits.parse::<f64>().is_ok()
}

fn is_identifier_path(source: &str) -> bool {
    !source.is_empty()
        && source.split('.').all(|part| {
            part.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
                && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
