//! Schema Walker
//!
//! Drives one generation run over both documents:
//!
//! 1. Every top-level declaration of the types document
//! 2. Every member of the protocol's `<internal>` container
//! 3. Every remaining top-level declaration of the protocol document
//! 4. Summary unions over all emitted request and notification types
//!
//! Declarations are visited in id order, filtered, and emitted at most once
//! by name across the whole run.

use std::fs;
use tracing::{debug, info, warn};

use crate::checksum::Checksum;
use crate::codegen::{escape_name, EmittedNames, Emitter, ExclusionFilter};
use crate::config::{GenConfig, SummaryConfig};
use crate::error::Result;
use crate::schema::{Declaration, SchemaHandle, SchemaSet};

/// Preamble placed before all generated declarations
pub const DEFAULT_PREAMBLE: &str = include_str!("preamble.zig");

/// Output from one generation run
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    /// Preamble followed by all generated declarations
    pub code: String,
    /// Number of top-level declarations emitted
    pub declaration_count: usize,
    pub checksum: Checksum,
}

/// Orchestrates ordering, exclusion, and deduplication for one run
pub struct Walker<'a> {
    schemas: &'a SchemaSet,
    filter: &'a ExclusionFilter,
    summary: &'a SummaryConfig,
    preamble: &'a str,
}

impl<'a> Walker<'a> {
    pub fn new(
        schemas: &'a SchemaSet,
        filter: &'a ExclusionFilter,
        summary: &'a SummaryConfig,
        preamble: &'a str,
    ) -> Self {
        Self {
            schemas,
            filter,
            summary,
            preamble,
        }
    }

    pub fn generate(&self) -> Result<GeneratedOutput> {
        let mut out = String::new();
        let mut emitted = EmittedNames::new();

        {
            let mut types = Emitter::new(self.schemas, SchemaHandle::Types, &mut emitted, &mut out);
            for decl in self.schemas.types.top_level() {
                self.visit(&mut types, decl)?;
            }
        }

        {
            let mut protocol = Emitter::new(self.schemas, SchemaHandle::Protocol, &mut emitted, &mut out);
            if let Some(internal) = self.schemas.protocol.internal() {
                for decl in internal.sorted_children() {
                    self.visit(&mut protocol, decl)?;
                }
            }
            for decl in self.schemas.protocol.top_level() {
                self.visit(&mut protocol, decl)?;
            }
        }

        let declaration_count = emitted.len();
        self.emit_summary(
            &mut out,
            &mut emitted,
            &self.summary.request_union,
            &self.summary.request_suffix,
        );
        self.emit_summary(
            &mut out,
            &mut emitted,
            &self.summary.notification_union,
            &self.summary.notification_suffix,
        );

        let mut code = String::with_capacity(self.preamble.len() + out.len() + 1);
        code.push_str(self.preamble);
        if !self.preamble.is_empty() && !self.preamble.ends_with('\n') {
            code.push('\n');
        }
        code.push_str(&out);

        let checksum = Checksum::of(&code);
        info!(
            declarations = declaration_count,
            bytes = code.len(),
            checksum = %checksum.short(),
            "generation complete"
        );

        Ok(GeneratedOutput {
            code,
            declaration_count,
            checksum,
        })
    }

    fn visit(&self, emitter: &mut Emitter<'_>, decl: &Declaration) -> Result<()> {
        if self.filter.is_excluded(decl) {
            return Ok(());
        }
        if emitter.emit_top_level(decl)? {
            debug!(name = %decl.name, schema = %emitter.schema(), kind = %decl.kind, "emitted");
        }
        Ok(())
    }

    /// Append `pub const <union> = union(enum) { X: X, ... };` over emitted
    /// names carrying `suffix`
    fn emit_summary(&self, out: &mut String, emitted: &mut EmittedNames, union: &str, suffix: &str) {
        if emitted.contains(union) {
            warn!(name = %union, "summary union name already emitted, skipping");
            return;
        }

        let members: Vec<String> = emitted
            .ending_with(suffix)
            .map(escape_name)
            .collect();

        let cases: Vec<String> = members.iter().map(|m| format!("{}: {}", m, m)).collect();
        if cases.is_empty() {
            out.push_str(&format!("pub const {} = union(enum) {{}};\n\n", escape_name(union)));
        } else {
            out.push_str(&format!(
                "pub const {} = union(enum) {{ {} }};\n\n",
                escape_name(union),
                cases.join(", ")
            ));
        }

        debug!(name = %union, members = members.len(), "summary union emitted");
        emitted.insert(union);
    }
}

/// Run a full generation with the given configuration
pub fn generate(schemas: &SchemaSet, config: &GenConfig) -> Result<GeneratedOutput> {
    let filter = ExclusionFilter::from_config(&config.filter)?;
    let preamble = match &config.output.preamble {
        Some(path) => fs::read_to_string(path)?,
        None => DEFAULT_PREAMBLE.to_string(),
    };
    Walker::new(schemas, &filter, &config.summary, &preamble).generate()
}
