//! Exclusion filter for top-level declarations

use regex::Regex;
use tracing::debug;

use crate::config::FilterConfig;
use crate::error::Result;
use crate::schema::Declaration;

/// Suppresses declarations by name pattern or by originating source file
#[derive(Debug)]
pub struct ExclusionFilter {
    patterns: Vec<Regex>,
    excluded_sources: Vec<String>,
}

impl ExclusionFilter {
    pub fn new(patterns: Vec<Regex>, excluded_sources: Vec<String>) -> Self {
        Self {
            patterns,
            excluded_sources,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Result<Self> {
        let patterns = config
            .exclude_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::new(patterns, config.excluded_sources.clone()))
    }

    pub fn is_excluded(&self, decl: &Declaration) -> bool {
        if let Some(pattern) = self.patterns.iter().find(|p| p.is_match(&decl.name)) {
            debug!(name = %decl.name, pattern = %pattern, "excluded by name");
            return true;
        }

        let foreign = decl
            .source_files()
            .find(|file| self.excluded_sources.iter().any(|s| file.contains(s.as_str())));
        if let Some(file) = foreign {
            debug!(name = %decl.name, file = %file, "excluded by source");
            return true;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn named(name: &str, file: &str) -> Declaration {
        serde_json::from_value(json!({
            "id": 1,
            "name": name,
            "kindString": "Interface",
            "sources": [{ "fileName": file, "line": 1 }]
        }))
        .unwrap()
    }

    #[test]
    fn test_default_patterns() {
        let filter = ExclusionFilter::from_config(&FilterConfig::default()).unwrap();

        assert!(filter.is_excluded(&named("_InitializeParams", "protocol.ts")));
        assert!(filter.is_excluded(&named("ProtocolRequestType0", "messages.ts")));
        assert!(filter.is_excluded(&named("RequestHandler", "protocol.ts")));
        assert!(filter.is_excluded(&named("HandlerSignature", "protocol.ts")));
        assert!(!filter.is_excluded(&named("InitializeParams", "protocol.ts")));
        assert!(filter.is_excluded(&named("RequestType2", "messages.ts")));
        assert!(filter.is_excluded(&named("HandlerResult", "messages.ts")));
        assert!(filter.is_excluded(&named("integer", "main.ts")));
        assert!(filter.is_excluded(&named("uinteger", "main.ts")));
        assert!(filter.is_excluded(&named("decimal", "main.ts")));
        assert!(filter.is_excluded(&named("LSPAny", "main.ts")));
        assert!(filter.is_excluded(&named("LSPObject", "main.ts")));
        assert!(!filter.is_excluded(&named("LSP", "main.ts")));
        assert!(!filter.is_excluded(&named("integerRange", "main.ts")));
    }

    #[test]
    fn test_foreign_sources() {
        let filter = ExclusionFilter::from_config(&FilterConfig::default()).unwrap();
        assert!(filter.is_excluded(&named(
            "CancellationToken",
            "node_modules/vscode-jsonrpc/lib/common/cancellation.d.ts"
        )));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = FilterConfig {
            exclude_patterns: vec!["(".to_string()],
            excluded_sources: Vec::new(),
        };
        assert!(ExclusionFilter::from_config(&config).is_err());
    }
}
