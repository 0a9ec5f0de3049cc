//! Configuration management for the generator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (typedoc-zig.toml)
//! - Environment variables (TYPEDOC_ZIG__*)
//!
//! ## Example config file (typedoc-zig.toml):
//! ```toml
//! [input]
//! types = "schemas/types.json"
//! protocol = "schemas/protocol.json"
//!
//! [output]
//! path = "src/lsp_types.zig"
//!
//! [formatter]
//! enabled = true
//! command = "zig"
//! args = ["fmt"]
//!
//! [filter]
//! exclude_patterns = ["^_", "Handler\\d*$"]
//! excluded_sources = ["node_modules/vscode-jsonrpc"]
//!
//! [summary]
//! request_suffix = "Request"
//! request_union = "Request"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenConfig {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub formatter: FormatterConfig,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub summary: SummaryConfig,
}

/// Schema document locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Reflection of the foundational types
    #[serde(default = "default_types_path")]
    pub types: PathBuf,

    /// Reflection of the protocol
    #[serde(default = "default_protocol_path")]
    pub protocol: PathBuf,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Replace the built-in preamble with this file
    #[serde(default)]
    pub preamble: Option<PathBuf>,
}

/// External formatter run on the written output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatterConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_formatter_command")]
    pub command: String,

    /// Arguments placed before the output path
    #[serde(default = "default_formatter_args")]
    pub args: Vec<String>,
}

/// Declarations that must not be emitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Regexes matched against top-level declaration names
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Source path fragments marking foreign modules
    #[serde(default = "default_excluded_sources")]
    pub excluded_sources: Vec<String>,
}

/// Summary unions appended after all declarations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_request_suffix")]
    pub request_suffix: String,

    #[serde(default = "default_request_union")]
    pub request_union: String,

    #[serde(default = "default_notification_suffix")]
    pub notification_suffix: String,

    #[serde(default = "default_notification_union")]
    pub notification_union: String,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_types_path() -> PathBuf {
    PathBuf::from("types.json")
}

fn default_protocol_path() -> PathBuf {
    PathBuf::from("protocol.json")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("types.zig")
}

fn default_formatter_command() -> String {
    "zig".to_string()
}

fn default_formatter_args() -> Vec<String> {
    vec!["fmt".to_string()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        // Private by convention
        "^_".to_string(),
        // JSON-RPC bridging types
        r"^(Protocol)?(Request|Notification)Type\d*$".to_string(),
        r"Handler\d*$".to_string(),
        "HandlerResult".to_string(),
        "Signature$".to_string(),
        // Number aliases already covered by the primitive mapping
        "^(u?integer|decimal)$".to_string(),
        // JSON aggregates, declared in the preamble
        "^LSP.+".to_string(),
    ]
}

fn default_excluded_sources() -> Vec<String> {
    vec!["node_modules/vscode-jsonrpc".to_string()]
}

fn default_request_suffix() -> String {
    "Request".to_string()
}

fn default_request_union() -> String {
    "Request".to_string()
}

fn default_notification_suffix() -> String {
    "Notification".to_string()
}

fn default_notification_union() -> String {
    "Notification".to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            types: default_types_path(),
            protocol: default_protocol_path(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            preamble: None,
        }
    }
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_formatter_command(),
            args: default_formatter_args(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: default_exclude_patterns(),
            excluded_sources: default_excluded_sources(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            request_suffix: default_request_suffix(),
            request_union: default_request_union(),
            notification_suffix: default_notification_suffix(),
            notification_union: default_notification_union(),
        }
    }
}

impl GenConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "typedoc-zig.toml",
            ".typedoc-zig.toml",
            "config/typedoc-zig.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "typedoc-zig") {
            let xdg_config = config_dir.config_dir().join("typedoc-zig.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // TYPEDOC_ZIG__OUTPUT__PATH=... etc.
        builder = builder.add_source(
            Environment::with_prefix("TYPEDOC_ZIG")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}
