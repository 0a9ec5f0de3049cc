//! Output handling: writing the artifact, drift checks, and the external
//! formatter.

use similar::TextDiff;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

use crate::config::FormatterConfig;
use crate::error::Result;

// =============================================================================
// Writer
// =============================================================================

/// Result of a write operation
#[derive(Debug)]
pub enum WriteResult {
    Written { path: PathBuf, bytes: usize },
    /// Dry run; nothing was written
    DryRun { path: PathBuf, bytes: usize },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. } | WriteResult::DryRun { path, .. } => path,
        }
    }

    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }
}

/// Writes generated code to disk, with dry-run support
#[derive(Debug)]
pub struct OutputWriter {
    dry_run: bool,
}

impl OutputWriter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn write(&self, path: &Path, content: &str) -> Result<WriteResult> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                path: path.to_path_buf(),
                bytes: content.len(),
            });
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, content)?;

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }
}

// =============================================================================
// Drift Check
// =============================================================================

/// Comparison of freshly generated code against the file on disk
#[derive(Debug)]
pub struct DriftReport {
    pub path: PathBuf,
    /// Unified diff; empty when in sync
    pub diff: String,
    pub missing: bool,
}

impl DriftReport {
    pub fn in_sync(&self) -> bool {
        !self.missing && self.diff.is_empty()
    }
}

pub fn check_drift(path: &Path, generated: &str) -> Result<DriftReport> {
    if !path.exists() {
        return Ok(DriftReport {
            path: path.to_path_buf(),
            diff: String::new(),
            missing: true,
        });
    }

    let current = fs::read_to_string(path)?;
    let diff = if current == generated {
        String::new()
    } else {
        TextDiff::from_lines(current.as_str(), generated)
            .unified_diff()
            .context_radius(3)
            .header(&path.display().to_string(), "generated")
            .to_string()
    };

    Ok(DriftReport {
        path: path.to_path_buf(),
        diff,
        missing: false,
    })
}

// =============================================================================
// Formatter
// =============================================================================

/// Outcome of the external formatter; only ever logged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    Formatted,
    Disabled,
    Failed(String),
}

/// Run the configured formatter on a written file
pub fn run_formatter(config: &FormatterConfig, path: &Path) -> FormatOutcome {
    if !config.enabled {
        return FormatOutcome::Disabled;
    }

    let outcome = match Command::new(&config.command).args(&config.args).arg(path).output() {
        Ok(output) if output.status.success() => FormatOutcome::Formatted,
        Ok(output) => FormatOutcome::Failed(format!(
            "exit code {}: {}",
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        )),
        Err(e) => FormatOutcome::Failed(e.to_string()),
    };

    match &outcome {
        FormatOutcome::Formatted => info!(command = %config.command, path = %path.display(), "formatted output"),
        FormatOutcome::Failed(reason) => warn!(command = %config.command, %reason, "formatter failed"),
        FormatOutcome::Disabled => {}
    }
    outcome
}

/// Formatted rendition of `code`, for comparing against a formatted file.
/// Falls back to `code` unchanged when the formatter is disabled or fails.
pub fn format_text(config: &FormatterConfig, code: &str) -> Result<String> {
    if !config.enabled {
        return Ok(code.to_string());
    }

    let scratch = std::env::temp_dir().join(format!("typedoc-zig-{}.zig", std::process::id()));
    fs::write(&scratch, code)?;
    let formatted = match run_formatter(config, &scratch) {
        FormatOutcome::Formatted => fs::read_to_string(&scratch)?,
        _ => code.to_string(),
    };
    let _ = fs::remove_file(&scratch);
    Ok(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/dir/types.zig");

        let result = OutputWriter::new(false).write(&path, "pub const A = B;\n").unwrap();
        assert!(result.was_written());
        assert_eq!(fs::read_to_string(&path).unwrap(), "pub const A = B;\n");
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("types.zig");

        let result = OutputWriter::new(true).write(&path, "pub const A = B;\n").unwrap();
        assert!(!result.was_written());
        assert_eq!(result.path(), path.as_path());
        assert!(!path.exists());
    }

    #[test]
    fn test_drift_detection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("types.zig");

        assert!(check_drift(&path, "x\n").unwrap().missing);

        fs::write(&path, "pub const A = B;\n").unwrap();
        assert!(check_drift(&path, "pub const A = B;\n").unwrap().in_sync());

        let report = check_drift(&path, "pub const A = C;\n").unwrap();
        assert!(!report.in_sync());
        assert!(report.diff.contains("-pub const A = B;"));
        assert!(report.diff.contains("+pub const A = C;"));
    }

    #[test]
    fn test_formatter_outcomes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("types.zig");

        let disabled = FormatterConfig {
            enabled: false,
            ..FormatterConfig::default()
        };
        assert_eq!(run_formatter(&disabled, &path), FormatOutcome::Disabled);

        let missing = FormatterConfig {
            enabled: true,
            command: "definitely-not-a-formatter-binary".to_string(),
            args: Vec::new(),
        };
        assert!(matches!(run_formatter(&missing, &path), FormatOutcome::Failed(_)));
        assert_eq!(format_text(&missing, "pub const A = B;\n").unwrap(), "pub const A = B;\n");
        assert_eq!(format_text(&disabled, "x").unwrap(), "x");
    }
}
