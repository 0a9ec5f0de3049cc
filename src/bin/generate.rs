//! Zig Declaration Generator CLI
//!
//! Reads the TypeDoc reflections of the types and protocol libraries and
//! writes one Zig source file. With `--check`, compares against the file on
//! disk instead and exits non-zero on drift.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use typedoc_zig::output::{check_drift, format_text, run_formatter, OutputWriter, WriteResult};
use typedoc_zig::{generate, GenConfig, SchemaSet};

#[derive(Parser)]
#[command(name = "typedoc-zig")]
#[command(about = "Generate Zig declarations from TypeDoc reflections")]
struct Cli {
    /// Reflection of the foundational types library
    #[arg(short, long)]
    types: Option<PathBuf>,

    /// Reflection of the protocol library
    #[arg(short, long)]
    protocol: Option<PathBuf>,

    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file layered over the defaults
    #[arg(short, long)]
    config: Option<String>,

    /// Skip the external formatter
    #[arg(long)]
    no_format: bool,

    /// Generate but don't write
    #[arg(long)]
    dry_run: bool,

    /// Compare against the existing output; exit 1 on drift
    #[arg(long)]
    check: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `false` when a drift check found differences
fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = GenConfig::load_from(cli.config.as_deref()).context("loading configuration")?;

    if let Some(types) = cli.types {
        config.input.types = types;
    }
    if let Some(protocol) = cli.protocol {
        config.input.protocol = protocol;
    }
    if let Some(output) = cli.output {
        config.output.path = output;
    }
    if cli.no_format {
        config.formatter.enabled = false;
    }

    let schemas = SchemaSet::load(&config.input.types, &config.input.protocol).with_context(|| {
        format!(
            "loading {} and {}",
            config.input.types.display(),
            config.input.protocol.display()
        )
    })?;
    info!(
        types = schemas.types.declaration_count(),
        protocol = schemas.protocol.declaration_count(),
        "schemas loaded"
    );

    let generated = generate(&schemas, &config)?;

    if cli.check {
        let expected = format_text(&config.formatter, &generated.code)?;
        let report = check_drift(&config.output.path, &expected)?;
        if report.missing {
            eprintln!("{} does not exist", report.path.display());
            return Ok(false);
        }
        if !report.in_sync() {
            print!("{}", report.diff);
            eprintln!("{} is out of date", report.path.display());
            return Ok(false);
        }
        eprintln!("{} is up to date", report.path.display());
        return Ok(true);
    }

    match OutputWriter::new(cli.dry_run).write(&config.output.path, &generated.code)? {
        WriteResult::Written { path, bytes } => {
            info!(path = %path.display(), bytes, declarations = generated.declaration_count, "output written");
            run_formatter(&config.formatter, &path);
        }
        WriteResult::DryRun { path, bytes } => {
            info!(path = %path.display(), bytes, "dry run, nothing written");
        }
    }

    Ok(true)
}
