//! msw-export - multi-segment well deck exporter
//!
//! Loads well models from JSON or TOML files and writes the simulator keyword
//! tables (`WELSEGS`, `COMPSEGS`, `COMPSEGL`, `WSEGVALV`, `WSEGAICD`).
//!
//! # Usage
//!
//! ```bash
//! # One deck section per well, written to stdout
//! msw-export --model wells.toml
//!
//! # Many wells combined into shared tables, generated in parallel
//! msw-export --model a.json --model b.json --unified --parallel --output wells.inc
//!
//! # Seed a config file with every default spelled out
//! msw-export init-config msw_export.toml
//! ```
//!
//! # Environment Variables
//!
//! - `MSW_EXPORT_CONFIG`: Path to the export config (default: ./msw_export.toml)
//! - `RUST_LOG`: Logging level (default: info). Logs go to stderr.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};

use msw_export::config::ExportConfig;
use msw_export::export::{self, ExportError};
use msw_export::model;

#[derive(Parser, Debug)]
#[command(name = "msw-export")]
#[command(about = "Export multi-segment well completions to simulator keyword tables")]
#[command(version)]
struct CliArgs {
    /// Well model file (.json or .toml); repeat for several files
    #[arg(short, long = "model", value_name = "FILE")]
    models: Vec<PathBuf>,

    /// Export config file, bypassing the MSW_EXPORT_CONFIG / ./msw_export.toml search
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the deck to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Combine all wells into shared keyword tables
    #[arg(long)]
    unified: bool,

    /// Generate rows for each well on the rayon thread pool
    #[arg(long)]
    parallel: bool,

    /// Write tables even when they fail validation
    #[arg(long)]
    skip_validation: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Write the effective export config to a TOML file
    InitConfig {
        /// Destination path
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => ExportConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ExportConfig::load(),
    };
    if args.skip_validation {
        config.output.validate_before_write = false;
    }

    if let Some(SubCommand::InitConfig { path }) = &args.command {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        return Ok(());
    }

    if args.models.is_empty() {
        bail!("No model files given (use --model <FILE>)");
    }

    let wells = model::load_all_well_models(&args.models).context("Failed to load well models")?;
    info!(wells = wells.len(), unified = args.unified, parallel = args.parallel, "Exporting");

    let deck = match render(&wells, &config, &args) {
        Ok(deck) => deck,
        Err(e) => {
            for message in e.messages() {
                error!("{}", message);
            }
            return Err(e).context("Export refused");
        }
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &deck)
                .with_context(|| format!("Failed to write deck {}", path.display()))?;
            info!(path = %path.display(), bytes = deck.len(), "Deck written");
        }
        None => {
            std::io::stdout()
                .lock()
                .write_all(deck.as_bytes())
                .context("Failed to write deck to stdout")?;
        }
    }

    Ok(())
}

fn render(
    wells: &[msw_export::WellModel],
    config: &ExportConfig,
    args: &CliArgs,
) -> Result<String, ExportError> {
    if args.unified {
        let unified = if args.parallel {
            export::build_unified_parallel(wells, config)
        } else {
            export::build_unified(wells, config)
        };
        return export::render_unified(&unified, config);
    }

    let tables: Vec<_> = if args.parallel {
        use rayon::prelude::*;
        wells
            .par_iter()
            .map(|w| export::build_well_table(w, config))
            .collect()
    } else {
        wells
            .iter()
            .map(|w| export::build_well_table(w, config))
            .collect()
    };

    let mut deck = String::new();
    for table in &tables {
        deck.push_str(&export::render_well(table, config)?);
    }
    Ok(deck)
}
