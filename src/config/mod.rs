//! Export Configuration Module
//!
//! Controls header modes, segment ordering and deck text rendering.
//!
//! ## Loading Order
//!
//! 1. `MSW_EXPORT_CONFIG` environment variable (path to TOML file)
//! 2. `msw_export.toml` in the current working directory
//! 3. Built-in defaults
//!
//! An explicit `--config` path on the command line bypasses the search and
//! goes straight to `ExportConfig::load_from_file`.
//!
//! ## Usage
//!
//! ```ignore
//! let config = ExportConfig::load();
//! let deck = export::export_well(&model, &config)?;
//! ```

mod export_config;
pub mod defaults;
pub mod validation;

pub use export_config::*;
