//! Well model files
//!
//! A model file holds either one well:
//!
//! ```toml
//! name = "W1"
//! [main_bore]
//! branch_number = 1
//! ```
//!
//! or a set of wells as an array of `well` tables (`"well": [...]` in JSON).
//! The format is chosen by file extension.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::types::WellModel;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model file {}: {1}", .0.display())]
    Io(PathBuf, #[source] std::io::Error),
    #[error("invalid JSON model {}: {1}", .0.display())]
    Json(PathBuf, #[source] serde_json::Error),
    #[error("invalid TOML model {}: {1}", .0.display())]
    Toml(PathBuf, #[source] toml::de::Error),
    #[error("unsupported model format for {} (expected .json or .toml)", .0.display())]
    UnsupportedFormat(PathBuf),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ModelDocument {
    Set {
        #[serde(rename = "well")]
        wells: Vec<WellModel>,
    },
    Single(WellModel),
}

impl ModelDocument {
    fn into_wells(self) -> Vec<WellModel> {
        match self {
            Self::Set { wells } => wells,
            Self::Single(well) => vec![well],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModelFormat {
    Json,
    Toml,
}

fn detect_format(path: &Path) -> Result<ModelFormat, ModelError> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => Ok(ModelFormat::Json),
        Some("toml") => Ok(ModelFormat::Toml),
        _ => Err(ModelError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load every well from a `.json` or `.toml` model file.
pub fn load_well_models(path: &Path) -> Result<Vec<WellModel>, ModelError> {
    let format = detect_format(path)?;
    let contents =
        std::fs::read_to_string(path).map_err(|e| ModelError::Io(path.to_path_buf(), e))?;

    let document: ModelDocument = match format {
        ModelFormat::Json => serde_json::from_str(&contents)
            .map_err(|e| ModelError::Json(path.to_path_buf(), e))?,
        ModelFormat::Toml => {
            toml::from_str(&contents).map_err(|e| ModelError::Toml(path.to_path_buf(), e))?
        }
    };

    let wells = document.into_wells();
    info!(path = %path.display(), wells = wells.len(), "Loaded well models");
    Ok(wells)
}

/// Load and concatenate wells from several files, in argument order.
pub fn load_all_well_models(paths: &[PathBuf]) -> Result<Vec<WellModel>, ModelError> {
    let mut wells = Vec::new();
    for path in paths {
        wells.extend(load_well_models(path)?);
    }
    Ok(wells)
}
