//! Export Configuration - deck header modes, segment order and text rendering
//!
//! Every field has a default matching the simulator's conventional choices, so
//! an absent or empty config file exports exactly like the built-in behavior.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults::{
    CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_FLOAT_PRECISION, DEFAULT_MARKER,
};
use crate::generators::SegmentOrder;
use crate::types::{LengthDepthMode, PressureDropMode};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root export configuration.
///
/// Load with `ExportConfig::load()` which searches:
/// 1. `$MSW_EXPORT_CONFIG` env var
/// 2. `./msw_export.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Topology header modes
    #[serde(default)]
    pub header: HeaderConfig,

    /// Segment traversal options
    #[serde(default)]
    pub segments: SegmentConfig,

    /// Deck text rendering
    #[serde(default)]
    pub output: OutputConfig,
}

impl ExportConfig {
    /// Load configuration using the standard search order:
    /// 1. `$MSW_EXPORT_CONFIG` environment variable
    /// 2. `./msw_export.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded export config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        // 2. Check working directory
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(path = %local.display(), "Loaded export config from working directory");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", CONFIG_FILE_NAME);
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", CONFIG_FILE_NAME);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        // Two-pass: check for unknown keys first (warnings only)
        for w in &super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Write the config to a file, e.g. to seed a project-local `msw_export.toml`.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Export config saved");
        Ok(())
    }

    /// Validate rendering settings.
    ///
    /// Rules:
    /// - The default marker must contain a non-whitespace token
    /// - Float precision must not exceed `MAX_FLOAT_PRECISION`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (errors, warnings) = super::validation::validate_value_ranges(self);
        for w in &warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Traversal order for topology rows.
    pub const fn segment_order(&self) -> SegmentOrder {
        SegmentOrder::from_completions_after_main_bore(
            self.segments.completion_segments_after_main_bore,
        )
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            Self::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            Self::Serialize(e) => write!(f, "Config serialization error: {e}"),
            Self::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Header
// ============================================================================

/// Modes written into every `WELSEGS` header row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderConfig {
    /// `ABS` or `INC`
    #[serde(default)]
    pub length_and_depth: LengthDepthMode,

    /// `H--`, `HF-` or `HFA`
    #[serde(default)]
    pub pressure_drop: PressureDropMode,
}

// ============================================================================
// Segments
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Write device segments after all segments of their branch instead of
    /// directly after the host segment
    #[serde(default)]
    pub completion_segments_after_main_bore: bool,
}

// ============================================================================
// Output
// ============================================================================

/// Deck text rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Token written for unset values
    #[serde(default = "default_marker")]
    pub default_marker: String,

    /// Decimals for float columns without their own precision
    #[serde(default = "default_float_precision")]
    pub float_precision: usize,

    /// Refuse to render tables that fail validation
    #[serde(default = "default_true")]
    pub validate_before_write: bool,
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

const fn default_float_precision() -> usize {
    DEFAULT_FLOAT_PRECISION
}

const fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_marker: default_marker(),
            float_precision: default_float_precision(),
            validate_before_write: default_true(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = ExportConfig::from_toml_str("").unwrap();
        assert_eq!(config, ExportConfig::default());
        assert_eq!(config.output.default_marker, "1*");
        assert_eq!(config.output.float_precision, 2);
        assert!(config.output.validate_before_write);
        assert_eq!(config.segment_order(), SegmentOrder::Interleaved);
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config = ExportConfig::from_toml_str(
            r#"
[header]
pressure_drop = "HFA"

[segments]
completion_segments_after_main_bore = true
"#,
        )
        .unwrap();
        assert_eq!(
            config.header.pressure_drop,
            PressureDropMode::HydrostaticFrictionAcceleration
        );
        assert_eq!(config.header.length_and_depth, LengthDepthMode::Absolute);
        assert_eq!(config.segment_order(), SegmentOrder::CompletionsAfterBranch);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = ExportConfig::default();
        config.header.length_and_depth = LengthDepthMode::Incremental;
        let text = config.to_toml().unwrap();
        assert!(text.contains("length_and_depth = \"INC\""));
        assert_eq!(ExportConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_mode_is_parse_error() {
        let result = ExportConfig::from_toml_str("[header]\npressure_drop = \"XYZ\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_, _))));
    }

    #[test]
    fn test_validation_error_display_lists_messages() {
        let err = ConfigError::Validation(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "Config validation failed:\n  - a\n  - b\n");
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let result = ExportConfig::load_from_file(Path::new("/nonexistent/msw_export.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_, _))));
    }
}
