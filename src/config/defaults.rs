//! Export default constants.
//!
//! Grouped by concern so the writer, the config layer and the tests agree on
//! the same values.

// ============================================================================
// Deck Text
// ============================================================================

/// Token telling the simulator to apply its own default for a value.
pub const DEFAULT_MARKER: &str = "1*";

/// Decimals written for plain float columns.
pub const DEFAULT_FLOAT_PRECISION: usize = 2;

/// Largest accepted `output.float_precision`.
pub const MAX_FLOAT_PRECISION: usize = 12;

/// Decimals for pipe roughness, which is typically around 1e-5 m.
pub const ROUGHNESS_PRECISION: usize = 7;

/// Maximum decimals for valve cross-section area (trailing zeros trimmed).
pub const VALVE_AREA_PRECISION: usize = 4;

/// Decimals for AICD device parameters, which span many orders of magnitude.
pub const DEVICE_PARAMETER_PRECISION: usize = 8;

// ============================================================================
// Config Discovery
// ============================================================================

/// Environment variable holding an explicit config path.
pub const CONFIG_ENV_VAR: &str = "MSW_EXPORT_CONFIG";

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "msw_export.toml";
