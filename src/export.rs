//! Export pipeline: well models to row tables to deck text
//!
//! ```text
//! WellModel ──► generators ──► WellTableData ──┬──► format_well ──► deck
//!                                               └──► UnifiedWellData ──► format_unified ──► deck
//! ```
//!
//! Row generation for independent wells can be fanned out with rayon; tables
//! are merged back in input order before anything is written, so the deck is
//! identical to a sequential export.

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ExportConfig;
use crate::formatter::{format_unified, format_well, DeckWriter};
use crate::generators::{
    build_topology_header, collect_all_connection_rows, collect_device_rows, collect_topology_rows,
    collect_valve_rows,
};
use crate::tables::{UnifiedWellData, WellTableData};
use crate::types::WellModel;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

impl ExportError {
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Validation(messages) => messages,
        }
    }
}

/// Generate every row family for one well.
pub fn build_well_table(model: &WellModel, config: &ExportConfig) -> WellTableData {
    let mut table = WellTableData::new(model.name.clone());

    table.set_topology_header(build_topology_header(
        model,
        config.header.length_and_depth,
        config.header.pressure_drop,
    ));
    table.extend_topology_rows(collect_topology_rows(&model.main_bore, config.segment_order()));
    table.extend_connection_rows(collect_all_connection_rows(&model.name, &model.main_bore));
    table.extend_valve_rows(collect_valve_rows(&model.main_bore));
    table.extend_device_rows(collect_device_rows(&model.main_bore));

    debug!(
        well = %model.name,
        segments = table.topology_rows().len(),
        connections = table.connection_rows().len(),
        valves = table.valve_rows().len(),
        devices = table.device_rows().len(),
        "Built well table"
    );
    table
}

/// Build a unified set one well at a time.
pub fn build_unified(models: &[WellModel], config: &ExportConfig) -> UnifiedWellData {
    let mut unified = UnifiedWellData::new();
    for model in models {
        unified.add_well_data(build_well_table(model, config));
    }
    unified
}

/// Build a unified set with per-well row generation on the rayon pool.
///
/// Produces the same set as [`build_unified`]: tables are merged in input
/// order, so replace-by-name still keeps the last model for a repeated name.
pub fn build_unified_parallel(models: &[WellModel], config: &ExportConfig) -> UnifiedWellData {
    let tables: Vec<WellTableData> = models
        .par_iter()
        .map(|model| build_well_table(model, config))
        .collect();

    let mut unified = UnifiedWellData::new();
    for table in tables {
        unified.add_well_data(table);
    }
    unified
}

fn writer_for(config: &ExportConfig) -> DeckWriter {
    DeckWriter::new()
        .with_default_marker(config.output.default_marker.clone())
        .with_float_precision(config.output.float_precision)
}

/// Render one well table, refusing invalid tables when validation is enabled.
pub fn render_well(table: &WellTableData, config: &ExportConfig) -> Result<String, ExportError> {
    check(table.validate(), config)?;

    let mut writer = writer_for(config);
    format_well(&mut writer, table);
    info!(well = table.well_name(), "Rendered well deck");
    Ok(writer.into_string())
}

/// Render a unified set, refusing invalid sets when validation is enabled.
pub fn render_unified(
    unified: &UnifiedWellData,
    config: &ExportConfig,
) -> Result<String, ExportError> {
    check(unified.validate(), config)?;

    let mut writer = writer_for(config);
    format_unified(&mut writer, unified);
    info!(wells = unified.well_count(), "Rendered unified deck");
    Ok(writer.into_string())
}

/// Build and render a single well model.
pub fn export_well(model: &WellModel, config: &ExportConfig) -> Result<String, ExportError> {
    render_well(&build_well_table(model, config), config)
}

fn check(messages: Vec<String>, config: &ExportConfig) -> Result<(), ExportError> {
    if messages.is_empty() {
        return Ok(());
    }
    if config.output.validate_before_write {
        return Err(ExportError::Validation(messages));
    }
    for message in &messages {
        warn!(message = %message, "Writing table that failed validation");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Branch, Intersection, Segment};

    fn well(name: &str, segment_numbers: &[i32]) -> WellModel {
        let mut bore = Branch::new(1);
        for &n in segment_numbers {
            let mut segment = Segment::new(n, 1, n - 1, f64::from(n) * 10.0, f64::from(n + 1) * 10.0);
            let k = usize::try_from(n).unwrap();
            segment.add_intersection(Intersection::main_grid(0, 0, k, 100 + k));
            bore.add_segment(segment);
        }
        WellModel::new(name, bore)
    }

    #[test]
    fn test_build_well_table_fills_all_families() {
        let table = build_well_table(&well("W1", &[2, 3]), &ExportConfig::default());
        assert_eq!(table.well_name(), "W1");
        assert_eq!(table.topology_rows().len(), 2);
        assert_eq!(table.connection_rows().len(), 2);
        assert!(table.topology_header().is_some());
        assert!(table.is_valid());
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let models = vec![well("A", &[2]), well("B", &[2, 3]), well("A", &[2, 3, 4])];
        let config = ExportConfig::default();
        let sequential = render_unified(&build_unified(&models, &config), &config).unwrap();
        let parallel = render_unified(&build_unified_parallel(&models, &config), &config).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(build_unified_parallel(&models, &config).well_count(), 2);
    }

    #[test]
    fn test_validation_gates_rendering() {
        let invalid = well("W1", &[2, 2]);
        let mut config = ExportConfig::default();

        let err = export_well(&invalid, &config).unwrap_err();
        assert_eq!(err.messages(), ["Duplicate segment number: 2".to_string()]);
        assert!(err.to_string().contains("Duplicate segment number: 2"));

        config.output.validate_before_write = false;
        let deck = export_well(&invalid, &config).unwrap();
        assert!(deck.starts_with("WELSEGS\n"));
    }

    #[test]
    fn test_empty_unified_set_is_rejected() {
        let config = ExportConfig::default();
        let err = render_unified(&UnifiedWellData::new(), &config).unwrap_err();
        assert_eq!(err.messages(), ["No well data available".to_string()]);
    }
}
