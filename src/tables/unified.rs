//! Unified aggregator: many per-well tables written into one deck

use std::collections::HashMap;

use tracing::debug;

use super::WellTableData;
use crate::types::{ConnectionRow, DeviceRow, TopologyHeader, TopologyRow, ValveRow};

/// Ordered set of per-well tables, addressable by well name.
///
/// Inserting a table whose well name is already present replaces the existing
/// entry in place, so the insertion order of first appearance is preserved.
#[derive(Debug, Clone, Default)]
pub struct UnifiedWellData {
    wells: Vec<WellTableData>,
    index: HashMap<String, usize>,
}

impl UnifiedWellData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_well_data(&mut self, table: WellTableData) {
        if let Some(&position) = self.index.get(table.well_name()) {
            debug!(well = table.well_name(), "Replacing existing well table");
            self.wells[position] = table;
        } else {
            self.wells.push(table);
        }
        self.rebuild_index();
    }

    pub fn get_well_data(&self, well_name: &str) -> Option<&WellTableData> {
        self.index.get(well_name).map(|&i| &self.wells[i])
    }

    pub fn clear(&mut self) {
        self.wells.clear();
        self.index.clear();
    }

    pub fn well_data_list(&self) -> &[WellTableData] {
        &self.wells
    }

    pub fn well_names(&self) -> Vec<&str> {
        self.wells.iter().map(WellTableData::well_name).collect()
    }

    pub fn well_count(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .wells
            .iter()
            .enumerate()
            .map(|(i, w)| (w.well_name().to_string(), i))
            .collect();
    }

    // ========================================================================
    // Flattened views, well order preserved
    // ========================================================================

    /// Topology header of every well; wells without one get a name-only header.
    pub fn all_topology_headers(&self) -> Vec<TopologyHeader> {
        self.wells
            .iter()
            .map(|w| {
                w.topology_header()
                    .cloned()
                    .unwrap_or_else(|| TopologyHeader::for_well(w.well_name()))
            })
            .collect()
    }

    pub fn all_topology_rows(&self) -> Vec<&TopologyRow> {
        self.wells.iter().flat_map(|w| w.topology_rows()).collect()
    }

    pub fn all_main_grid_connections(&self) -> Vec<&ConnectionRow> {
        self.wells
            .iter()
            .flat_map(WellTableData::main_grid_connections)
            .collect()
    }

    pub fn all_refined_grid_connections(&self) -> Vec<&ConnectionRow> {
        self.wells
            .iter()
            .flat_map(WellTableData::refined_grid_connections)
            .collect()
    }

    pub fn all_valve_rows(&self) -> Vec<&ValveRow> {
        self.wells.iter().flat_map(|w| w.valve_rows()).collect()
    }

    pub fn all_device_rows(&self) -> Vec<&DeviceRow> {
        self.wells.iter().flat_map(|w| w.device_rows()).collect()
    }

    pub fn has_any_refined_grid_data(&self) -> bool {
        self.wells.iter().any(WellTableData::has_refined_grid_data)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Every well's problems prefixed with its name, plus duplicate well names.
    pub fn validate(&self) -> Vec<String> {
        if self.wells.is_empty() {
            return vec!["No well data available".to_string()];
        }

        let mut errors: Vec<String> = self
            .wells
            .iter()
            .flat_map(|w| {
                w.validate()
                    .into_iter()
                    .map(move |e| format!("{}: {}", w.well_name(), e))
            })
            .collect();

        let mut names = self.well_names();
        names.sort_unstable();
        let mut duplicates: Vec<&str> = names
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .map(|pair| pair[0])
            .collect();
        duplicates.dedup();
        errors.extend(
            duplicates
                .into_iter()
                .map(|name| format!("Duplicate well name: {name}")),
        );

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
