//! Per-well table: every keyword row family for a single well

use serde::{Deserialize, Serialize};

use crate::types::{ConnectionRow, DeviceRow, TopologyHeader, TopologyRow, ValveRow};

/// Deck text is delimited by single quotes and has no escape for them.
const QUOTE: char = '\'';

/// Zero-based cell index whose one-based form fits a deck integer.
fn fits_one_based(index: usize) -> bool {
    i32::try_from(index)
        .ok()
        .and_then(|v| v.checked_add(1))
        .is_some()
}

/// All rows exported for one well.
///
/// Rows are accepted as-is on insertion. Structural problems (missing name,
/// missing topology, duplicate segment numbers) are reported by [`validate`].
///
/// [`validate`]: WellTableData::validate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WellTableData {
    well_name: String,
    topology_header: Option<TopologyHeader>,
    topology_rows: Vec<TopologyRow>,
    connection_rows: Vec<ConnectionRow>,
    valve_rows: Vec<ValveRow>,
    device_rows: Vec<DeviceRow>,
}

impl WellTableData {
    pub fn new(well_name: impl Into<String>) -> Self {
        Self {
            well_name: well_name.into(),
            ..Self::default()
        }
    }

    pub fn well_name(&self) -> &str {
        &self.well_name
    }

    // ========================================================================
    // Population
    // ========================================================================

    pub fn set_topology_header(&mut self, header: TopologyHeader) {
        self.topology_header = Some(header);
    }

    pub fn add_topology_row(&mut self, row: TopologyRow) {
        self.topology_rows.push(row);
    }

    pub fn add_connection_row(&mut self, row: ConnectionRow) {
        self.connection_rows.push(row);
    }

    pub fn add_valve_row(&mut self, row: ValveRow) {
        self.valve_rows.push(row);
    }

    pub fn add_device_row(&mut self, row: DeviceRow) {
        self.device_rows.push(row);
    }

    pub fn extend_topology_rows(&mut self, rows: impl IntoIterator<Item = TopologyRow>) {
        self.topology_rows.extend(rows);
    }

    pub fn extend_connection_rows(&mut self, rows: impl IntoIterator<Item = ConnectionRow>) {
        self.connection_rows.extend(rows);
    }

    pub fn extend_valve_rows(&mut self, rows: impl IntoIterator<Item = ValveRow>) {
        self.valve_rows.extend(rows);
    }

    pub fn extend_device_rows(&mut self, rows: impl IntoIterator<Item = DeviceRow>) {
        self.device_rows.extend(rows);
    }

    // ========================================================================
    // Access
    // ========================================================================

    pub fn topology_header(&self) -> Option<&TopologyHeader> {
        self.topology_header.as_ref()
    }

    pub fn topology_rows(&self) -> &[TopologyRow] {
        &self.topology_rows
    }

    pub fn connection_rows(&self) -> &[ConnectionRow] {
        &self.connection_rows
    }

    pub fn valve_rows(&self) -> &[ValveRow] {
        &self.valve_rows
    }

    pub fn device_rows(&self) -> &[DeviceRow] {
        &self.device_rows
    }

    pub fn main_grid_connections(&self) -> Vec<&ConnectionRow> {
        self.connection_rows
            .iter()
            .filter(|r| !r.is_refined_grid())
            .collect()
    }

    pub fn refined_grid_connections(&self) -> Vec<&ConnectionRow> {
        self.connection_rows
            .iter()
            .filter(|r| r.is_refined_grid())
            .collect()
    }

    pub fn has_topology_data(&self) -> bool {
        !self.topology_rows.is_empty()
    }

    pub fn has_connection_data(&self) -> bool {
        !self.connection_rows.is_empty()
    }

    pub fn has_valve_data(&self) -> bool {
        !self.valve_rows.is_empty()
    }

    pub fn has_device_data(&self) -> bool {
        !self.device_rows.is_empty()
    }

    pub fn has_refined_grid_data(&self) -> bool {
        self.connection_rows.iter().any(ConnectionRow::is_refined_grid)
    }

    pub fn is_empty(&self) -> bool {
        !self.has_topology_data()
            && !self.has_connection_data()
            && !self.has_valve_data()
            && !self.has_device_data()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Structural problems with this table. Empty means the table can be written.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.well_name.trim().is_empty() {
            errors.push("Well name is empty".to_string());
        }

        if self.well_name.contains(QUOTE) {
            errors.push("Well name contains a quote character".to_string());
        }

        if self.topology_rows.is_empty() {
            errors.push("No segment topology data".to_string());
        }

        let mut numbers: Vec<i32> = self.topology_rows.iter().map(|r| r.segment_number).collect();
        numbers.sort_unstable();
        let mut duplicates: Vec<i32> = numbers
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .map(|pair| pair[0])
            .collect();
        duplicates.dedup();
        errors.extend(
            duplicates
                .into_iter()
                .map(|n| format!("Duplicate segment number: {n}")),
        );

        for row in &self.connection_rows {
            if ![row.i, row.j, row.k].into_iter().all(fits_one_based) {
                errors.push(format!(
                    "Cell index out of range: ({}, {}, {})",
                    row.i, row.j, row.k
                ));
            }
        }

        let mut grid_names: Vec<&str> = self
            .connection_rows
            .iter()
            .filter_map(|r| r.grid_name.as_deref())
            .filter(|name| name.contains(QUOTE))
            .collect();
        grid_names.sort_unstable();
        grid_names.dedup();
        errors.extend(
            grid_names
                .into_iter()
                .map(|name| format!("Grid name contains a quote character: {name}")),
        );

        for valve_type in self.valve_rows.iter().filter_map(|r| r.valve_type.as_deref()) {
            if valve_type.contains(QUOTE) {
                errors.push(format!("Valve type contains a quote character: {valve_type}"));
            }
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
