//! Keyword table formatter
//!
//! Lowers row tables into keyword tables through the [`TableSink`] boundary.
//! Families are written in a fixed order, and a family without rows is
//! skipped entirely:
//!
//! 1. `WELSEGS` segment topology
//! 2. `COMPSEGS` main-grid cell connections
//! 3. `COMPSEGL` refined-grid cell connections, one table per grid
//! 4. `WSEGVALV` segment valves
//! 5. `WSEGAICD` autonomous inflow control devices
//!
//! Cell indices are stored zero-based and written one-based.

mod deck_writer;
mod sink;

pub use deck_writer::DeckWriter;
pub use sink::{CellValue, Column, FloatFormat, TableSink};

use crate::config::defaults::{DEVICE_PARAMETER_PRECISION, ROUGHNESS_PRECISION, VALVE_AREA_PRECISION};
use crate::tables::{UnifiedWellData, WellTableData};
use crate::types::{ConnectionRow, DeviceRow, TopologyHeader, TopologyRow, ValveRow};

pub const KEYWORD_TOPOLOGY: &str = "WELSEGS";
pub const KEYWORD_MAIN_GRID_CONNECTIONS: &str = "COMPSEGS";
pub const KEYWORD_REFINED_GRID_CONNECTIONS: &str = "COMPSEGL";
pub const KEYWORD_VALVES: &str = "WSEGVALV";
pub const KEYWORD_DEVICES: &str = "WSEGAICD";

const DEVICE_PARAMETER_TITLES: [&str; crate::types::AICD_PARAMETER_COUNT] = [
    "Strength",
    "Density Cal",
    "Viscosity Cal",
    "Critical Value",
    "Width Trans",
    "Max Visc Ratio",
    "Flow Rate Exp",
    "Visc Exp",
];

// ============================================================================
// Call shapes
// ============================================================================

/// Write every keyword family of a single well.
pub fn format_well(sink: &mut dyn TableSink, table: &WellTableData) {
    if table.has_topology_data() {
        let header = table
            .topology_header()
            .cloned()
            .unwrap_or_else(|| TopologyHeader::for_well(table.well_name()));
        let rows: Vec<&TopologyRow> = table.topology_rows().iter().collect();
        format_topology_table(sink, &[header], &rows);
    }

    format_connection_table(sink, table.well_name(), &table.main_grid_connections());

    for (grid_name, rows) in group_by_grid(table.refined_grid_connections()) {
        format_refined_connection_table(sink, table.well_name(), grid_name, &rows);
    }

    let well_names = [table.well_name()];
    let valves: Vec<&ValveRow> = table.valve_rows().iter().collect();
    format_valve_table(sink, &well_names, &valves);

    let devices: Vec<&DeviceRow> = table.device_rows().iter().collect();
    format_device_table(sink, &well_names, &devices);
}

/// Write many wells into one deck.
///
/// Topology, valve and device tables are shared by all wells: one header row
/// per well, then all rows. Connection tables stay per well, with every
/// well's main-grid table before any refined-grid table.
pub fn format_unified(sink: &mut dyn TableSink, unified: &UnifiedWellData) {
    let topology_rows = unified.all_topology_rows();
    if !topology_rows.is_empty() {
        format_topology_table(sink, &unified.all_topology_headers(), &topology_rows);
    }

    for well in unified.well_data_list() {
        format_connection_table(sink, well.well_name(), &well.main_grid_connections());
    }

    for well in unified.well_data_list() {
        for (grid_name, rows) in group_by_grid(well.refined_grid_connections()) {
            format_refined_connection_table(sink, well.well_name(), grid_name, &rows);
        }
    }

    let names = unified.well_names();
    format_valve_table(sink, &names, &unified.all_valve_rows());
    format_device_table(sink, &names, &unified.all_device_rows());
}

// ============================================================================
// WELSEGS
// ============================================================================

pub fn format_topology_table(
    sink: &mut dyn TableSink,
    headers: &[TopologyHeader],
    rows: &[&TopologyRow],
) {
    if rows.is_empty() {
        return;
    }

    sink.keyword(KEYWORD_TOPOLOGY);

    sink.header(&[
        Column::new("Name"),
        Column::new("Dep 1"),
        Column::new("Tlen 1"),
        Column::new("Vol 1"),
        Column::new("Len&Dep"),
        Column::new("PresDrop"),
    ]);
    for header in headers {
        sink.add(header.well_name.as_str().into());
        sink.add_optional(header.top_depth);
        sink.add_optional(header.top_length);
        sink.add_optional(header.wellbore_volume);
        sink.add(header.length_and_depth.keyword().into());
        sink.add(header.pressure_drop.keyword().into());
        sink.row_completed();
    }

    sink.header(&[
        Column::new("First Seg"),
        Column::new("Last Seg"),
        Column::new("Branch No"),
        Column::new("Outlet Seg"),
        Column::new("Length"),
        Column::new("Depth Change"),
        Column::new("Diam"),
        Column::with_format("Rough", FloatFormat::Fixed(ROUGHNESS_PRECISION)),
    ]);
    for row in rows {
        if let Some(comment) = &row.comment {
            sink.comment(comment);
        }
        sink.add(row.segment_number.into());
        sink.add(row.segment_number.into());
        sink.add(row.branch_number.into());
        sink.add(row.outlet_segment_number.into());
        sink.add_optional(row.length);
        sink.add_optional(row.depth_change);
        sink.add_optional(row.diameter);
        sink.add_optional(row.roughness);
        sink.row_completed();
    }

    sink.table_completed();
}

// ============================================================================
// COMPSEGS / COMPSEGL
// ============================================================================

fn connection_columns() -> Vec<Column> {
    [
        "I",
        "J",
        "K",
        "Branch no",
        "Start Length",
        "End Length",
        "Dir Pen",
        "End Range",
        "Connection Depth",
    ]
    .into_iter()
    .map(Column::new)
    .collect()
}

/// Zero-based index to its deck form; an index with no one-based form is defaulted.
fn one_based(index: usize) -> CellValue {
    index.checked_add(1).map_or(CellValue::Default, CellValue::from)
}

fn add_connection_cells(sink: &mut dyn TableSink, row: &ConnectionRow) {
    sink.add(one_based(row.i));
    sink.add(one_based(row.j));
    sink.add(one_based(row.k));
    sink.add(row.branch_number.into());
    sink.add(row.start_length.into());
    sink.add(row.end_length.into());
    match row.direction {
        Some(direction) => sink.add(direction.label().into()),
        None => sink.add(CellValue::Default),
    }
    sink.add_optional(row.end_range);
    sink.add_optional(row.connection_depth);
    sink.row_completed();
}

/// Main-grid connections of one well.
pub fn format_connection_table(sink: &mut dyn TableSink, well_name: &str, rows: &[&ConnectionRow]) {
    if rows.is_empty() {
        return;
    }

    sink.keyword(KEYWORD_MAIN_GRID_CONNECTIONS);
    sink.header(&[Column::new("Name")]);
    sink.add(well_name.into());
    sink.row_completed();

    sink.header(&connection_columns());
    for row in rows {
        add_connection_cells(sink, row);
    }
    sink.table_completed();
}

/// Connections of one well inside one refined grid.
pub fn format_refined_connection_table(
    sink: &mut dyn TableSink,
    well_name: &str,
    grid_name: &str,
    rows: &[&ConnectionRow],
) {
    if rows.is_empty() {
        return;
    }

    sink.keyword(KEYWORD_REFINED_GRID_CONNECTIONS);
    sink.header(&[Column::new("Name"), Column::new("Grid")]);
    sink.add(well_name.into());
    sink.add(grid_name.into());
    sink.row_completed();

    let mut columns = vec![Column::new("Grid")];
    columns.extend(connection_columns());
    sink.header(&columns);
    for row in rows {
        sink.add(row.grid_name.as_deref().unwrap_or(grid_name).into());
        add_connection_cells(sink, row);
    }
    sink.table_completed();
}

/// Split refined-grid rows per grid name, grids in order of first appearance.
pub fn group_by_grid<'a>(rows: Vec<&'a ConnectionRow>) -> Vec<(&'a str, Vec<&'a ConnectionRow>)> {
    let mut groups: Vec<(&'a str, Vec<&'a ConnectionRow>)> = Vec::new();
    for row in rows {
        let grid = row.grid_name.as_deref().unwrap_or_default();
        match groups.iter_mut().find(|(name, _)| *name == grid) {
            Some((_, group)) => group.push(row),
            None => groups.push((grid, vec![row])),
        }
    }
    groups
}

// ============================================================================
// WSEGVALV
// ============================================================================

pub fn format_valve_table(sink: &mut dyn TableSink, well_names: &[&str], rows: &[&ValveRow]) {
    if rows.is_empty() {
        return;
    }

    sink.keyword(KEYWORD_VALVES);
    sink.header(&[Column::new("Name")]);
    for name in well_names {
        sink.add((*name).into());
        sink.row_completed();
    }

    sink.header(&[
        Column::new("Seg No"),
        Column::new("Cv"),
        Column::with_format("Ac", FloatFormat::Concise(VALVE_AREA_PRECISION)),
        Column::new("L"),
        Column::new("Type"),
    ]);
    for row in rows {
        if let Some(comment) = &row.comment {
            sink.comment(comment);
        }
        sink.add(row.segment_number.into());
        sink.add_optional(row.flow_coefficient);
        sink.add_optional(row.area);
        sink.add_optional(row.additional_length);
        match &row.valve_type {
            Some(valve_type) => sink.add(valve_type.as_str().into()),
            None => sink.add(CellValue::Default),
        }
        sink.row_completed();
    }
    sink.table_completed();
}

// ============================================================================
// WSEGAICD
// ============================================================================

pub fn format_device_table(sink: &mut dyn TableSink, well_names: &[&str], rows: &[&DeviceRow]) {
    if rows.is_empty() {
        return;
    }

    sink.keyword(KEYWORD_DEVICES);
    sink.header(&[Column::new("Name")]);
    for name in well_names {
        sink.add((*name).into());
        sink.row_completed();
    }

    let mut columns = vec![Column::new("Seg No")];
    columns.extend(DEVICE_PARAMETER_TITLES.iter().map(|title| {
        Column::with_format(*title, FloatFormat::Concise(DEVICE_PARAMETER_PRECISION))
    }));
    columns.push(Column::new("DeviceOp"));
    columns.push(Column::new("Length"));
    columns.push(Column::new("ScalingFac"));
    sink.header(&columns);

    for row in rows {
        if let Some(comment) = &row.comment {
            sink.comment(comment);
        }
        sink.add(row.segment_number.into());
        for value in row.parameters {
            sink.add_optional(value);
        }
        sink.add(row.operation_keyword().into());
        sink.add_optional(row.length);
        sink.add_optional(row.flow_scaling_factor);
        sink.row_completed();
    }
    sink.table_completed();
}
