//! Flat row records produced by traversing a well topology tree
//!
//! Rows are plain values: generators create them, tables own them and the
//! formatter reads them. Nothing mutates a row after creation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::topology::PenetrationDirection;

/// How lengths and depths in the topology table are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthDepthMode {
    /// Values are increments along each segment
    #[serde(rename = "INC")]
    Incremental,
    /// Values are absolute depths and lengths
    #[default]
    #[serde(rename = "ABS")]
    Absolute,
}

impl LengthDepthMode {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Incremental => "INC",
            Self::Absolute => "ABS",
        }
    }
}

impl fmt::Display for LengthDepthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Pressure drop components the simulator includes for the well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureDropMode {
    #[serde(rename = "H--")]
    Hydrostatic,
    #[default]
    #[serde(rename = "HF-")]
    HydrostaticFriction,
    #[serde(rename = "HFA")]
    HydrostaticFrictionAcceleration,
}

impl PressureDropMode {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Hydrostatic => "H--",
            Self::HydrostaticFriction => "HF-",
            Self::HydrostaticFrictionAcceleration => "HFA",
        }
    }
}

impl fmt::Display for PressureDropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Single header row of the segment-topology table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyHeader {
    pub well_name: String,
    /// Depth of the top segment node
    pub top_depth: Option<f64>,
    /// Length down the tubing to the top segment node
    pub top_length: Option<f64>,
    pub wellbore_volume: Option<f64>,
    pub length_and_depth: LengthDepthMode,
    pub pressure_drop: PressureDropMode,
}

impl TopologyHeader {
    /// Header carrying only the well name; every value left to the simulator.
    pub fn for_well(well_name: impl Into<String>) -> Self {
        Self {
            well_name: well_name.into(),
            top_depth: None,
            top_length: None,
            wellbore_volume: None,
            length_and_depth: LengthDepthMode::default(),
            pressure_drop: PressureDropMode::default(),
        }
    }
}

/// One segment of the topology table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyRow {
    pub segment_number: i32,
    pub branch_number: i32,
    pub outlet_segment_number: i32,
    pub length: Option<f64>,
    pub depth_change: Option<f64>,
    pub diameter: Option<f64>,
    pub roughness: Option<f64>,
    pub comment: Option<String>,
}

/// One reservoir cell connection.
///
/// Cell indices are zero-based here; the formatter shifts them to one-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRow {
    pub well_name: String,
    /// Set only for refined-grid connections
    pub grid_name: Option<String>,
    pub i: usize,
    pub j: usize,
    pub k: usize,
    pub branch_number: i32,
    pub start_length: f64,
    pub end_length: f64,
    pub direction: Option<PenetrationDirection>,
    pub end_range: Option<f64>,
    pub connection_depth: Option<f64>,
}

impl ConnectionRow {
    pub fn is_refined_grid(&self) -> bool {
        self.grid_name.as_deref().is_some_and(|g| !g.is_empty())
    }
}

/// One segment valve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValveRow {
    pub segment_number: i32,
    pub flow_coefficient: Option<f64>,
    pub area: Option<f64>,
    pub additional_length: Option<f64>,
    pub valve_type: Option<String>,
    pub comment: Option<String>,
}

/// One autonomous inflow control device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRow {
    pub segment_number: i32,
    pub parameters: [Option<f64>; super::AICD_PARAMETER_COUNT],
    pub open: bool,
    pub length: Option<f64>,
    pub flow_scaling_factor: Option<f64>,
    pub comment: Option<String>,
}

impl DeviceRow {
    pub fn operation_keyword(&self) -> &'static str {
        if self.open {
            "OPEN"
        } else {
            "SHUT"
        }
    }
}
