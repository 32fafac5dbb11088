//! Well topology tree: branches, segments, completions and grid intersections
//!
//! The tree is built by an external completion-modeling component and is
//! read-only for the exporter. All types derive serde so a finished tree can
//! be loaded from JSON or TOML model files.

use serde::{Deserialize, Serialize};

/// Number of tuning parameters carried by an autonomous inflow control device.
pub const AICD_PARAMETER_COUNT: usize = 8;

/// Map a value using the "positive infinity means unset" convention to an
/// explicit optional. Any non-finite value is treated as unset.
pub fn from_sentinel(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

// ============================================================================
// Capability shared by branches and segment-carrying completions
// ============================================================================

/// Anything that owns an ordered list of segments and may have lateral branches.
///
/// Branches implement this directly. Completions implement it too, so a device
/// distributed along a perforation is traversed exactly like a branch.
pub trait SegmentHost {
    /// Segments in document order.
    fn segments(&self) -> &[Segment];

    /// Lateral branches, traversed after all segments of this host.
    fn child_branches(&self) -> &[Branch];
}

// ============================================================================
// Branch
// ============================================================================

/// A bore (main bore or lateral) holding an ordered run of segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub branch_number: i32,

    /// Human readable name, used in segment comments
    #[serde(default)]
    pub label: String,

    /// Measured depth where the branch leaves its parent (or the wellhead)
    #[serde(default)]
    pub start_md: f64,

    /// True vertical depth at `start_md`
    #[serde(default)]
    pub start_tvd: f64,

    #[serde(default)]
    pub segments: Vec<Segment>,

    /// Laterals, in document order
    #[serde(default)]
    pub branches: Vec<Branch>,
}

impl Branch {
    pub fn new(branch_number: i32) -> Self {
        Self {
            branch_number,
            label: String::new(),
            start_md: 0.0,
            start_tvd: 0.0,
            segments: Vec::new(),
            branches: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_start(mut self, start_md: f64, start_tvd: f64) -> Self {
        self.start_md = start_md;
        self.start_tvd = start_tvd;
        self
    }

    pub fn add_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn add_branch(&mut self, branch: Self) {
        self.branches.push(branch);
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.branches.is_empty()
    }
}

impl SegmentHost for Branch {
    fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn child_branches(&self) -> &[Branch] {
        &self.branches
    }
}

// ============================================================================
// Segment
// ============================================================================

/// One flow segment of a multi-segment well.
///
/// Numeric hydraulic properties are independently optional. `None` means the
/// simulator should apply its own default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Unique within a well
    pub segment_number: i32,
    pub branch_number: i32,
    /// Segment this one drains into (the join segment)
    pub outlet_segment_number: i32,

    pub start_md: f64,
    pub end_md: f64,

    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub depth_change: Option<f64>,
    #[serde(default)]
    pub diameter: Option<f64>,
    #[serde(default)]
    pub roughness: Option<f64>,

    #[serde(default)]
    pub completions: Vec<Completion>,
    #[serde(default)]
    pub intersections: Vec<Intersection>,

    #[serde(default)]
    pub comment: Option<String>,
}

impl Segment {
    pub fn new(
        segment_number: i32,
        branch_number: i32,
        outlet_segment_number: i32,
        start_md: f64,
        end_md: f64,
    ) -> Self {
        Self {
            segment_number,
            branch_number,
            outlet_segment_number,
            start_md,
            end_md,
            length: None,
            depth_change: None,
            diameter: None,
            roughness: None,
            completions: Vec::new(),
            intersections: Vec::new(),
            comment: None,
        }
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_depth_change(mut self, depth_change: f64) -> Self {
        self.depth_change = Some(depth_change);
        self
    }

    pub fn with_diameter(mut self, diameter: f64) -> Self {
        self.diameter = Some(diameter);
        self
    }

    pub fn with_roughness(mut self, roughness: f64) -> Self {
        self.roughness = Some(roughness);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn add_completion(&mut self, completion: Completion) {
        self.completions.push(completion);
    }

    pub fn add_intersection(&mut self, intersection: Intersection) {
        self.intersections.push(intersection);
    }

    /// Completions that carry their own segments and must be traversed as branches.
    pub fn nested_hosts(&self) -> impl Iterator<Item = &Completion> {
        self.completions.iter().filter(|c| c.has_nested_segments())
    }
}

// ============================================================================
// Completions
// ============================================================================

/// Parameters shared by the valve-like completion kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValveParameters {
    #[serde(default)]
    pub flow_coefficient: Option<f64>,
    #[serde(default)]
    pub area: Option<f64>,
    /// Additional pipe length through the valve
    #[serde(default)]
    pub additional_length: Option<f64>,
    /// Explicit valve type label; falls back to the completion kind
    #[serde(default)]
    pub valve_type: Option<String>,
}

impl ValveParameters {
    pub fn new(flow_coefficient: f64, area: f64) -> Self {
        Self {
            flow_coefficient: Some(flow_coefficient),
            area: Some(area),
            ..Self::default()
        }
    }
}

/// Parameters of an autonomous inflow control device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AicdParameters {
    /// Strength, calibration density, calibration viscosity, critical value,
    /// transition width, max viscosity ratio, flow rate exponent, viscosity exponent.
    /// Files may list fewer than eight values; the rest are unset.
    #[serde(default, deserialize_with = "deserialize_device_parameters")]
    pub parameters: [Option<f64>; AICD_PARAMETER_COUNT],
    #[serde(default = "default_device_open")]
    pub open: bool,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub flow_scaling_factor: Option<f64>,
}

fn default_device_open() -> bool {
    true
}

fn deserialize_device_parameters<'de, D>(
    deserializer: D,
) -> Result<[Option<f64>; AICD_PARAMETER_COUNT], D::Error>
where
    D: serde::Deserializer<'de>,
{
    let listed: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
    if listed.len() > AICD_PARAMETER_COUNT {
        return Err(serde::de::Error::invalid_length(
            listed.len(),
            &"at most 8 device parameters",
        ));
    }

    let mut parameters = [None; AICD_PARAMETER_COUNT];
    for (slot, value) in parameters.iter_mut().zip(listed) {
        *slot = value;
    }
    Ok(parameters)
}

impl Default for AicdParameters {
    fn default() -> Self {
        Self {
            parameters: [None; AICD_PARAMETER_COUNT],
            open: default_device_open(),
            length: None,
            flow_scaling_factor: None,
        }
    }
}

impl AicdParameters {
    /// The device strength is the one parameter the simulator cannot default.
    pub fn has_strength(&self) -> bool {
        self.parameters[0].is_some_and(f64::is_finite)
    }
}

/// Closed set of completion kinds understood by the exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompletionKind {
    Perforation,
    /// Inflow control device
    Icd(ValveParameters),
    /// Autonomous inflow control device
    Aicd(AicdParameters),
    /// Inflow control valve
    Icv(ValveParameters),
    /// Generic segment valve
    Valve(ValveParameters),
}

impl CompletionKind {
    /// Valve parameters for the kinds exported to the valve table.
    pub fn valve_parameters(&self) -> Option<&ValveParameters> {
        match self {
            Self::Icd(p) | Self::Icv(p) | Self::Valve(p) => Some(p),
            Self::Perforation | Self::Aicd(_) => None,
        }
    }

    /// Device parameters for the autonomous device table.
    pub fn aicd_parameters(&self) -> Option<&AicdParameters> {
        match self {
            Self::Aicd(p) => Some(p),
            Self::Perforation | Self::Icd(_) | Self::Icv(_) | Self::Valve(_) => None,
        }
    }

    /// Valve type label written when the parameters carry none.
    pub fn default_valve_type(&self) -> Option<&'static str> {
        match self {
            Self::Icd(_) => Some("ICD"),
            Self::Icv(_) => Some("ICV"),
            Self::Perforation | Self::Aicd(_) | Self::Valve(_) => None,
        }
    }
}

/// A downhole completion attached to a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    #[serde(default)]
    pub label: String,
    pub kind: CompletionKind,
    /// Segments owned by a distributed device
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Completion {
    pub fn new(kind: CompletionKind) -> Self {
        Self {
            label: String::new(),
            kind,
            segments: Vec::new(),
        }
    }

    pub fn perforation() -> Self {
        Self::new(CompletionKind::Perforation)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn has_nested_segments(&self) -> bool {
        !self.segments.is_empty()
    }

    /// Segment number a device row is keyed by: the device's own first
    /// segment, or the host segment for a device without nested segments.
    pub fn device_segment_number(&self, host: &Segment) -> i32 {
        self.segments
            .first()
            .map_or(host.segment_number, |s| s.segment_number)
    }
}

impl SegmentHost for Completion {
    fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn child_branches(&self) -> &[Branch] {
        &[]
    }
}

// ============================================================================
// Grid intersections
// ============================================================================

/// Direction in which the well penetrates a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PenetrationDirection {
    X,
    Y,
    Z,
}

impl PenetrationDirection {
    pub fn label(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        }
    }
}

/// A reservoir cell crossed by a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    /// Local grid refinement name; absent or empty for the main grid
    #[serde(default)]
    pub grid_name: Option<String>,

    /// Zero-based cell indices local to the grid
    pub i: usize,
    pub j: usize,
    pub k: usize,

    /// Unique across all grids of the model
    pub global_cell_index: usize,

    #[serde(default)]
    pub direction: Option<PenetrationDirection>,
    #[serde(default)]
    pub end_range: Option<f64>,
    #[serde(default)]
    pub connection_depth: Option<f64>,
}

impl Intersection {
    pub fn main_grid(i: usize, j: usize, k: usize, global_cell_index: usize) -> Self {
        Self {
            grid_name: None,
            i,
            j,
            k,
            global_cell_index,
            direction: None,
            end_range: None,
            connection_depth: None,
        }
    }

    pub fn refined_grid(
        grid_name: impl Into<String>,
        i: usize,
        j: usize,
        k: usize,
        global_cell_index: usize,
    ) -> Self {
        Self {
            grid_name: Some(grid_name.into()),
            ..Self::main_grid(i, j, k, global_cell_index)
        }
    }

    pub fn with_direction(mut self, direction: PenetrationDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn is_refined_grid(&self) -> bool {
        self.grid_name.as_deref().is_some_and(|g| !g.is_empty())
    }
}

// ============================================================================
// Well model
// ============================================================================

/// A complete well ready for export: its export name and main bore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellModel {
    /// Name written to every keyword table
    pub name: String,
    pub main_bore: Branch,
    /// Wellbore volume of the top segment
    #[serde(default)]
    pub top_wellbore_volume: Option<f64>,
}

impl WellModel {
    pub fn new(name: impl Into<String>, main_bore: Branch) -> Self {
        Self {
            name: name.into(),
            main_bore,
            top_wellbore_volume: None,
        }
    }
}
