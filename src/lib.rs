//! msw-export: Multi-Segment Well Deck Exporter
//!
//! Lowers a completed multi-segment well topology into the keyword tables a
//! reservoir simulator reads.
//!
//! ## Architecture
//!
//! - **Types**: read-only topology tree (branches, segments, completions,
//!   grid intersections) and the flat row records
//! - **Generators**: one traversal per keyword family, with per-pass cell
//!   deduplication
//! - **Tables**: per-well row accumulation and multi-well aggregation with
//!   structural validation
//! - **Formatter**: keyword/column layout through the `TableSink` boundary,
//!   with `DeckWriter` as the text implementation
//! - **Export**: model → table → deck pipeline, optionally parallel per well

pub mod config;
pub mod export;
pub mod formatter;
pub mod generators;
pub mod model;
pub mod tables;
pub mod types;

// Re-export configuration
pub use config::ExportConfig;

// Re-export the topology and row types
pub use types::{
    AicdParameters, Branch, Completion, CompletionKind, ConnectionRow, DeviceRow, Intersection,
    PenetrationDirection, Segment, SegmentHost, TopologyHeader, TopologyRow, ValveParameters,
    ValveRow, WellModel,
};

// Re-export tables and output
pub use export::ExportError;
pub use formatter::{DeckWriter, TableSink};
pub use model::ModelError;
pub use tables::{UnifiedWellData, WellTableData};
