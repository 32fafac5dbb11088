//! Row tables: per-well accumulation and multi-well aggregation
//!
//! `WellTableData` owns one well's rows across every keyword family.
//! `UnifiedWellData` collects many wells for a single combined deck.

mod unified;
mod well_table;

pub use unified::UnifiedWellData;
pub use well_table::WellTableData;
