//! Shared data structures for multi-segment well export
//!
//! - `topology`: the read-only input tree (branches, segments, completions,
//!   grid intersections) and the `WellModel` wrapper
//! - `rows`: flat records produced by the generators and rendered by the formatter

mod rows;
mod topology;

pub use rows::*;
pub use topology::*;
