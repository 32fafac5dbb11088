//! Row generators: lower a well topology tree into flat keyword rows
//!
//! One generator per keyword family:
//! - `segments`: segment-topology rows and the topology header
//! - `connections`: grid-cell connection rows, one pass per grid kind
//! - `valves`: segment valve rows
//! - `devices`: autonomous inflow control device rows
//!
//! All generators are pure functions of the tree. They never fail; structural
//! problems such as duplicate segment numbers are reported later by table
//! validation.

mod connections;
mod devices;
mod segments;
mod valves;

pub use connections::{collect_all_connection_rows, collect_connection_rows, GridPass};
pub use devices::collect_device_rows;
pub use segments::{build_topology_header, collect_topology_rows};
pub use valves::collect_valve_rows;

use crate::types::{Segment, SegmentHost};

/// Order in which nested completion segments are visited relative to their host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SegmentOrder {
    /// Each segment is followed directly by the segments of its completions
    #[default]
    Interleaved,
    /// All segments of a branch come first, then the completion segments of that branch
    CompletionsAfterBranch,
}

impl SegmentOrder {
    pub const fn from_completions_after_main_bore(after: bool) -> Self {
        if after {
            Self::CompletionsAfterBranch
        } else {
            Self::Interleaved
        }
    }
}

enum Work<'a> {
    Segment(&'a Segment),
    Host(&'a dyn SegmentHost),
}

/// Depth-first walk over every segment reachable from a host.
///
/// Child branches of a host are always visited after all of its segments and
/// their completions. Uses an explicit work stack so deep lateral trees do not
/// grow the call stack.
pub struct SegmentWalk<'a> {
    order: SegmentOrder,
    stack: Vec<Work<'a>>,
}

impl<'a> SegmentWalk<'a> {
    pub fn new(host: &'a dyn SegmentHost, order: SegmentOrder) -> Self {
        Self {
            order,
            stack: vec![Work::Host(host)],
        }
    }

    fn expand(&mut self, host: &'a dyn SegmentHost) {
        let mut pending: Vec<Work<'a>> = Vec::new();
        match self.order {
            SegmentOrder::Interleaved => {
                for segment in host.segments() {
                    pending.push(Work::Segment(segment));
                    pending.extend(
                        segment
                            .nested_hosts()
                            .map(|c| Work::Host(c as &dyn SegmentHost)),
                    );
                }
            }
            SegmentOrder::CompletionsAfterBranch => {
                pending.extend(host.segments().iter().map(Work::Segment));
                for segment in host.segments() {
                    pending.extend(
                        segment
                            .nested_hosts()
                            .map(|c| Work::Host(c as &dyn SegmentHost)),
                    );
                }
            }
        }
        pending.extend(
            host.child_branches()
                .iter()
                .map(|b| Work::Host(b as &dyn SegmentHost)),
        );

        // Stack pops from the back
        self.stack.extend(pending.into_iter().rev());
    }
}

impl<'a> Iterator for SegmentWalk<'a> {
    type Item = &'a Segment;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(work) = self.stack.pop() {
            match work {
                Work::Segment(segment) => return Some(segment),
                Work::Host(host) => self.expand(host),
            }
        }
        None
    }
}
