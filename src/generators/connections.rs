//! Grid-cell connection rows (`COMPSEGS` / `COMPSEGL`)
//!
//! Overlapping completions can reach the same reservoir cell more than once.
//! Within one well and one grid pass the first reach wins: later intersections
//! with an already-seen global cell index are dropped.

use std::collections::HashSet;

use tracing::debug;

use crate::types::{Branch, ConnectionRow, Intersection, Segment, SegmentHost};

/// Which grid kind a connection pass collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPass {
    Main,
    Refined,
}

impl GridPass {
    fn accepts(self, intersection: &Intersection) -> bool {
        match self {
            Self::Main => !intersection.is_refined_grid(),
            Self::Refined => intersection.is_refined_grid(),
        }
    }
}

/// Connection rows for one grid pass over everything reachable from `host`.
pub fn collect_connection_rows(
    well_name: &str,
    host: &dyn SegmentHost,
    pass: GridPass,
) -> Vec<ConnectionRow> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    visit_host(well_name, host, pass, &mut seen, &mut rows);

    debug!(
        well = well_name,
        pass = ?pass,
        rows = rows.len(),
        "Collected connection rows"
    );
    rows
}

/// Main-grid rows followed by refined-grid rows.
pub fn collect_all_connection_rows(well_name: &str, main_bore: &Branch) -> Vec<ConnectionRow> {
    let mut rows = collect_connection_rows(well_name, main_bore, GridPass::Main);
    rows.extend(collect_connection_rows(well_name, main_bore, GridPass::Refined));
    rows
}

fn visit_host(
    well_name: &str,
    host: &dyn SegmentHost,
    pass: GridPass,
    seen: &mut HashSet<usize>,
    out: &mut Vec<ConnectionRow>,
) {
    for segment in host.segments() {
        for intersection in &segment.intersections {
            if !pass.accepts(intersection) {
                continue;
            }
            if seen.insert(intersection.global_cell_index) {
                out.push(connection_row(well_name, segment, intersection, pass));
            }
        }

        for completion in segment.nested_hosts() {
            visit_host(well_name, completion, pass, seen, out);
        }
    }

    for branch in host.child_branches() {
        visit_host(well_name, branch, pass, seen, out);
    }
}

fn connection_row(
    well_name: &str,
    segment: &Segment,
    intersection: &Intersection,
    pass: GridPass,
) -> ConnectionRow {
    let grid_name = match pass {
        GridPass::Main => None,
        GridPass::Refined => intersection.grid_name.clone(),
    };

    ConnectionRow {
        well_name: well_name.to_string(),
        grid_name,
        i: intersection.i,
        j: intersection.j,
        k: intersection.k,
        branch_number: segment.branch_number,
        start_length: segment.start_md,
        end_length: segment.end_md,
        direction: intersection.direction,
        end_range: intersection.end_range,
        connection_depth: intersection.connection_depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Completion, CompletionKind, ValveParameters};

    fn segment_with_cells(number: i32, cells: &[Intersection]) -> Segment {
        let mut segment = Segment::new(number, 1, number - 1, 0.0, 10.0);
        for cell in cells {
            segment.add_intersection(cell.clone());
        }
        segment
    }

    #[test]
    fn test_shared_cell_emitted_once() {
        let shared = Intersection::main_grid(1, 1, 1, 50);
        let mut bore = Branch::new(1);
        bore.add_segment(segment_with_cells(1, &[shared.clone()]));
        bore.add_segment(segment_with_cells(2, &[shared, Intersection::main_grid(1, 1, 2, 51)]));

        let rows = collect_connection_rows("W1", &bore, GridPass::Main);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].k, rows[1].k), (1, 2));
    }

    #[test]
    fn test_first_reach_wins_through_completion_segments() {
        let cell = Intersection::main_grid(4, 4, 4, 9);
        let mut host = segment_with_cells(1, &[]);
        let mut nested = Segment::new(10, 7, 1, 5.0, 5.1);
        nested.add_intersection(cell.clone());
        host.add_completion(
            Completion::new(CompletionKind::Icd(ValveParameters::default())).with_segment(nested),
        );
        let mut bore = Branch::new(1);
        bore.add_segment(host);
        bore.add_segment(segment_with_cells(2, &[cell]));

        let rows = collect_connection_rows("W1", &bore, GridPass::Main);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].branch_number, 7);
    }

    #[test]
    fn test_passes_partition_by_grid() {
        let mut bore = Branch::new(1);
        bore.add_segment(segment_with_cells(
            1,
            &[
                Intersection::main_grid(0, 0, 0, 1),
                Intersection::refined_grid("LGR1", 0, 0, 0, 1000),
            ],
        ));

        let main = collect_connection_rows("W1", &bore, GridPass::Main);
        let refined = collect_connection_rows("W1", &bore, GridPass::Refined);
        assert_eq!(main.len(), 1);
        assert!(main[0].grid_name.is_none());
        assert_eq!(refined.len(), 1);
        assert_eq!(refined[0].grid_name.as_deref(), Some("LGR1"));

        let all = collect_all_connection_rows("W1", &bore);
        assert!(!all[0].is_refined_grid());
        assert!(all[1].is_refined_grid());
    }

    #[test]
    fn test_lateral_visited_after_host_segments() {
        let mut lateral = Branch::new(2);
        lateral.add_segment(segment_with_cells(10, &[Intersection::main_grid(9, 0, 0, 90)]));
        let mut bore = Branch::new(1);
        bore.add_branch(lateral);
        bore.add_segment(segment_with_cells(1, &[Intersection::main_grid(1, 0, 0, 10)]));

        let rows = collect_connection_rows("W1", &bore, GridPass::Main);
        assert_eq!(rows.iter().map(|r| r.i).collect::<Vec<_>>(), vec![1, 9]);
    }
}
