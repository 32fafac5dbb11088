//! Segment-topology rows (`WELSEGS`)

use tracing::debug;

use super::{SegmentOrder, SegmentWalk};
use crate::types::{
    Branch, LengthDepthMode, PressureDropMode, Segment, TopologyHeader, TopologyRow, WellModel,
};

/// Header row for a well: top node taken from the start of the main bore.
pub fn build_topology_header(
    well: &WellModel,
    length_and_depth: LengthDepthMode,
    pressure_drop: PressureDropMode,
) -> TopologyHeader {
    TopologyHeader {
        well_name: well.name.clone(),
        top_depth: Some(well.main_bore.start_tvd),
        top_length: Some(well.main_bore.start_md),
        wellbore_volume: well.top_wellbore_volume,
        length_and_depth,
        pressure_drop,
    }
}

/// One row per segment reachable from the main bore, in walk order.
pub fn collect_topology_rows(main_bore: &Branch, order: SegmentOrder) -> Vec<TopologyRow> {
    let rows: Vec<TopologyRow> = SegmentWalk::new(main_bore, order)
        .map(topology_row)
        .collect();

    debug!(
        branch = main_bore.branch_number,
        rows = rows.len(),
        "Collected segment topology rows"
    );
    rows
}

fn topology_row(segment: &Segment) -> TopologyRow {
    TopologyRow {
        segment_number: segment.segment_number,
        branch_number: segment.branch_number,
        outlet_segment_number: segment.outlet_segment_number,
        length: segment.length,
        depth_change: segment.depth_change,
        diameter: segment.diameter,
        roughness: segment.roughness,
        comment: segment.comment.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_copy_segment_fields() {
        let mut bore = Branch::new(1);
        bore.add_segment(
            Segment::new(2, 1, 1, 1000.0, 1010.0)
                .with_length(10.0)
                .with_diameter(0.15)
                .with_comment("Main bore"),
        );

        let rows = collect_topology_rows(&bore, SegmentOrder::Interleaved);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.segment_number, 2);
        assert_eq!(row.outlet_segment_number, 1);
        assert_eq!(row.length, Some(10.0));
        assert_eq!(row.diameter, Some(0.15));
        assert_eq!(row.roughness, None);
        assert_eq!(row.depth_change, None);
        assert_eq!(row.comment.as_deref(), Some("Main bore"));
    }

    #[test]
    fn test_header_uses_main_bore_start() {
        let well = WellModel {
            name: "W1".to_string(),
            main_bore: Branch::new(1).with_start(1200.0, 1100.0),
            top_wellbore_volume: None,
        };
        let header = build_topology_header(
            &well,
            LengthDepthMode::Incremental,
            PressureDropMode::Hydrostatic,
        );
        assert_eq!(header.well_name, "W1");
        assert_eq!(header.top_length, Some(1200.0));
        assert_eq!(header.top_depth, Some(1100.0));
        assert_eq!(header.wellbore_volume, None);
        assert_eq!(header.length_and_depth, LengthDepthMode::Incremental);
    }
}
