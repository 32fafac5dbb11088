//! Autonomous inflow control device rows (`WSEGAICD`)

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::{SegmentOrder, SegmentWalk};
use crate::types::{Branch, Completion, DeviceRow, Segment};

/// Device rows for every AICD under the main bore, ordered by segment number.
///
/// A device without a strength parameter is still written, with a warning.
pub fn collect_device_rows(main_bore: &Branch) -> Vec<DeviceRow> {
    let mut by_segment: BTreeMap<i32, Vec<DeviceRow>> = BTreeMap::new();

    for segment in SegmentWalk::new(main_bore, SegmentOrder::Interleaved) {
        for completion in &segment.completions {
            if let Some(row) = device_row(segment, completion) {
                by_segment.entry(row.segment_number).or_default().push(row);
            }
        }
    }

    let rows: Vec<DeviceRow> = by_segment.into_values().flatten().collect();
    debug!(rows = rows.len(), "Collected device rows");
    rows
}

fn device_row(host: &Segment, completion: &Completion) -> Option<DeviceRow> {
    let params = completion.kind.aicd_parameters()?;
    let segment_number = completion.device_segment_number(host);

    if !params.has_strength() {
        warn!(
            segment = segment_number,
            label = %completion.label,
            "AICD has no strength parameter"
        );
    }

    Some(DeviceRow {
        segment_number,
        parameters: params.parameters,
        open: params.open,
        length: params.length,
        flow_scaling_factor: params.flow_scaling_factor,
        comment: (!completion.label.is_empty()).then(|| completion.label.clone()),
    })
}
