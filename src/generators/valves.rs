//! Segment valve rows (`WSEGVALV`)

use std::collections::BTreeMap;

use tracing::debug;

use super::{SegmentOrder, SegmentWalk};
use crate::types::{Branch, Completion, Segment, ValveRow};

/// Valve rows for every ICD, ICV and generic valve under the main bore,
/// ordered by segment number. Rows sharing a segment number keep walk order.
pub fn collect_valve_rows(main_bore: &Branch) -> Vec<ValveRow> {
    let mut by_segment: BTreeMap<i32, Vec<ValveRow>> = BTreeMap::new();

    for segment in SegmentWalk::new(main_bore, SegmentOrder::Interleaved) {
        for completion in &segment.completions {
            if let Some(row) = valve_row(segment, completion) {
                by_segment.entry(row.segment_number).or_default().push(row);
            }
        }
    }

    let rows: Vec<ValveRow> = by_segment.into_values().flatten().collect();
    debug!(rows = rows.len(), "Collected valve rows");
    rows
}

fn valve_row(host: &Segment, completion: &Completion) -> Option<ValveRow> {
    let params = completion.kind.valve_parameters()?;

    let valve_type = params
        .valve_type
        .clone()
        .or_else(|| completion.kind.default_valve_type().map(str::to_string));

    Some(ValveRow {
        segment_number: completion.device_segment_number(host),
        flow_coefficient: params.flow_coefficient,
        area: params.area,
        additional_length: params.additional_length,
        valve_type,
        comment: (!completion.label.is_empty()).then(|| completion.label.clone()),
    })
}
