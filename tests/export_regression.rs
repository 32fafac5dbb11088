//! Export Regression Tests
//!
//! End-to-end checks from a well model to deck text, pinning the keyword
//! layout, default markers and one-based cell indices that deck readers
//! depend on.

use msw_export::config::ExportConfig;
use msw_export::export::{build_well_table, export_well, render_well};
use msw_export::formatter::{format_well, DeckWriter};
use msw_export::{
    AicdParameters, Branch, Completion, CompletionKind, Intersection, PenetrationDirection,
    Segment, ValveParameters, WellModel, WellTableData,
};

fn single_segment_well() -> WellModel {
    let mut segment = Segment::new(1, 1, 0, 1000.0, 1010.0)
        .with_length(10.0)
        .with_diameter(0.15);
    segment.add_intersection(Intersection::main_grid(2, 3, 4, 77));

    let mut bore = Branch::new(1).with_start(1000.0, 950.0);
    bore.add_segment(segment);
    WellModel::new("W1", bore)
}

fn lines_after<'a>(deck: &'a str, keyword: &str) -> Vec<&'a str> {
    deck.lines()
        .skip_while(|l| *l != keyword)
        .skip(1)
        .take_while(|l| *l != "/")
        .collect()
}

fn data_lines<'a>(deck: &'a str, keyword: &str) -> Vec<&'a str> {
    lines_after(deck, keyword)
        .into_iter()
        .filter(|l| !l.starts_with("--"))
        .collect()
}

// ============================================================================
// Single well
// ============================================================================

#[test]
fn single_segment_well_exports_expected_tables() {
    let deck = export_well(&single_segment_well(), &ExportConfig::default()).unwrap();

    // Header row plus one segment row
    let welsegs = data_lines(&deck, "WELSEGS");
    assert_eq!(welsegs.len(), 2, "{deck}");
    assert!(welsegs[0].starts_with("   W1 "));
    assert!(welsegs[0].contains("950.00"));
    assert!(welsegs[0].contains("1000.00"));
    assert!(welsegs[0].contains("ABS"));
    assert!(welsegs[0].contains("HF-"));

    let segment_row: Vec<&str> = welsegs[1].split_whitespace().collect();
    assert_eq!(
        segment_row,
        vec!["1", "1", "1", "0", "10.00", "1*", "0.15", "1*", "/"]
    );

    let compsegs = data_lines(&deck, "COMPSEGS");
    assert_eq!(compsegs.len(), 2, "{deck}");
    assert!(compsegs[1].contains("3 4 5"), "{deck}");
    assert!(compsegs[1].contains("1000.00"));
    assert!(compsegs[1].contains("1010.00"));
}

#[test]
fn well_without_valves_omits_valve_and_device_tables() {
    let deck = export_well(&single_segment_well(), &ExportConfig::default()).unwrap();
    assert!(!deck.contains("WSEGVALV"));
    assert!(!deck.contains("WSEGAICD"));
    assert!(!deck.contains("COMPSEGL"));
}

#[test]
fn zero_based_origin_cell_renders_as_one() {
    let mut segment = Segment::new(1, 1, 0, 0.0, 5.0);
    segment.add_intersection(Intersection::main_grid(0, 0, 0, 0).with_direction(PenetrationDirection::X));
    let mut bore = Branch::new(1);
    bore.add_segment(segment);

    let deck = export_well(&WellModel::new("W1", bore), &ExportConfig::default()).unwrap();
    let compsegs = data_lines(&deck, "COMPSEGS");
    assert!(compsegs[1].trim_start().starts_with("1 1 1 1"), "{deck}");
    assert!(compsegs[1].contains(" X "));
}

#[test]
fn families_written_in_fixed_order() {
    let mut host = Segment::new(1, 1, 0, 0.0, 10.0).with_length(10.0);
    host.add_intersection(Intersection::main_grid(0, 0, 0, 1));
    host.add_intersection(Intersection::refined_grid("LGR1", 0, 0, 0, 500));
    host.add_completion(Completion::new(CompletionKind::Icd(ValveParameters::new(0.7, 2e-4))));
    let mut aicd = AicdParameters::default();
    aicd.parameters[0] = Some(1.0e-4);
    host.add_completion(Completion::new(CompletionKind::Aicd(aicd)));
    let mut bore = Branch::new(1);
    bore.add_segment(host);

    let deck = export_well(&WellModel::new("W1", bore), &ExportConfig::default()).unwrap();
    let keywords: Vec<&str> = deck
        .lines()
        .filter(|l| l.chars().next().is_some_and(|c| c.is_ascii_uppercase()))
        .collect();
    assert_eq!(
        keywords,
        vec!["WELSEGS", "COMPSEGS", "COMPSEGL", "WSEGVALV", "WSEGAICD"]
    );
}

#[test]
fn shared_cell_written_once_per_well() {
    let shared = Intersection::main_grid(5, 5, 5, 555);
    let mut first = Segment::new(1, 1, 0, 0.0, 10.0);
    first.add_intersection(shared.clone());
    let mut second = Segment::new(2, 1, 1, 10.0, 20.0);
    second.add_intersection(shared);

    let mut lateral_segment = Segment::new(10, 2, 2, 20.0, 30.0);
    lateral_segment.add_intersection(Intersection::main_grid(5, 5, 5, 555));
    let mut lateral = Branch::new(2);
    lateral.add_segment(lateral_segment);

    let mut bore = Branch::new(1);
    bore.add_segment(first);
    bore.add_segment(second);
    bore.add_branch(lateral);

    let table = build_well_table(&WellModel::new("W1", bore), &ExportConfig::default());
    assert_eq!(table.connection_rows().len(), 1);
    assert_eq!(table.connection_rows()[0].start_length, 0.0);
}

// ============================================================================
// Default markers
// ============================================================================

#[test]
fn unset_values_render_default_marker_in_every_table() {
    let mut host = Segment::new(1, 1, 0, 0.0, 10.0);
    host.add_intersection(Intersection::main_grid(0, 0, 0, 1));
    host.add_completion(
        Completion::new(CompletionKind::Valve(ValveParameters::default())).with_label("Valve"),
    );
    host.add_completion(Completion::new(CompletionKind::Aicd(AicdParameters::default())));
    let mut bore = Branch::new(1);
    bore.add_segment(host);

    let deck = export_well(&WellModel::new("W1", bore), &ExportConfig::default()).unwrap();

    let welsegs = data_lines(&deck, "WELSEGS");
    assert_eq!(welsegs[1].matches("1*").count(), 4, "{deck}");

    let compsegs = data_lines(&deck, "COMPSEGS");
    assert_eq!(compsegs[1].matches("1*").count(), 3, "{deck}");

    let valves = data_lines(&deck, "WSEGVALV");
    assert_eq!(valves[1].matches("1*").count(), 4, "{deck}");

    let devices = data_lines(&deck, "WSEGAICD");
    assert_eq!(devices[1].matches("1*").count(), 10, "{deck}");
    assert!(devices[1].contains("OPEN"));
}

#[test]
fn sentinel_infinity_renders_default_marker() {
    let mut segment = Segment::new(1, 1, 0, 0.0, 10.0);
    segment.length = Some(f64::INFINITY);
    segment.roughness = msw_export::types::from_sentinel(f64::INFINITY);
    let mut bore = Branch::new(1);
    bore.add_segment(segment);

    let deck = export_well(&WellModel::new("W1", bore), &ExportConfig::default()).unwrap();
    assert!(!deck.contains("inf"));
    assert_eq!(data_lines(&deck, "WELSEGS")[1].matches("1*").count(), 4);
}

#[test]
fn configured_marker_and_precision_apply() {
    let mut config = ExportConfig::default();
    config.output.default_marker = "DEF".to_string();
    config.output.float_precision = 3;

    let deck = export_well(&single_segment_well(), &config).unwrap();
    let row = data_lines(&deck, "WELSEGS")[1];
    assert!(row.contains("10.000"));
    assert!(row.contains("DEF"));
    assert!(!row.contains("1*"));
}

// ============================================================================
// Comments and ordering options
// ============================================================================

#[test]
fn segment_comments_and_completion_labels_written() {
    let mut host = Segment::new(1, 1, 0, 0.0, 10.0).with_comment("Heel");
    host.add_completion(
        Completion::new(CompletionKind::Icv(ValveParameters::new(1.0, 1e-3))).with_label("ICV upper"),
    );
    let mut bore = Branch::new(1);
    bore.add_segment(host);

    let deck = export_well(&WellModel::new("W1", bore), &ExportConfig::default()).unwrap();
    assert!(lines_after(&deck, "WELSEGS").contains(&"-- Heel"));
    assert!(lines_after(&deck, "WSEGVALV").contains(&"-- ICV upper"));
}

#[test]
fn completion_segments_after_main_bore_reorders_topology() {
    let mut host = Segment::new(1, 1, 0, 0.0, 10.0);
    host.add_completion(
        Completion::new(CompletionKind::Icd(ValveParameters::new(0.7, 2e-4)))
            .with_segment(Segment::new(10, 2, 1, 5.0, 5.1)),
    );
    let mut bore = Branch::new(1);
    bore.add_segment(host);
    bore.add_segment(Segment::new(2, 1, 1, 10.0, 20.0));
    let well = WellModel::new("W1", bore);

    let first_numbers = |config: &ExportConfig| -> Vec<i32> {
        build_well_table(&well, config)
            .topology_rows()
            .iter()
            .map(|r| r.segment_number)
            .collect()
    };

    let mut config = ExportConfig::default();
    assert_eq!(first_numbers(&config), vec![1, 10, 2]);
    config.segments.completion_segments_after_main_bore = true;
    assert_eq!(first_numbers(&config), vec![1, 2, 10]);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn duplicate_segment_numbers_block_export() {
    let mut bore = Branch::new(1);
    bore.add_segment(Segment::new(4, 1, 3, 0.0, 1.0));
    bore.add_segment(Segment::new(4, 1, 3, 1.0, 2.0));

    let err = export_well(&WellModel::new("W1", bore), &ExportConfig::default()).unwrap_err();
    assert_eq!(err.messages(), ["Duplicate segment number: 4".to_string()]);
}

#[test]
fn table_without_header_gets_name_only_header() {
    let mut table = WellTableData::new("W2");
    table.add_topology_row(msw_export::TopologyRow {
        segment_number: 1,
        branch_number: 1,
        outlet_segment_number: 0,
        length: Some(1.0),
        depth_change: None,
        diameter: None,
        roughness: None,
        comment: None,
    });

    let mut writer = DeckWriter::new();
    format_well(&mut writer, &table);
    let deck = writer.into_string();
    let header: Vec<&str> = data_lines(&deck, "WELSEGS")[0].split_whitespace().collect();
    assert_eq!(header, vec!["W2", "1*", "1*", "1*", "ABS", "HF-", "/"]);

    assert_eq!(render_well(&table, &ExportConfig::default()).unwrap(), deck);
}

#[test]
fn multiline_segment_comment_adds_no_data_rows() {
    let mut bore = Branch::new(1);
    bore.add_segment(Segment::new(1, 1, 0, 0.0, 1.0).with_comment("heel\n2 2 2 /"));
    let deck = export_well(&WellModel::new("W1", bore), &ExportConfig::default()).unwrap();

    let rows = data_lines(&deck, "WELSEGS");
    assert_eq!(rows.len(), 2, "{deck}");
    assert!(rows.iter().all(|l| l.starts_with("   ")));
    assert!(deck.contains("-- heel\n-- 2 2 2 /\n"));
}

#[test]
fn quote_in_well_name_blocks_export() {
    let mut model = single_segment_well();
    model.name = "O'B".to_string();

    let err = export_well(&model, &ExportConfig::default()).unwrap_err();
    assert_eq!(err.messages(), ["Well name contains a quote character".to_string()]);
}
