//! End-to-end pass over a village-sized dataset.

use std::collections::HashSet;

use bhulekh_recon::{
    classify_edit, find_orphan_records, match_all, match_parcel, run, MapParcel, MatchStatus,
    RecordEntry,
};

fn parcel(id: &str, area: f64, owner: Option<&str>) -> MapParcel {
    MapParcel {
        plot_id: id.into(),
        area_map: area,
        owner_name_map: owner.map(str::to_string),
    }
}

fn rec(id: &str, owner: &str, area: f64) -> RecordEntry {
    RecordEntry {
        id: None,
        plot_id: id.into(),
        owner_name: owner.into(),
        area_record: area,
    }
}

/// Fifteen map parcels against records seeded with every discrepancy class:
/// clean matches, an area mismatch, missing records, a duplicated plot id,
/// and orphaned record entries.
fn village() -> (Vec<MapParcel>, Vec<RecordEntry>) {
    let parcels = vec![
        parcel("VLG-001", 2.45, Some("Ramesh Kumar")),
        parcel("VLG-002", 1.82, Some("Lakshmi Devi")),
        parcel("VLG-003", 3.21, Some("Suresh Reddy")),
        parcel("VLG-004", 1.56, Some("Venkatesh Gowda")),
        parcel("VLG-005", 2.89, None),
        parcel("VLG-006", 4.12, Some("Manjunath S")),
        parcel("VLG-007", 1.98, Some("Nagaraj B")),
        parcel("VLG-008", 2.34, Some("Shivakumar H")),
        parcel("VLG-009", 1.45, Some("Puttamma K")),
        parcel("VLG-010", 3.67, Some("Basavaraj M")),
        parcel("VLG-011", 2.08, None),
        parcel("VLG-012", 1.33, Some("Girish N")),
        parcel("VLG-013", 2.76, Some("Hanumantharayappa")),
        parcel("VLG-014", 1.89, Some("Thimmaiah R")),
        parcel("VLG-015", 2.55, Some("Kemparaju T")),
    ];

    let records = vec![
        rec("VLG-001", "Ramesh Kumar", 2.48),
        rec("VLG-002", "Lakshmi Devi", 1.80),
        // ~11.9% off the mapped area
        rec("VLG-003", "Suresh Reddy", 2.85),
        rec("VLG-004", "Venkatesh Gowda", 1.58),
        // VLG-005 deliberately absent
        rec("VLG-006", "Manjunath S", 4.05),
        rec("VLG-007", "Nagaraj B", 2.00),
        rec("VLG-008", "Shivakumar H", 2.30),
        rec("VLG-009", "Puttamma K", 1.44),
        // duplicate plot id; the first row must win
        rec("VLG-010", "Basavaraj M", 3.70),
        rec("VLG-010", "Someone Else", 9.99),
        // VLG-011 deliberately absent
        rec("VLG-012", "Girish N", 1.35),
        rec("VLG-013", "Hanumantharayappa", 2.80),
        rec("VLG-014", "Thimmaiah R", 1.90),
        rec("VLG-015", "Kemparaju T", 2.52),
        // orphans: no such plots on the map
        rec("VLG-099", "Krishna", 1.26),
        rec("VLG-100", "Mohan", 0.75),
    ];

    (parcels, records)
}

#[test]
fn full_pass_summary() {
    let (parcels, records) = village();
    let report = run(&parcels, &records);

    assert_eq!(report.summary.total_parcels, 15);
    assert_eq!(report.summary.matched, 12);
    assert_eq!(report.summary.mismatches, 1);
    assert_eq!(report.summary.missing, 2);
    assert_eq!(report.summary.orphan_records, 2);
    assert!(report.summary.has_discrepancies());

    let row = report
        .parcels
        .iter()
        .find(|r| r.plot_id == "VLG-003")
        .unwrap();
    assert_eq!(row.status, MatchStatus::Mismatch);

    let dup = report
        .parcels
        .iter()
        .find(|r| r.plot_id == "VLG-010")
        .unwrap();
    assert_eq!(dup.area_record, Some(3.70));
    assert_eq!(dup.owner_name_record.as_deref(), Some("Basavaraj M"));
}

#[test]
fn exactly_one_result_per_parcel() {
    let (parcels, records) = village();
    let results = match_all(&parcels, &records);
    assert_eq!(results.len(), parcels.len());

    let ids: HashSet<&str> = results.iter().map(|r| r.plot_id.as_str()).collect();
    assert_eq!(ids.len(), parcels.len());
}

#[test]
fn linear_and_indexed_paths_agree() {
    let (parcels, records) = village();
    let indexed = match_all(&parcels, &records);
    for (parcel, via_index) in parcels.iter().zip(&indexed) {
        assert_eq!(&match_parcel(parcel, &records), via_index);
    }
}

#[test]
fn pass_is_idempotent() {
    let (parcels, records) = village();
    let first = match_all(&parcels, &records);
    let second = match_all(&parcels, &records);
    assert_eq!(first, second);
}

#[test]
fn engine_does_not_mutate_inputs() {
    let (parcels, records) = village();
    let parcels_before = parcels.clone();
    let records_before = records.clone();
    let _ = run(&parcels, &records);
    assert_eq!(parcels, parcels_before);
    assert_eq!(records, records_before);
}

#[test]
fn orphans_follow_input_order() {
    let (parcels, records) = village();
    let known: HashSet<String> = parcels.iter().map(|p| p.plot_id.clone()).collect();
    let orphans = find_orphan_records(&known, &records);
    let ids: Vec<&str> = orphans.iter().map(|r| r.plot_id.as_str()).collect();
    assert_eq!(ids, vec!["VLG-099", "VLG-100"]);
}

#[test]
fn edit_preview_then_fresh_pass() {
    let (parcels, records) = village();

    // Reviewer fixes the VLG-003 record to match the survey.
    let original = match_parcel(&parcels[2], &records);
    assert_eq!(original.status(), MatchStatus::Mismatch);

    let preview = classify_edit(&original, Some(3.19), "Suresh Reddy");
    assert_eq!(preview.status(), MatchStatus::Matched);

    // The confirmed collection produces the same answer.
    let mut confirmed = records.clone();
    confirmed[2].area_record = 3.19;
    let fresh = match_parcel(&parcels[2], &confirmed);
    assert_eq!(fresh.status(), MatchStatus::Matched);
    assert_eq!(fresh.area_record(), preview.area_record());
}

#[test]
fn report_serializes_to_json() {
    let (parcels, records) = village();
    let report = run(&parcels, &records);
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["summary"]["total_parcels"], 15);
    assert_eq!(value["parcels"].as_array().unwrap().len(), 15);
    assert_eq!(value["orphans"].as_array().unwrap().len(), 2);
    assert_eq!(value["meta"]["tolerance_pct"], 5.0);
}
