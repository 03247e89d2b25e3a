use std::collections::{HashMap, HashSet};

use crate::model::{MapParcel, MatchOutcome, MatchResult, RecordEntry};

/// Area tolerance in percentage points. Differences strictly above this
/// threshold classify as a mismatch.
pub const AREA_TOLERANCE_PCT: f64 = 5.0;

/// Symmetric percentage difference between two areas:
/// `|a - b| / ((a + b) / 2) * 100`.
///
/// Swapping the arguments does not change the result.
pub fn area_difference_pct(area_map: f64, area_record: f64) -> f64 {
    let mean = (area_map + area_record) / 2.0;
    ((area_map - area_record) / mean).abs() * 100.0
}

/// Match one map parcel against the records collection.
///
/// Linear scan; the first entry with an equal plot id wins (uploaded data
/// can contain duplicates). Plot ids compare case-sensitively, untrimmed.
pub fn match_parcel(parcel: &MapParcel, records: &[RecordEntry]) -> MatchResult {
    let record = records.iter().find(|r| r.plot_id == parcel.plot_id);
    classify_pair(parcel, record)
}

/// Match every map parcel in one pass.
///
/// Builds a plot-id index up front instead of rescanning the collection per
/// parcel. Index insertion is first-wins, so duplicate plot ids resolve
/// exactly as the linear scan in [`match_parcel`] does.
pub fn match_all(parcels: &[MapParcel], records: &[RecordEntry]) -> Vec<MatchResult> {
    let mut index: HashMap<&str, &RecordEntry> = HashMap::new();
    for record in records {
        index.entry(record.plot_id.as_str()).or_insert(record);
    }

    parcels
        .iter()
        .map(|parcel| classify_pair(parcel, index.get(parcel.plot_id.as_str()).copied()))
        .collect()
}

/// Record entries whose plot id never appears in the map dataset.
///
/// Input order is preserved; duplicate entries stay duplicated.
pub fn find_orphan_records(
    known_plot_ids: &HashSet<String>,
    records: &[RecordEntry],
) -> Vec<RecordEntry> {
    records
        .iter()
        .filter(|r| !known_plot_ids.contains(&r.plot_id))
        .cloned()
        .collect()
}

fn classify_pair(parcel: &MapParcel, record: Option<&RecordEntry>) -> MatchResult {
    let outcome = match record {
        Some(r) => classify_areas(parcel.area_map, r.area_record, Some(r.owner_name.clone())),
        None => MatchOutcome::Missing,
    };

    MatchResult {
        plot_id: parcel.plot_id.clone(),
        area_map: parcel.area_map,
        owner_name_map: parcel.owner_name_map.clone(),
        outcome,
    }
}

/// Compare two areas and derive the outcome.
///
/// Classification requires both areas to be positive; a non-positive pair
/// carries no usable measurement and clamps to [`MatchOutcome::Missing`].
pub(crate) fn classify_areas(
    area_map: f64,
    area_record: f64,
    owner_name_record: Option<String>,
) -> MatchOutcome {
    if !(area_map > 0.0 && area_record > 0.0) {
        return MatchOutcome::Missing;
    }

    let diff = area_difference_pct(area_map, area_record);
    MatchOutcome::Classified {
        area_record,
        owner_name_record,
        area_difference_pct: diff,
        within_tolerance: diff <= AREA_TOLERANCE_PCT,
    }
}
