use crate::matcher::classify_areas;
use crate::model::{MatchResult, MatchStatus};

/// Provisional reclassification after an in-place record edit.
///
/// Lets an editor show the would-be status before the write is confirmed.
/// The output is provisional: the authoritative classification is always a
/// fresh [`match_parcel`](crate::matcher::match_parcel) against the stored
/// collection.
///
/// A new area that is absent, non-finite, or zero falls back to the previous
/// recorded area (0 when the parcel had none), and a fallback of zero means
/// the parcel no longer has a usable record. An empty owner name clears the
/// recorded owner.
pub fn classify_edit(
    original: &MatchResult,
    new_area_record: Option<f64>,
    new_owner_name: &str,
) -> MatchResult {
    let effective_area = match new_area_record {
        Some(v) if v.is_finite() && v != 0.0 => v,
        _ => original.area_record().unwrap_or(0.0),
    };

    let owner = if new_owner_name.is_empty() {
        None
    } else {
        Some(new_owner_name.to_string())
    };

    MatchResult {
        plot_id: original.plot_id.clone(),
        area_map: original.area_map,
        owner_name_map: original.owner_name_map.clone(),
        outcome: classify_areas(original.area_map, effective_area, owner),
    }
}

/// One-line description of a status transition, for edit previews.
pub fn describe_transition(before: MatchStatus, after: MatchStatus) -> String {
    if before == after {
        format!("status unchanged: {before}")
    } else {
        format!("status: {before} -> {after}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::match_parcel;
    use crate::model::{MapParcel, MatchOutcome, RecordEntry};

    fn parcel(id: &str, area: f64) -> MapParcel {
        MapParcel {
            plot_id: id.into(),
            area_map: area,
            owner_name_map: None,
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

    fn mismatched() -> MatchResult {
        // 3.21 vs 2.85 is ~11.88% apart.
        match_parcel(&parcel("VLG-003", 3.21), &[rec("VLG-003", "Suresh Reddy", 2.85)])
    }

    #[test]
    fn edit_recomputes_status() {
        let original = mismatched();
        assert_eq!(original.status(), MatchStatus::Mismatch);

        let edited = classify_edit(&original, Some(3.3), "Suresh Reddy");
        assert_eq!(edited.status(), MatchStatus::Matched);
        let diff = edited.area_difference_pct().unwrap();
        assert!(diff < 3.0, "got {diff}");
        assert_eq!(edited.area_record(), Some(3.3));
    }

    #[test]
    fn zero_falls_back_to_previous_area() {
        let original = mismatched();
        let edited = classify_edit(&original, Some(0.0), "Suresh Reddy");
        assert_eq!(edited.area_record(), Some(2.85));
        assert_eq!(edited.status(), MatchStatus::Mismatch);
    }

    #[test]
    fn absent_value_falls_back_to_previous_area() {
        let original = mismatched();
        let edited = classify_edit(&original, None, "Suresh Reddy");
        assert_eq!(edited.area_record(), Some(2.85));
    }

    #[test]
    fn unparsable_value_falls_back_to_previous_area() {
        let original = mismatched();
        let edited = classify_edit(&original, Some(f64::NAN), "Suresh Reddy");
        assert_eq!(edited.area_record(), Some(2.85));
    }

    #[test]
    fn fallback_of_zero_means_missing() {
        // Original had no record, so the fallback chain bottoms out at 0.
        let original = match_parcel(&parcel("VLG-005", 2.89), &[]);
        let edited = classify_edit(&original, None, "");
        assert_eq!(edited.outcome, MatchOutcome::Missing);
    }

    #[test]
    fn negative_area_clamps_to_missing() {
        let original = mismatched();
        let edited = classify_edit(&original, Some(-2.0), "Suresh Reddy");
        assert_eq!(edited.status(), MatchStatus::Missing);
    }

    #[test]
    fn editing_a_missing_parcel_into_a_match() {
        let original = match_parcel(&parcel("VLG-005", 2.89), &[]);
        assert_eq!(original.status(), MatchStatus::Missing);

        let edited = classify_edit(&original, Some(2.9), "Puttamma K");
        assert_eq!(edited.status(), MatchStatus::Matched);
        assert_eq!(edited.owner_name_record(), Some("Puttamma K"));
    }

    #[test]
    fn empty_owner_name_clears_recorded_owner() {
        let original = mismatched();
        let edited = classify_edit(&original, Some(2.85), "");
        assert_eq!(edited.owner_name_record(), None);
    }

    #[test]
    fn map_fields_carried_over() {
        let original = mismatched();
        let edited = classify_edit(&original, Some(3.0), "X");
        assert_eq!(edited.plot_id, original.plot_id);
        assert_eq!(edited.area_map, original.area_map);
        assert_eq!(edited.owner_name_map, original.owner_name_map);
    }

    #[test]
    fn transition_description() {
        assert_eq!(
            describe_transition(MatchStatus::Mismatch, MatchStatus::Matched),
            "status: mismatch -> matched"
        );
        assert_eq!(
            describe_transition(MatchStatus::Matched, MatchStatus::Matched),
            "status unchanged: matched"
        );
    }
}
