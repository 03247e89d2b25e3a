use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A parcel as drawn in the digitized village map.
///
/// Owned by the geometry provider; the engine reads the id, the surveyed
/// area, and the owner name painted on the map, nothing else.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapParcel {
    pub plot_id: String,
    /// Hectares.
    pub area_map: f64,
    #[serde(default)]
    pub owner_name_map: Option<String>,
}

/// A parcel as it appears in the official land records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    /// Store-assigned id; absent until persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub plot_id: String,
    pub owner_name: String,
    /// Hectares.
    pub area_record: f64,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    Mismatch,
    Missing,
}

impl MatchStatus {
    /// Human-readable label for legends and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Matched => "Matched",
            Self::Mismatch => "Mismatch",
            Self::Missing => "Missing Record",
        }
    }

    /// Display color (hex RGB) for map rendering.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Matched => "#22c55e",
            Self::Mismatch => "#ef4444",
            Self::Missing => "#9ca3af",
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matched => write!(f, "matched"),
            Self::Mismatch => write!(f, "mismatch"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

/// Result of matching one map parcel against the records collection.
///
/// A pure derived value: recomputed on every pass, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub plot_id: String,
    pub area_map: f64,
    pub owner_name_map: Option<String>,
    pub outcome: MatchOutcome,
}

/// What the record lookup produced.
///
/// Record-side fields exist only on `Classified`, so "missing implies no
/// record data" holds by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// No record entry with a usable area shares this plot id.
    Missing,
    /// A record entry was found and its area compared against the map.
    Classified {
        area_record: f64,
        owner_name_record: Option<String>,
        /// Symmetric percentage difference between the two areas.
        area_difference_pct: f64,
        within_tolerance: bool,
    },
}

impl MatchResult {
    pub fn status(&self) -> MatchStatus {
        match self.outcome {
            MatchOutcome::Missing => MatchStatus::Missing,
            MatchOutcome::Classified {
                within_tolerance: true,
                ..
            } => MatchStatus::Matched,
            MatchOutcome::Classified { .. } => MatchStatus::Mismatch,
        }
    }

    pub fn area_record(&self) -> Option<f64> {
        match &self.outcome {
            MatchOutcome::Classified { area_record, .. } => Some(*area_record),
            MatchOutcome::Missing => None,
        }
    }

    pub fn owner_name_record(&self) -> Option<&str> {
        match &self.outcome {
            MatchOutcome::Classified {
                owner_name_record, ..
            } => owner_name_record.as_deref(),
            MatchOutcome::Missing => None,
        }
    }

    pub fn area_difference_pct(&self) -> Option<f64> {
        match &self.outcome {
            MatchOutcome::Classified {
                area_difference_pct,
                ..
            } => Some(*area_difference_pct),
            MatchOutcome::Missing => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [MatchStatus; 3] = [
        MatchStatus::Matched,
        MatchStatus::Mismatch,
        MatchStatus::Missing,
    ];

    #[test]
    fn labels_defined_and_distinct() {
        let labels: Vec<&str> = ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["Matched", "Mismatch", "Missing Record"]);
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn colors_defined_and_distinct() {
        let colors: Vec<&str> = ALL.iter().map(|s| s.color()).collect();
        for c in &colors {
            assert!(c.starts_with('#') && c.len() == 7);
        }
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&MatchStatus::Missing).unwrap(),
            "\"missing\""
        );
        assert_eq!(
            serde_json::to_string(&MatchStatus::Matched).unwrap(),
            "\"matched\""
        );
    }

    #[test]
    fn status_derived_from_outcome() {
        let base = MatchResult {
            plot_id: "VLG-001".into(),
            area_map: 2.45,
            owner_name_map: None,
            outcome: MatchOutcome::Missing,
        };
        assert_eq!(base.status(), MatchStatus::Missing);
        assert_eq!(base.area_record(), None);
        assert_eq!(base.area_difference_pct(), None);

        let classified = MatchResult {
            outcome: MatchOutcome::Classified {
                area_record: 2.48,
                owner_name_record: Some("Ramesh Kumar".into()),
                area_difference_pct: 1.2,
                within_tolerance: true,
            },
            ..base
        };
        assert_eq!(classified.status(), MatchStatus::Matched);
        assert_eq!(classified.area_record(), Some(2.48));
        assert_eq!(classified.owner_name_record(), Some("Ramesh Kumar"));
    }
}
