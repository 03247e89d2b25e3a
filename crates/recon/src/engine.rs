use std::collections::HashSet;

use serde::Serialize;

use crate::matcher::{find_orphan_records, match_all, AREA_TOLERANCE_PCT};
use crate::model::{MapParcel, MatchResult, MatchStatus, RecordEntry};
use crate::summary::{compute_summary, MatchSummary};

/// Run a full classification pass: every map parcel against the records
/// collection, plus orphan detection and summary counts.
pub fn run(parcels: &[MapParcel], records: &[RecordEntry]) -> ReconReport {
    let results = match_all(parcels, records);

    let known: HashSet<String> = parcels.iter().map(|p| p.plot_id.clone()).collect();
    let orphans = find_orphan_records(&known, records);

    let summary = compute_summary(&results, orphans.len());

    ReconReport {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            tolerance_pct: AREA_TOLERANCE_PCT,
        },
        summary,
        parcels: results.iter().map(ParcelRow::from).collect(),
        orphans,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub summary: MatchSummary,
    pub parcels: Vec<ParcelRow>,
    pub orphans: Vec<RecordEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    pub tolerance_pct: f64,
}

/// Flat, serialization-friendly view of a match result. Record-side fields
/// are omitted entirely for missing parcels.
#[derive(Debug, Clone, Serialize)]
pub struct ParcelRow {
    pub plot_id: String,
    pub status: MatchStatus,
    pub area_map: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_record: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name_map: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name_record: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_difference_pct: Option<f64>,
}

impl From<&MatchResult> for ParcelRow {
    fn from(result: &MatchResult) -> Self {
        ParcelRow {
            plot_id: result.plot_id.clone(),
            status: result.status(),
            area_map: result.area_map,
            area_record: result.area_record(),
            owner_name_map: result.owner_name_map.clone(),
            owner_name_record: result.owner_name_record().map(str::to_string),
            area_difference_pct: result.area_difference_pct(),
        }
    }
}
