//! `bhulekh-recon` — parcel reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded map parcels and record entries,
//! returns classified results. No CLI or IO dependencies.

pub mod classify;
pub mod engine;
pub mod matcher;
pub mod model;
pub mod summary;

pub use classify::classify_edit;
pub use engine::{run, ParcelRow, ReconMeta, ReconReport};
pub use matcher::{
    area_difference_pct, find_orphan_records, match_all, match_parcel, AREA_TOLERANCE_PCT,
};
pub use model::{MapParcel, MatchOutcome, MatchResult, MatchStatus, RecordEntry};
pub use summary::{compute_summary, MatchSummary};
