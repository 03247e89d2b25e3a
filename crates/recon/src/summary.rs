use std::collections::HashMap;

use serde::Serialize;

use crate::model::{MatchResult, MatchStatus};

/// Counts for one classification pass.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub total_parcels: usize,
    pub matched: usize,
    pub mismatches: usize,
    pub missing: usize,
    pub orphan_records: usize,
    pub status_counts: HashMap<String, usize>,
}

/// Compute summary statistics from classified results.
pub fn compute_summary(results: &[MatchResult], orphan_records: usize) -> MatchSummary {
    let mut status_counts: HashMap<String, usize> = HashMap::new();
    let mut matched = 0;
    let mut mismatches = 0;
    let mut missing = 0;

    for result in results {
        let status = result.status();
        *status_counts.entry(status.to_string()).or_insert(0) += 1;

        match status {
            MatchStatus::Matched => matched += 1,
            MatchStatus::Mismatch => mismatches += 1,
            MatchStatus::Missing => missing += 1,
        }
    }

    MatchSummary {
        total_parcels: results.len(),
        matched,
        mismatches,
        missing,
        orphan_records,
        status_counts,
    }
}

impl MatchSummary {
    /// True when the pass surfaced anything a reviewer must look at.
    pub fn has_discrepancies(&self) -> bool {
        self.mismatches > 0 || self.missing > 0 || self.orphan_records > 0
    }
}
