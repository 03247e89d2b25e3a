//! `bhulekh run` / `bhulekh orphans` — classification passes over the map.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use bhulekh_config::Settings;
use bhulekh_io::csv::{parse_records, validate_records};
use bhulekh_io::demo::{demo_parcels, demo_records};
use bhulekh_io::geojson::load_map_parcels;
use bhulekh_io::store::RecordStore;
use bhulekh_recon::{find_orphan_records, MapParcel, ParcelRow, RecordEntry};

use crate::exit_codes::EXIT_RECON_DISCREPANCIES;
use crate::CliError;

pub fn cmd_run(
    map: Option<PathBuf>,
    records: Option<PathBuf>,
    db: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let settings = Settings::load();
    let parcels = load_parcels(map.as_deref(), &settings)?;
    let entries = load_records(records.as_deref(), db.as_deref(), &settings)?;

    let report = bhulekh_recon::run(&parcels, &entries);

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        fs::write(path, &json_str)
            .map_err(|e| CliError::general(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    } else {
        for row in &report.parcels {
            if row.status != bhulekh_recon::MatchStatus::Matched {
                println!("{}", format_discrepancy(row));
            }
        }
        for orphan in &report.orphans {
            println!(
                "{:<10} orphan     {} — {:.2} ha on record, no parcel on the map",
                orphan.plot_id, orphan.owner_name, orphan.area_record
            );
        }
    }

    // Human summary to stderr
    let s = &report.summary;
    eprintln!(
        "{} parcels — {} matched, {} mismatches, {} missing records, {} orphan records",
        s.total_parcels, s.matched, s.mismatches, s.missing, s.orphan_records,
    );

    if s.has_discrepancies() {
        return Err(CliError {
            code: EXIT_RECON_DISCREPANCIES,
            message: "discrepancies found".into(),
            hint: None,
        });
    }

    Ok(())
}

pub fn cmd_orphans(
    map: Option<PathBuf>,
    records: Option<PathBuf>,
    db: Option<PathBuf>,
    json_output: bool,
) -> Result<(), CliError> {
    let settings = Settings::load();
    let parcels = load_parcels(map.as_deref(), &settings)?;
    let entries = load_records(records.as_deref(), db.as_deref(), &settings)?;

    let known: HashSet<String> = parcels.iter().map(|p| p.plot_id.clone()).collect();
    let orphans = find_orphan_records(&known, &entries);

    if json_output {
        let json_str = serde_json::to_string_pretty(&orphans)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        for orphan in &orphans {
            println!(
                "{:<10} {} — {:.2} ha",
                orphan.plot_id, orphan.owner_name, orphan.area_record
            );
        }
    }

    eprintln!("{} orphan record(s)", orphans.len());
    Ok(())
}

/// One line per parcel a reviewer must look at.
fn format_discrepancy(row: &ParcelRow) -> String {
    match (row.area_record, row.area_difference_pct) {
        (Some(area_record), Some(diff)) => format!(
            "{:<10} {:<9} map {:.2} ha / record {:.2} ha (Δ {:.1}%)",
            row.plot_id,
            row.status.to_string(),
            row.area_map,
            area_record,
            diff,
        ),
        _ => format!(
            "{:<10} {:<9} map {:.2} ha, no usable record",
            row.plot_id,
            row.status.to_string(),
            row.area_map,
        ),
    }
}

/// Resolve the map dataset: explicit flag, then settings, then the bundled
/// demo village. The demo fallback always prints a notice.
pub(crate) fn load_parcels(
    map: Option<&Path>,
    settings: &Settings,
) -> Result<Vec<MapParcel>, CliError> {
    let path = map
        .map(Path::to_path_buf)
        .or_else(|| settings.map_file.clone());

    match path {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .map_err(|e| CliError::parse(format!("cannot read {}: {e}", path.display())))?;
            load_map_parcels(&content)
                .map_err(|e| CliError::parse(format!("{}: {e}", path.display())))
        }
        None => {
            eprintln!("no map given; using the bundled demo village");
            Ok(demo_parcels())
        }
    }
}

/// Resolve the records collection: explicit CSV, then the record store,
/// then the bundled demo records when the store is empty.
pub(crate) fn load_records(
    records: Option<&Path>,
    db: Option<&Path>,
    settings: &Settings,
) -> Result<Vec<RecordEntry>, CliError> {
    if let Some(path) = records {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::parse(format!("cannot read {}: {e}", path.display())))?;
        let entries = parse_records(&content)
            .map_err(|e| CliError::parse(format!("{}: {e}", path.display())))?;
        // First match wins on duplicates; `import` is the strict path.
        for warning in validate_records(&entries) {
            eprintln!("warning: {warning}");
        }
        return Ok(entries);
    }

    let store = RecordStore::open(&settings.resolve_database(db)).map_err(CliError::store)?;
    let entries = store.list().map_err(CliError::store)?;

    if entries.is_empty() {
        eprintln!("record store is empty; using the bundled demo records");
        return Ok(demo_records());
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bhulekh_recon::MatchStatus;

    #[test]
    fn discrepancy_line_for_mismatch() {
        let row = ParcelRow {
            plot_id: "VLG-003".into(),
            status: MatchStatus::Mismatch,
            area_map: 3.21,
            area_record: Some(2.85),
            owner_name_map: Some("Suresh Reddy".into()),
            owner_name_record: Some("Suresh Reddy".into()),
            area_difference_pct: Some(11.8812),
        };
        let line = format_discrepancy(&row);
        assert!(line.contains("VLG-003"));
        assert!(line.contains("mismatch"));
        assert!(line.contains("3.21"));
        assert!(line.contains("2.85"));
        assert!(line.contains("11.9%"));
    }

    #[test]
    fn discrepancy_line_for_missing() {
        let row = ParcelRow {
            plot_id: "VLG-005".into(),
            status: MatchStatus::Missing,
            area_map: 2.89,
            area_record: None,
            owner_name_map: None,
            owner_name_record: None,
            area_difference_pct: None,
        };
        let line = format_discrepancy(&row);
        assert!(line.contains("missing"));
        assert!(line.contains("no usable record"));
    }
}
