//! Store-facing commands: validate/import/export, record CRUD, history.

use std::fs;
use std::path::PathBuf;

use bhulekh_config::Settings;
use bhulekh_io::csv::{export_records, is_valid_plot_id, parse_records, validate_records, CsvError};
use bhulekh_io::store::{ChangeLogEntry, RecordStore, RecordUpdate, StoreError};
use bhulekh_recon::{classify_edit, match_parcel, AREA_TOLERANCE_PCT};

use crate::exit_codes::{EXIT_CSV_INVALID, EXIT_RECON_PARSE};
use crate::run::load_parcels;
use crate::CliError;

pub fn cmd_validate(file: PathBuf) -> Result<(), CliError> {
    let content = fs::read_to_string(&file)
        .map_err(|e| CliError::parse(format!("cannot read {}: {e}", file.display())))?;

    let entries = parse_records(&content).map_err(|e| csv_error(&file, e))?;

    let errors = validate_records(&entries);
    if !errors.is_empty() {
        return Err(validation_error(&file, &errors));
    }

    eprintln!("valid: {} record(s) in {}", entries.len(), file.display());
    Ok(())
}

pub fn cmd_import(file: PathBuf, db: Option<PathBuf>) -> Result<(), CliError> {
    let content = fs::read_to_string(&file)
        .map_err(|e| CliError::parse(format!("cannot read {}: {e}", file.display())))?;

    let entries = parse_records(&content).map_err(|e| csv_error(&file, e))?;

    let errors = validate_records(&entries);
    if !errors.is_empty() {
        return Err(validation_error(&file, &errors)
            .with_hint("fix the rows and retry; `bhulekh validate` checks without importing"));
    }

    let settings = Settings::load();
    let db_path = settings.resolve_database(db.as_deref());
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CliError::general(format!("cannot create {}: {e}", parent.display())))?;
    }

    let mut store = RecordStore::open(&db_path).map_err(CliError::store)?;
    let source = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let count = store
        .replace_all(&entries, &source)
        .map_err(CliError::store)?;

    eprintln!("imported {count} record(s) into {}", db_path.display());
    Ok(())
}

pub fn cmd_export(db: Option<PathBuf>, output: Option<PathBuf>) -> Result<(), CliError> {
    let settings = Settings::load();
    let store = RecordStore::open(&settings.resolve_database(db.as_deref()))
        .map_err(CliError::store)?;
    let entries = store.list().map_err(CliError::store)?;

    let csv = export_records(&entries).map_err(|e| CliError::general(e.to_string()))?;

    match output {
        Some(path) => {
            fs::write(&path, csv)
                .map_err(|e| CliError::general(format!("cannot write {}: {e}", path.display())))?;
            eprintln!("wrote {} record(s) to {}", entries.len(), path.display());
        }
        None => print!("{csv}"),
    }

    Ok(())
}

pub fn cmd_list(db: Option<PathBuf>, json_output: bool) -> Result<(), CliError> {
    let settings = Settings::load();
    let store = RecordStore::open(&settings.resolve_database(db.as_deref()))
        .map_err(CliError::store)?;
    let entries = store.list().map_err(CliError::store)?;

    if json_output {
        let json_str = serde_json::to_string_pretty(&entries)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        for entry in &entries {
            println!(
                "{:<10} {:<24} {:>8.2} ha",
                entry.plot_id, entry.owner_name, entry.area_record
            );
        }
    }

    eprintln!("{} record(s)", entries.len());
    Ok(())
}

pub fn cmd_create(
    plot_id: String,
    owner: String,
    area: f64,
    db: Option<PathBuf>,
) -> Result<(), CliError> {
    if !is_valid_plot_id(&plot_id) {
        return Err(CliError::usage(format!(
            "invalid plot id '{plot_id}' (letters, digits, hyphens and underscores only)"
        )));
    }
    if !(area.is_finite() && area > 0.0) {
        return Err(CliError::usage("--area must be a positive number"));
    }
    if owner.is_empty() {
        return Err(CliError::usage("--owner must not be empty"));
    }

    let settings = Settings::load();
    let db_path = settings.resolve_database(db.as_deref());
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CliError::general(format!("cannot create {}: {e}", parent.display())))?;
    }

    let store = RecordStore::open(&db_path).map_err(CliError::store)?;
    let created = store
        .create(&plot_id, &owner, area)
        .map_err(CliError::store)?;

    eprintln!(
        "created record for plot {}: {} — {:.2} ha",
        created.plot_id, created.owner_name, created.area_record
    );
    Ok(())
}

pub fn cmd_update(
    plot_id: String,
    owner: Option<String>,
    area: Option<f64>,
    map: Option<PathBuf>,
    db: Option<PathBuf>,
) -> Result<(), CliError> {
    if owner.is_none() && area.is_none() {
        return Err(CliError::usage("nothing to update: pass --owner and/or --area"));
    }
    if let Some(area) = area {
        if !(area.is_finite() && area > 0.0) {
            return Err(CliError::usage("--area must be a positive number"));
        }
    }

    let settings = Settings::load();
    let store = RecordStore::open(&settings.resolve_database(db.as_deref()))
        .map_err(CliError::store)?;

    let existing = store
        .get(&plot_id)
        .map_err(CliError::store)?
        .ok_or_else(|| CliError::store(StoreError::NotFound(plot_id.clone())))?;

    // Preview the reclassification against the map before writing anything.
    let parcels = load_parcels(map.as_deref(), &settings)?;
    match parcels.iter().find(|p| p.plot_id == plot_id) {
        Some(parcel) => {
            let entries = store.list().map_err(CliError::store)?;
            let before = match_parcel(parcel, &entries);
            let preview_owner = owner.clone().unwrap_or_else(|| existing.owner_name.clone());
            let preview = classify_edit(&before, area, &preview_owner);

            eprintln!(
                "{}",
                bhulekh_recon::classify::describe_transition(before.status(), preview.status())
            );
            if let Some(diff) = preview.area_difference_pct() {
                eprintln!("area difference: {diff:.2}% (tolerance {AREA_TOLERANCE_PCT}%)");
            }
        }
        None => eprintln!("plot {plot_id} is not on the map; nothing to preview"),
    }

    let updated = store
        .update(
            &plot_id,
            &RecordUpdate {
                owner_name: owner,
                area_record: area,
            },
        )
        .map_err(CliError::store)?;

    eprintln!(
        "saved record for plot {}: {} — {:.2} ha",
        updated.plot_id, updated.owner_name, updated.area_record
    );
    Ok(())
}

pub fn cmd_history(
    action: Option<String>,
    plot: Option<String>,
    db: Option<PathBuf>,
    json_output: bool,
) -> Result<(), CliError> {
    let settings = Settings::load();
    let store = RecordStore::open(&settings.resolve_database(db.as_deref()))
        .map_err(CliError::store)?;
    let entries = store
        .history(action.as_deref(), plot.as_deref())
        .map_err(CliError::store)?;

    if json_output {
        let json_str = serde_json::to_string_pretty(&entries)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        for entry in &entries {
            println!("{}", format_history_line(entry));
        }
    }

    eprintln!("{} change(s)", entries.len());
    Ok(())
}

fn csv_error(file: &std::path::Path, err: CsvError) -> CliError {
    let code = match err {
        CsvError::Io(_) => EXIT_RECON_PARSE,
        _ => EXIT_CSV_INVALID,
    };
    CliError {
        code,
        message: format!("{}: {err}", file.display()),
        hint: None,
    }
}

fn validation_error(file: &std::path::Path, errors: &[String]) -> CliError {
    CliError {
        code: EXIT_CSV_INVALID,
        message: format!(
            "{}: validation failed:\n  {}",
            file.display(),
            errors.join("\n  ")
        ),
        hint: None,
    }
}

fn format_history_line(entry: &ChangeLogEntry) -> String {
    let plot = entry.plot_id.as_deref().unwrap_or("-");
    match (&entry.field_name, &entry.old_value, &entry.new_value) {
        (Some(field), Some(old), Some(new)) if entry.action == "update" => format!(
            "{}  {:<12} {:<10} {field}: {old} -> {new}",
            entry.created_at, entry.action, plot
        ),
        _ => format!(
            "{}  {:<12} {:<10} {}",
            entry.created_at, entry.action, plot, entry.description
        ),
    }
}
