// Records CSV import/export

use std::collections::HashSet;
use std::fmt;

use bhulekh_recon::RecordEntry;

/// Columns every records CSV must carry (case-insensitive, any order).
pub const REQUIRED_COLUMNS: [&str; 3] = ["plot_id", "owner_name", "area_record"];

/// Record forms cap owner names at this length.
const MAX_OWNER_NAME_LEN: usize = 100;

/// Largest plausible parcel in hectares.
const MAX_AREA_HECTARES: f64 = 10_000.0;

#[derive(Debug)]
pub enum CsvError {
    /// No header or no data rows.
    Empty,
    /// Header is missing one or more required columns.
    MissingColumns(Vec<String>),
    /// One message per rejected data row.
    InvalidRows(Vec<String>),
    /// Reader- or writer-level failure.
    Io(String),
}

impl fmt::Display for CsvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "CSV file is empty or has no data rows"),
            Self::MissingColumns(cols) => {
                write!(f, "missing required column(s): {}", cols.join(", "))
            }
            Self::InvalidRows(errors) => {
                write!(f, "{} invalid row(s): {}", errors.len(), errors.join("; "))
            }
            Self::Io(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for CsvError {}

/// Parse a records CSV into entries.
///
/// The header must contain `plot_id`, `owner_name` and `area_record`;
/// extra columns are ignored. Every data row must supply all three fields
/// and `area_record` must parse as a positive finite number. Any bad row
/// rejects the whole file; there are no partial imports.
pub fn parse_records(content: &str) -> Result<Vec<RecordEntry>, CsvError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(::csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CsvError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect();

    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(CsvError::Empty);
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(CsvError::MissingColumns(missing));
    }

    // Positions are guaranteed present by the check above.
    let idx = |name: &str| headers.iter().position(|h| h == name).unwrap_or(0);
    let plot_idx = idx("plot_id");
    let owner_idx = idx("owner_name");
    let area_idx = idx("area_record");

    let mut entries = Vec::new();
    let mut errors = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let line = i + 2; // 1-based, header is line 1

        let record = match record {
            Ok(r) => r,
            Err(e) => {
                errors.push(format!("row {line}: {e}"));
                continue;
            }
        };

        let plot_id = record.get(plot_idx).unwrap_or("").to_string();
        let owner_name = record.get(owner_idx).unwrap_or("").to_string();
        let area_str = record.get(area_idx).unwrap_or("");

        if plot_id.is_empty() {
            errors.push(format!("row {line}: missing plot_id"));
            continue;
        }
        if owner_name.is_empty() {
            errors.push(format!("row {line}: missing owner_name"));
            continue;
        }
        if area_str.is_empty() {
            errors.push(format!("row {line}: missing area_record"));
            continue;
        }

        match area_str.parse::<f64>() {
            Ok(area) if area.is_finite() && area > 0.0 => entries.push(RecordEntry {
                id: None,
                plot_id,
                owner_name,
                area_record: area,
            }),
            _ => errors.push(format!(
                "row {line}: invalid area_record '{area_str}' (must be a positive number)"
            )),
        }
    }

    if !errors.is_empty() {
        return Err(CsvError::InvalidRows(errors));
    }
    if entries.is_empty() {
        return Err(CsvError::Empty);
    }

    Ok(entries)
}

/// Collection-level validation applied before a bulk import: duplicate plot
/// ids, id charset, name length, plausible area. Returns one message per
/// violation; empty means clean.
pub fn validate_records(entries: &[RecordEntry]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for entry in entries {
        if !seen.insert(entry.plot_id.as_str()) {
            errors.push(format!("duplicate plot_id: {}", entry.plot_id));
        }

        if !is_valid_plot_id(&entry.plot_id) {
            errors.push(format!(
                "invalid plot_id format: {} (letters, digits, hyphens and underscores only)",
                entry.plot_id
            ));
        }

        if entry.owner_name.chars().count() > MAX_OWNER_NAME_LEN {
            errors.push(format!(
                "owner name too long for plot {} (max {MAX_OWNER_NAME_LEN} characters)",
                entry.plot_id
            ));
        }

        if entry.area_record > MAX_AREA_HECTARES {
            errors.push(format!(
                "area too large for plot {} (max {MAX_AREA_HECTARES} hectares)",
                entry.plot_id
            ));
        }
    }

    errors
}

pub fn is_valid_plot_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Write entries back out in the import format (header + three columns).
pub fn export_records(entries: &[RecordEntry]) -> Result<String, CsvError> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());

    writer
        .write_record(REQUIRED_COLUMNS)
        .map_err(|e| CsvError::Io(e.to_string()))?;

    for entry in entries {
        writer
            .write_record(&[
                entry.plot_id.as_str(),
                entry.owner_name.as_str(),
                &entry.area_record.to_string(),
            ])
            .map_err(|e| CsvError::Io(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CsvError::Io(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CsvError::Io(e.to_string()))
}
