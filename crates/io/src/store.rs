// Record store - land records in SQLite, with a change log

use std::fmt;
use std::path::Path;

use rusqlite::{params, Connection};
use serde::Serialize;

use bhulekh_recon::RecordEntry;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    id TEXT PRIMARY KEY,
    plot_id TEXT NOT NULL,
    owner_name TEXT NOT NULL,
    area_record REAL NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_records_plot_id ON records(plot_id);

CREATE TABLE IF NOT EXISTS change_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    plot_id TEXT,
    action TEXT NOT NULL,
    field_name TEXT,
    old_value TEXT,
    new_value TEXT,
    description TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// History queries return at most this many entries, newest first.
const HISTORY_LIMIT: usize = 100;

#[derive(Debug)]
pub enum StoreError {
    /// A record for this plot id already exists.
    DuplicatePlot(String),
    /// No record for this plot id.
    NotFound(String),
    /// Underlying database error.
    Sqlite(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePlot(plot_id) => {
                write!(f, "a record for plot '{plot_id}' already exists")
            }
            Self::NotFound(plot_id) => write!(f, "no record for plot '{plot_id}'"),
            Self::Sqlite(msg) => write!(f, "database error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(err.to_string())
    }
}

/// One audit entry. Creates and field edits reference a plot id; bulk
/// uploads do not.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeLogEntry {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_id: Option<String>,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    pub description: String,
    pub created_at: String,
}

/// Fields a manual edit may change. `None` leaves the field alone.
#[derive(Debug, Clone, Default)]
pub struct RecordUpdate {
    pub owner_name: Option<String>,
    pub area_record: Option<f64>,
}

pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// All records, ordered by plot id.
    pub fn list(&self) -> Result<Vec<RecordEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, plot_id, owner_name, area_record FROM records ORDER BY plot_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(RecordEntry {
                id: Some(row.get(0)?),
                plot_id: row.get(1)?,
                owner_name: row.get(2)?,
                area_record: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn get(&self, plot_id: &str) -> Result<Option<RecordEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, plot_id, owner_name, area_record FROM records WHERE plot_id = ?1",
        )?;
        let mut rows = stmt.query_map(params![plot_id], |row| {
            Ok(RecordEntry {
                id: Some(row.get(0)?),
                plot_id: row.get(1)?,
                owner_name: row.get(2)?,
                area_record: row.get(3)?,
            })
        })?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Create a record. Rejects a plot id that is already on file.
    pub fn create(
        &self,
        plot_id: &str,
        owner_name: &str,
        area_record: f64,
    ) -> Result<RecordEntry, StoreError> {
        if self.get(plot_id)?.is_some() {
            return Err(StoreError::DuplicatePlot(plot_id.to_string()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO records (id, plot_id, owner_name, area_record, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![id, plot_id, owner_name, area_record, now],
        )?;

        self.log(
            Some(plot_id),
            "create",
            Some("record"),
            None,
            Some(plot_id),
            &format!("Created record for plot {plot_id}"),
        )?;

        Ok(RecordEntry {
            id: Some(id),
            plot_id: plot_id.to_string(),
            owner_name: owner_name.to_string(),
            area_record,
        })
    }

    /// Apply a manual edit. Only fields that actually change are written,
    /// one change-log row per changed field; a no-op edit writes nothing.
    pub fn update(&self, plot_id: &str, update: &RecordUpdate) -> Result<RecordEntry, StoreError> {
        let existing = self
            .get(plot_id)?
            .ok_or_else(|| StoreError::NotFound(plot_id.to_string()))?;

        let mut changes: Vec<(&str, String, String)> = Vec::new();

        if let Some(owner) = &update.owner_name {
            if *owner != existing.owner_name {
                changes.push(("owner_name", existing.owner_name.clone(), owner.clone()));
            }
        }
        if let Some(area) = update.area_record {
            if area != existing.area_record {
                changes.push((
                    "area_record",
                    existing.area_record.to_string(),
                    area.to_string(),
                ));
            }
        }

        if changes.is_empty() {
            return Ok(existing);
        }

        let owner_name = update
            .owner_name
            .clone()
            .unwrap_or_else(|| existing.owner_name.clone());
        let area_record = update.area_record.unwrap_or(existing.area_record);
        let now = chrono::Utc::now().to_rfc3339();

        self.conn.execute(
            "UPDATE records SET owner_name = ?1, area_record = ?2, updated_at = ?3
             WHERE plot_id = ?4",
            params![owner_name, area_record, now, plot_id],
        )?;

        for (field, old_value, new_value) in &changes {
            self.log(
                Some(plot_id),
                "update",
                Some(*field),
                Some(old_value.as_str()),
                Some(new_value.as_str()),
                &format!("Updated {field} for plot {plot_id}"),
            )?;
        }

        self.get(plot_id)?
            .ok_or_else(|| StoreError::NotFound(plot_id.to_string()))
    }

    /// Replace the whole collection — bulk upload semantics. All-or-nothing
    /// inside one transaction; logs a single `bulk_upload` entry.
    pub fn replace_all(
        &mut self,
        entries: &[RecordEntry],
        source: &str,
    ) -> Result<usize, StoreError> {
        let now = chrono::Utc::now().to_rfc3339();

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM records", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO records (id, plot_id, owner_name, area_record, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            )?;
            for entry in entries {
                let id = uuid::Uuid::new_v4().to_string();
                stmt.execute(params![
                    id,
                    entry.plot_id,
                    entry.owner_name,
                    entry.area_record,
                    now
                ])?;
            }
        }
        tx.commit()?;

        self.log(
            None,
            "bulk_upload",
            None,
            None,
            Some(&format!("{} records", entries.len())),
            &format!("Uploaded {} records from {source}", entries.len()),
        )?;

        Ok(entries.len())
    }

    /// Change log, newest first, capped at 100 entries. `action` filters
    /// exactly; `plot` is a case-insensitive substring match.
    pub fn history(
        &self,
        action: Option<&str>,
        plot: Option<&str>,
    ) -> Result<Vec<ChangeLogEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, plot_id, action, field_name, old_value, new_value, description, created_at
             FROM change_log
             WHERE (?1 IS NULL OR action = ?1)
             ORDER BY id DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![action, HISTORY_LIMIT as i64], |row| {
            Ok(ChangeLogEntry {
                id: row.get(0)?,
                plot_id: row.get(1)?,
                action: row.get(2)?,
                field_name: row.get(3)?,
                old_value: row.get(4)?,
                new_value: row.get(5)?,
                description: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?;

        let mut entries = rows.collect::<Result<Vec<_>, _>>()?;

        if let Some(plot) = plot {
            let needle = plot.to_lowercase();
            entries.retain(|e| {
                e.plot_id
                    .as_deref()
                    .map(|p| p.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            });
        }

        Ok(entries)
    }

    fn log(
        &self,
        plot_id: Option<&str>,
        action: &str,
        field_name: Option<&str>,
        old_value: Option<&str>,
        new_value: Option<&str>,
        description: &str,
    ) -> Result<(), StoreError> {
        let now = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO change_log (plot_id, action, field_name, old_value, new_value, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![plot_id, action, field_name, old_value, new_value, description, now],
        )?;
        Ok(())
    }
}
