// bhulekh CLI - land-record reconciliation, headless

mod exit_codes;
mod records;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use bhulekh_io::store::StoreError;

use exit_codes::{
    EXIT_ERROR, EXIT_RECON_PARSE, EXIT_STORE_DUPLICATE, EXIT_STORE_ERROR, EXIT_STORE_NOT_FOUND,
    EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "bhulekh")]
#[command(about = "Reconcile a digitized village land map against official records")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  bhulekh-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every map parcel against the records collection
    #[command(after_help = "\
Exit code 3 indicates discrepancies: area mismatches, missing records, or
orphaned record entries. A clean pass exits 0.

Examples:
  bhulekh run --map village.geojson --records records.csv
  bhulekh run --map village.geojson                  # records from the store
  bhulekh run --json | jq '.summary'
  bhulekh run --output report.json")]
    Run {
        /// Map dataset (GeoJSON FeatureCollection)
        #[arg(long)]
        map: Option<PathBuf>,

        /// Records CSV (omit to read the record store)
        #[arg(long)]
        records: Option<PathBuf>,

        /// Record store database path
        #[arg(long, env = "BHULEKH_DB")]
        db: Option<PathBuf>,

        /// Output the full JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Check a records CSV without importing it
    #[command(after_help = "\
Examples:
  bhulekh validate records.csv")]
    Validate {
        /// Records CSV file
        file: PathBuf,
    },

    /// Import a records CSV into the store, replacing the collection
    #[command(after_help = "\
Examples:
  bhulekh import records.csv
  bhulekh import records.csv --db ./records.db")]
    Import {
        /// Records CSV file
        file: PathBuf,

        /// Record store database path
        #[arg(long, env = "BHULEKH_DB")]
        db: Option<PathBuf>,
    },

    /// Export the stored records as CSV
    #[command(after_help = "\
Examples:
  bhulekh export
  bhulekh export -o records.csv")]
    Export {
        /// Record store database path
        #[arg(long, env = "BHULEKH_DB")]
        db: Option<PathBuf>,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Manage individual record entries
    Records {
        #[command(subcommand)]
        command: RecordsCommands,
    },

    /// List record entries with no parcel on the map
    #[command(after_help = "\
Examples:
  bhulekh orphans --map village.geojson
  bhulekh orphans --map village.geojson --records records.csv --json")]
    Orphans {
        /// Map dataset (GeoJSON FeatureCollection)
        #[arg(long)]
        map: Option<PathBuf>,

        /// Records CSV (omit to read the record store)
        #[arg(long)]
        records: Option<PathBuf>,

        /// Record store database path
        #[arg(long, env = "BHULEKH_DB")]
        db: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the change log for the record store
    #[command(after_help = "\
Examples:
  bhulekh history
  bhulekh history --action update
  bhulekh history --plot vlg-001 --json")]
    History {
        /// Filter by action (create, update, bulk_upload)
        #[arg(long)]
        action: Option<String>,

        /// Filter by plot id (case-insensitive substring)
        #[arg(long)]
        plot: Option<String>,

        /// Record store database path
        #[arg(long, env = "BHULEKH_DB")]
        db: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum RecordsCommands {
    /// List stored records
    List {
        /// Record store database path
        #[arg(long, env = "BHULEKH_DB")]
        db: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a record entry
    #[command(after_help = "\
Examples:
  bhulekh records create VLG-016 --owner \"Krishna Murthy\" --area 1.26")]
    Create {
        /// Plot id (letters, digits, hyphens, underscores)
        plot_id: String,

        /// Owner name on record
        #[arg(long)]
        owner: String,

        /// Recorded area in hectares
        #[arg(long)]
        area: f64,

        /// Record store database path
        #[arg(long, env = "BHULEKH_DB")]
        db: Option<PathBuf>,
    },

    /// Edit a record, previewing the reclassification before the write
    #[command(after_help = "\
The preview shows the would-be status against the map before anything is
persisted; the authoritative status always comes from a fresh `bhulekh run`.

Examples:
  bhulekh records update VLG-003 --area 3.19
  bhulekh records update VLG-003 --owner \"Suresh Reddy\" --map village.geojson")]
    Update {
        /// Plot id of the record to edit
        plot_id: String,

        /// New owner name
        #[arg(long)]
        owner: Option<String>,

        /// New recorded area in hectares
        #[arg(long)]
        area: Option<f64>,

        /// Map dataset used for the reclassification preview
        #[arg(long)]
        map: Option<PathBuf>,

        /// Record store database path
        #[arg(long, env = "BHULEKH_DB")]
        db: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            map,
            records,
            db,
            json,
            output,
        } => run::cmd_run(map, records, db, json, output),
        Commands::Validate { file } => records::cmd_validate(file),
        Commands::Import { file, db } => records::cmd_import(file, db),
        Commands::Export { db, output } => records::cmd_export(db, output),
        Commands::Records { command } => match command {
            RecordsCommands::List { db, json } => records::cmd_list(db, json),
            RecordsCommands::Create {
                plot_id,
                owner,
                area,
                db,
            } => records::cmd_create(plot_id, owner, area, db),
            RecordsCommands::Update {
                plot_id,
                owner,
                area,
                map,
                db,
            } => records::cmd_update(plot_id, owner, area, map, db),
        },
        Commands::Orphans {
            map,
            records,
            db,
            json,
        } => run::cmd_orphans(map, records, db, json),
        Commands::History {
            action,
            plot,
            db,
            json,
        } => records::cmd_history(action, plot, db, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_ERROR,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_RECON_PARSE,
            message: msg.into(),
            hint: None,
        }
    }

    /// Create error from a store error with the proper exit code.
    pub fn store(err: StoreError) -> Self {
        let (code, hint) = match &err {
            StoreError::DuplicatePlot(_) => (
                EXIT_STORE_DUPLICATE,
                Some("use `bhulekh records update` to edit the existing record".to_string()),
            ),
            StoreError::NotFound(_) => (
                EXIT_STORE_NOT_FOUND,
                Some("see `bhulekh records list` for stored plot ids".to_string()),
            ),
            StoreError::Sqlite(_) => (EXIT_STORE_ERROR, None),
        };
        Self {
            code,
            message: err.to_string(),
            hint,
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
