pub mod activity;
pub mod auth;
pub mod config;
pub mod day;
pub mod meal;
pub mod task;
pub mod week;

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use weekplan_core::chore::{COL_EFFORT, COL_FREQUENCY, COL_LAST_COMPLETED, COL_NAME};
use weekplan_core::plan::catalog::ACTIVITY_COLUMN;
use weekplan_core::store::credentials::ServiceAccountKey;
use weekplan_core::{
    data_dir, Config, ConfigError, MemoryStore, Outcome, PlanDb, PlannerSession, SheetsAuth,
    SheetsStore, StoreBackend, TabularStore, WorkbookFile,
};

pub type Session = PlannerSession<Box<dyn TabularStore>>;

const WORKBOOK_FILE: &str = "weekplan_workbook.json";

/// Worksheets a local workbook needs, with their header rows.
fn worksheet_layout(config: &Config) -> Vec<(String, Vec<&'static str>)> {
    let sheets = &config.store.worksheets;
    let mut layout = vec![
        (
            sheets.tasks.clone(),
            vec![COL_NAME, COL_FREQUENCY, COL_EFFORT, COL_LAST_COMPLETED],
        ),
        (sheets.meals.clone(), vec!["Gerecht"]),
    ];
    for worksheet in config.household.activity_worksheets() {
        layout.push((worksheet.to_string(), vec![ACTIVITY_COLUMN]));
    }
    layout.push((sheets.results.clone(), vec!["Week", "Planning"]));
    layout
}

pub fn workbook_path() -> Result<PathBuf, ConfigError> {
    Ok(data_dir()?.join(WORKBOOK_FILE))
}

/// Load the config and open the session on the selected backend.
pub fn open_session(backend: Option<StoreBackend>) -> Result<Session, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let backend = backend.unwrap_or(config.store.backend);
    tracing::debug!(?backend, "opening store");

    let store: Box<dyn TabularStore> = match backend {
        StoreBackend::Memory => {
            let mut book = MemoryStore::new();
            for (name, header) in worksheet_layout(&config) {
                book.ensure_worksheet(&name, &header);
            }
            Box::new(book)
        }
        StoreBackend::Workbook => {
            let mut book = WorkbookFile::open(workbook_path()?)?;
            for (name, header) in worksheet_layout(&config) {
                book.ensure_worksheet(&name, &header)?;
            }
            Box::new(book)
        }
        StoreBackend::Sheets => {
            if config.store.spreadsheet_id.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "store.spreadsheet_id".into(),
                    message: "required for the sheets backend".into(),
                }
                .into());
            }
            let key = match &config.store.credentials_path {
                Some(path) => ServiceAccountKey::from_file(path)?,
                None => ServiceAccountKey::from_keyring()?,
            };
            let sheets = SheetsStore::new(
                config.store.spreadsheet_id.clone(),
                SheetsAuth::ServiceAccount(key),
            )?;
            Box::new(sheets)
        }
    };

    let db = match backend {
        StoreBackend::Memory => PlanDb::in_memory(),
        _ => PlanDb::open()?,
    };
    Ok(PlannerSession::new(config, store, db))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Print the result of a catalog mutation.
pub fn report(outcome: Outcome, what: &str) {
    match outcome {
        Outcome::Added => println!("added {what}"),
        Outcome::AlreadyExists => println!("{what} already exists, nothing written"),
        Outcome::Completed { on } => println!("{what} completed on {on}"),
        Outcome::Removed => println!("{what} removed (one-off)"),
    }
}
