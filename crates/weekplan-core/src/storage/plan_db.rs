//! Local plan document.
//!
//! One JSON object keyed by ISO date (`YYYY-MM-DD`) whose values are day
//! records. Read in full on open and written in full on save.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;

use super::data_dir;
use crate::error::Result;
use crate::plan::DayRecord;

const PLAN_FILE: &str = "weekplan_db.json";

#[derive(Debug, Clone)]
pub struct PlanDb {
    path: PathBuf,
    days: BTreeMap<String, DayRecord>,
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl PlanDb {
    /// Open the plan document in the data directory.
    pub fn open() -> Result<Self> {
        Self::open_at(data_dir()?.join(PLAN_FILE))
    }

    /// Open the plan document at `path`; a missing file is an empty plan.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let days = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, days })
    }

    /// Plan kept only in memory; `save` is a no-op.
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            days: BTreeMap::new(),
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days.get(&date_key(date))
    }

    pub fn get_mut(&mut self, date: NaiveDate) -> Option<&mut DayRecord> {
        self.days.get_mut(&date_key(date))
    }

    pub fn insert(&mut self, date: NaiveDate, record: DayRecord) {
        self.days.insert(date_key(date), record);
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Write the whole document.
    pub fn save(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.days)?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(path = %self.path.display(), days = self.days.len(), "plan saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use tempfile::TempDir;

    fn record(meal: &str) -> DayRecord {
        DayRecord {
            date: "Monday 03 June 2024".into(),
            date_short: "Mon 03/06".into(),
            meal: meal.into(),
            primary_task: None,
            secondary_task: Some("Stofzuigen".into()),
            activities: IndexMap::from([("all".to_string(), "Wandelen".to_string())]),
        }
    }

    #[test]
    fn save_and_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PLAN_FILE);
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

        let mut db = PlanDb::open_at(&path).unwrap();
        assert!(db.is_empty());
        db.insert(date, record("Pasta"));
        db.save().unwrap();

        let reopened = PlanDb::open_at(&path).unwrap();
        assert_eq!(reopened.get(date), Some(&record("Pasta")));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.get("2024-06-03").is_some());
    }

    #[test]
    fn corrupt_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PLAN_FILE);
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(PlanDb::open_at(&path).is_err());
    }

    #[test]
    fn in_memory_save_is_a_no_op() {
        let mut db = PlanDb::in_memory();
        db.insert(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(), record("Soep"));
        db.save().unwrap();
        assert_eq!(db.len(), 1);
    }
}
