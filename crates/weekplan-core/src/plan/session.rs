//! Planner session: the application state behind every user action.
//!
//! A session owns the configuration, a cached view of the tabular store and
//! the local plan document. Each operation is one synchronous pass: read the
//! catalogs, filter and distribute chores, compose or update day records,
//! and write the plan document back in full. Store failures abort the pass
//! before anything is written.

use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;

use super::compose::Picker;
use super::{compose_day, Catalogs, DayRecord};
use crate::chore::{
    distribute, eligible_with, AssignmentPlan, Distributor, Effort, Frequency, Seeded, Task,
    COL_LAST_COMPLETED,
};
use crate::error::{CoreError, Result, ValidationError};
use crate::storage::plan_db::date_key;
use crate::storage::{Config, PlanDb};
use crate::store::{CachedStore, TabularStore};

pub const DAYS_PER_WEEK: i64 = 7;

/// Mixes the regeneration counter into the base seed.
const SEED_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

/// Result of a catalog mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Added,
    /// The name is already in the catalog; nothing was written.
    AlreadyExists,
    /// A recurring chore got a new completion date.
    Completed { on: NaiveDate },
    /// A one-off chore was removed from the catalog.
    Removed,
}

pub struct PlannerSession<S: TabularStore> {
    config: Config,
    store: CachedStore<S>,
    db: PlanDb,
    base_seed: Option<u64>,
    regenerations: u64,
}

/// The seven dates starting at `start`.
pub fn week_dates(start: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0..DAYS_PER_WEEK).map(move |i| start + chrono::Duration::days(i))
}

impl<S: TabularStore> PlannerSession<S> {
    pub fn new(config: Config, store: S, db: PlanDb) -> Self {
        let ttl = Duration::from_secs(config.store.cache_ttl_secs);
        let base_seed = config.planner.seed;
        Self {
            config,
            store: CachedStore::new(store, ttl),
            db,
            base_seed,
            regenerations: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn plan_db(&self) -> &PlanDb {
        &self.db
    }

    pub fn store_mut(&mut self) -> &mut CachedStore<S> {
        &mut self.store
    }

    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    /// Configured seed, or the start date when none is set.
    fn seed(&self, start: NaiveDate) -> u64 {
        self.base_seed
            .unwrap_or(start.num_days_from_ce() as u64)
            .wrapping_add(self.regenerations.wrapping_mul(SEED_STEP))
    }

    fn picker(&self, start: NaiveDate) -> Picker {
        Picker {
            selection: self.config.planner.selection,
            seed: self.seed(start),
        }
    }

    fn distribute<'a>(&self, due: &'a [Task], start: NaiveDate) -> AssignmentPlan<'a> {
        let people = self.config.household.people();
        if self.config.planner.shuffle {
            Distributor::with_ordering(Seeded::new(self.seed(start))).distribute(due, &people)
        } else {
            distribute(due, &people)
        }
    }

    /// Read every catalog through the cache.
    pub fn load_catalogs(&mut self) -> Result<Catalogs> {
        Ok(Catalogs::load(&mut self.store, &self.config)?)
    }

    /// Chores due on `reference`, in catalog order.
    pub fn due_tasks(&mut self, reference: NaiveDate) -> Result<Vec<Task>> {
        let catalogs = self.load_catalogs()?;
        Ok(eligible_with(
            &catalogs.tasks,
            reference,
            self.config.planner.recency_policy(),
        )?)
    }

    /// Chore buckets for the household on `reference`.
    pub fn assignment(&mut self, reference: NaiveDate) -> Result<IndexMap<String, Vec<Task>>> {
        let due = self.due_tasks(reference)?;
        let plan = self.distribute(&due, reference);
        Ok(plan
            .iter()
            .map(|(person, bucket)| {
                let tasks = bucket.iter().map(|t| (*t).clone()).collect();
                (person.to_string(), tasks)
            })
            .collect())
    }

    /// The week from `start`: stored days are kept, missing days composed.
    pub fn build_week(&mut self, start: NaiveDate) -> Result<Vec<DayRecord>> {
        self.compose_week(start, false)
    }

    /// Recompose all seven days from fresh reads, overwriting stored ones.
    pub fn regenerate_week(&mut self, start: NaiveDate) -> Result<Vec<DayRecord>> {
        self.regenerations += 1;
        self.store.invalidate();
        self.compose_week(start, true)
    }

    fn compose_week(&mut self, start: NaiveDate, overwrite: bool) -> Result<Vec<DayRecord>> {
        let catalogs = self.load_catalogs()?;
        let due = eligible_with(&catalogs.tasks, start, self.config.planner.recency_policy())?;
        let plan = self.distribute(&due, start);
        let picker = self.picker(start);

        let mut week = Vec::with_capacity(DAYS_PER_WEEK as usize);
        for date in week_dates(start) {
            let stored = if overwrite { None } else { self.db.get(date).cloned() };
            let record = match stored {
                Some(record) => record,
                None => {
                    let record =
                        compose_day(date, &catalogs, &plan, &self.config.household, picker);
                    tracing::debug!(date = %date_key(date), "composed day");
                    self.db.insert(date, record.clone());
                    record
                }
            };
            week.push(record);
        }

        self.db.save()?;
        tracing::info!(start = %date_key(start), overwrite, due = due.len(), "week planned");
        Ok(week)
    }

    /// Overwrite one field of a stored day.
    ///
    /// `field` is `meal` or an activity slot key; `value` must be in the
    /// current option list for that field.
    pub fn edit_day(&mut self, date: NaiveDate, field: &str, value: &str) -> Result<DayRecord> {
        if self.db.get(date).is_none() {
            return Err(CoreError::not_found("day", date_key(date)));
        }

        let catalogs = self.load_catalogs()?;
        let options: &[String] = if field == "meal" {
            &catalogs.meals
        } else {
            match self.config.household.slot(field) {
                Some(slot) => catalogs.activities_in(&slot.worksheet),
                None => return Err(ValidationError::UnknownField(field.to_string()).into()),
            }
        };
        if !options.iter().any(|o| o == value) {
            return Err(ValidationError::NotAnOption {
                field: field.to_string(),
                value: value.to_string(),
            }
            .into());
        }

        let record = self
            .db
            .get_mut(date)
            .ok_or_else(|| CoreError::not_found("day", date_key(date)))?;
        if field == "meal" {
            record.meal = value.to_string();
        } else {
            record
                .activities
                .insert(field.to_string(), value.to_string());
        }
        let updated = record.clone();

        self.db.save()?;
        tracing::info!(date = %date_key(date), field, "day edited");
        Ok(updated)
    }

    /// Mark a chore done on `today`.
    ///
    /// One-off chores are deleted from the catalog; recurring chores get
    /// `today` written into their completion column, located by header.
    pub fn complete_task(&mut self, name: &str, today: NaiveDate) -> Result<Outcome> {
        let catalogs = self.load_catalogs()?;
        let task = catalogs
            .task(name)
            .ok_or_else(|| CoreError::not_found("task", name))?;

        let sheet = self.config.store.worksheets.tasks.clone();
        let row = self
            .store
            .find_row(&sheet, name)?
            .ok_or_else(|| CoreError::not_found("task", name))?;

        if task.frequency == Frequency::OneOff {
            self.store.delete_row(&sheet, row)?;
            tracing::info!(task = name, "one-off chore removed");
            return Ok(Outcome::Removed);
        }

        let col = self.store.column_index(&sheet, COL_LAST_COMPLETED)?;
        self.store.update_cell(&sheet, row, col, &date_key(today))?;
        tracing::info!(task = name, on = %date_key(today), "chore completed");
        Ok(Outcome::Completed { on: today })
    }

    fn require_name(field: &str, name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                message: "must not be empty".into(),
            }
            .into());
        }
        Ok(trimmed.to_string())
    }

    /// Append `name` to the first column of `sheet` unless it is already there.
    fn add_unique(&mut self, sheet: &str, name: &str, row: Vec<String>) -> Result<Outcome> {
        let existing = self.store.first_column(sheet)?;
        if existing.iter().any(|n| n.trim() == name) {
            tracing::info!(sheet, name, "already present, nothing written");
            return Ok(Outcome::AlreadyExists);
        }
        self.store.append_row(sheet, &row)?;
        tracing::info!(sheet, name, "added");
        Ok(Outcome::Added)
    }

    pub fn add_task(
        &mut self,
        name: &str,
        frequency: Frequency,
        effort: Effort,
    ) -> Result<Outcome> {
        let name = Self::require_name("task", name)?;
        let sheet = self.config.store.worksheets.tasks.clone();
        let row = Task::new(name.clone(), frequency, effort).to_row();
        self.add_unique(&sheet, &name, row)
    }

    pub fn add_meal(&mut self, name: &str) -> Result<Outcome> {
        let name = Self::require_name("meal", name)?;
        let sheet = self.config.store.worksheets.meals.clone();
        self.add_unique(&sheet, &name, vec![name.clone()])
    }

    /// Add to an activity catalog, named by slot key or worksheet.
    pub fn add_activity(&mut self, catalog: &str, name: &str) -> Result<Outcome> {
        let name = Self::require_name("activity", name)?;
        let sheet = self.activity_worksheet(catalog)?;
        self.add_unique(&sheet, &name, vec![name.clone()])
    }

    fn activity_worksheet(&self, catalog: &str) -> Result<String> {
        let household = &self.config.household;
        if let Some(slot) = household.slot(catalog) {
            return Ok(slot.worksheet.clone());
        }
        household
            .activity_worksheets()
            .into_iter()
            .find(|w| *w == catalog)
            .map(String::from)
            .ok_or_else(|| {
                ValidationError::InvalidValue {
                    field: "catalog".into(),
                    message: format!("unknown activity catalog '{catalog}'"),
                }
                .into()
            })
    }

    /// Append the week from `start` to the results worksheet as JSON.
    pub fn archive_week(&mut self, start: NaiveDate) -> Result<Outcome> {
        let week = self.build_week(start)?;
        let sheet = self.config.store.worksheets.results.clone();
        let row = vec![date_key(start), serde_json::to_string(&week)?];
        self.store.append_row(&sheet, &row)?;
        tracing::info!(start = %date_key(start), "week archived");
        Ok(Outcome::Added)
    }
}
