//! # Weekplan Core Library
//!
//! Household week planner: decides which recurring chores are due, splits
//! them fairly between two people under an effort-combination table, and
//! composes a day plan of meal, chores and activities for each date of a
//! week. The `weekplan` CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Chore core**: eligibility filter, fair distributor and weekday lookup
//!   (pure functions over [`Task`] lists)
//! - **Tabular store**: the [`TabularStore`] trait with in-memory, JSON
//!   workbook and Google Sheets backends, plus a TTL cache
//! - **Plan**: day composition and the [`PlannerSession`] that owns all
//!   state for one run
//! - **Storage**: TOML configuration and the JSON plan document
//!
//! ## Key Components
//!
//! - [`eligible`]: which chores are due on a date
//! - [`distribute`]: greedy fair split into per-person buckets
//! - [`assign_day_task`]: the chore for a weekday from a bucket
//! - [`PlannerSession`]: build, regenerate, edit and archive weeks

pub mod chore;
pub mod error;
pub mod plan;
pub mod storage;
pub mod store;

pub use chore::{
    assign_day_task, distribute, eligible, eligible_with, AssignmentPlan, Effort, Frequency,
    OnDays, Recency, RecencyPolicy, Task,
};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use plan::{compose_day, Catalogs, DayRecord, Outcome, Picker, PlannerSession, Selection};
pub use storage::{data_dir, Config, PlanDb, StoreBackend};
pub use store::{CachedStore, MemoryStore, SheetsAuth, SheetsStore, TabularStore, WorkbookFile};
