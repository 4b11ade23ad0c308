//! Day records and the week planner built on top of the chore core.

pub mod catalog;
pub mod compose;
pub mod session;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use catalog::Catalogs;
pub use compose::{compose_day, Picker, Selection};
pub use session::{Outcome, PlannerSession};

/// Everything planned for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    /// e.g. "Tuesday 04 June 2024"
    pub date: String,
    /// e.g. "Tue 04/06"
    pub date_short: String,
    pub meal: String,
    /// Chore for the primary household member.
    #[serde(default)]
    pub primary_task: Option<String>,
    #[serde(default)]
    pub secondary_task: Option<String>,
    /// Activity per slot key.
    #[serde(default)]
    pub activities: IndexMap<String, String>,
}

impl DayRecord {
    pub fn has_task(&self) -> bool {
        self.primary_task.is_some() || self.secondary_task.is_some()
    }
}
