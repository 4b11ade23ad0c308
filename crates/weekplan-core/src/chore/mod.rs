//! Recurring household chores.
//!
//! A chore catalog lives in the `Taken` worksheet. Each row carries a name,
//! a frequency class, an effort class and the date it was last completed.
//! The submodules decide which chores are due ([`eligibility`]), spread
//! them over people ([`distribute`]) and map buckets onto weekdays
//! ([`weekday`]).

pub mod distribute;
pub mod eligibility;
pub mod weekday;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use distribute::{distribute, AssignmentPlan, Distributor, Identity, Seeded, TaskOrdering};
pub use eligibility::{eligible, eligible_with, RecencyPolicy};
pub use weekday::{assign_day_task, OnDays};

/// Column headers of the chore worksheet.
pub const COL_NAME: &str = "Taak";
pub const COL_FREQUENCY: &str = "Frequentie";
pub const COL_EFFORT: &str = "Effort";
pub const COL_LAST_COMPLETED: &str = "Laatst_Uitgevoerd";

/// Date format used in the `Laatst_Uitgevoerd` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How often a chore comes back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
    SemiAnnual,
    Yearly,
    Every5Years,
    /// Done once, then removed from the catalog.
    OneOff,
}

impl Frequency {
    pub const ALL: [Frequency; 7] = [
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::SemiAnnual,
        Frequency::Yearly,
        Frequency::Every5Years,
        Frequency::OneOff,
    ];

    /// Minimum days since last completion before the chore is due again.
    /// `None` means there is no recency gate.
    pub fn min_days(&self) -> Option<i64> {
        match self {
            Frequency::Weekly => Some(7),
            Frequency::Monthly => Some(30),
            Frequency::Quarterly => Some(90),
            Frequency::SemiAnnual => Some(182),
            Frequency::Yearly => Some(365),
            Frequency::Every5Years => Some(1825),
            Frequency::OneOff => None,
        }
    }

    /// Label written to the worksheet.
    pub fn sheet_label(&self) -> &'static str {
        match self {
            Frequency::Weekly => "Wekelijks",
            Frequency::Monthly => "Maandelijks",
            Frequency::Quarterly => "Driemaandelijks",
            Frequency::SemiAnnual => "Halfjaarlijks",
            Frequency::Yearly => "Jaarlijks",
            Frequency::Every5Years => "Om de 5 jaar",
            Frequency::OneOff => "Eenmalig",
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "wekelijks" | "weekly" => Ok(Frequency::Weekly),
            "maandelijks" | "monthly" => Ok(Frequency::Monthly),
            "driemaandelijks" | "quarterly" => Ok(Frequency::Quarterly),
            "halfjaarlijks" | "semiannual" | "semi-annual" | "semi_annual" => {
                Ok(Frequency::SemiAnnual)
            }
            "jaarlijks" | "yearly" => Ok(Frequency::Yearly),
            "om de 5 jaar" | "every5years" | "every 5 years" | "every_5_years" => {
                Ok(Frequency::Every5Years)
            }
            "eenmalig" | "oneoff" | "one-off" | "one_off" => Ok(Frequency::OneOff),
            _ => Err(format!("unknown frequency: {s}")),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_label())
    }
}

/// Coarse workload rating used only for balancing.
///
/// Ordering is Low < Medium < High, which is what the sorted
/// combination table in [`distribute`] relies on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    pub fn sheet_label(&self) -> &'static str {
        match self {
            Effort::Low => "Laag",
            Effort::Medium => "Gemiddeld",
            Effort::High => "Hoog",
        }
    }
}

impl FromStr for Effort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "laag" | "low" | "l" => Ok(Effort::Low),
            "gemiddeld" | "medium" | "m" => Ok(Effort::Medium),
            "hoog" | "high" | "h" => Ok(Effort::High),
            _ => Err(format!("unknown effort: {s}")),
        }
    }
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_label())
    }
}

/// When a chore was last done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Recency {
    /// Never done, or the cell is empty.
    Never,
    On(NaiveDate),
    /// The cell holds text that is not a `YYYY-MM-DD` date.
    Unreadable(String),
}

impl Recency {
    /// Parse a raw worksheet cell.
    pub fn from_cell(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Recency::Never;
        }
        match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
            Ok(date) => Recency::On(date),
            Err(_) => Recency::Unreadable(trimmed.to_string()),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Recency::On(date) => Some(*date),
            _ => None,
        }
    }
}

impl Default for Recency {
    fn default() -> Self {
        Recency::Never
    }
}

/// A chore in the catalog. Identity is the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub frequency: Frequency,
    pub effort: Effort,
    #[serde(default)]
    pub last_completed: Recency,
}

impl Task {
    pub fn new(name: impl Into<String>, frequency: Frequency, effort: Effort) -> Self {
        Self {
            name: name.into(),
            frequency,
            effort,
            last_completed: Recency::Never,
        }
    }

    pub fn completed_on(mut self, date: NaiveDate) -> Self {
        self.last_completed = Recency::On(date);
        self
    }

    /// Build a task from a header-keyed worksheet record.
    pub fn from_record(record: &IndexMap<String, String>) -> Result<Self, String> {
        let name = record
            .get(COL_NAME)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| format!("missing '{COL_NAME}'"))?;
        let frequency: Frequency = record
            .get(COL_FREQUENCY)
            .ok_or_else(|| format!("missing '{COL_FREQUENCY}'"))?
            .parse()?;
        let effort: Effort = record
            .get(COL_EFFORT)
            .ok_or_else(|| format!("missing '{COL_EFFORT}'"))?
            .parse()?;
        let last_completed = record
            .get(COL_LAST_COMPLETED)
            .map(|raw| Recency::from_cell(raw))
            .unwrap_or_default();

        Ok(Self {
            name: name.to_string(),
            frequency,
            effort,
            last_completed,
        })
    }

    /// Row values in worksheet column order for appending.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.frequency.sheet_label().to_string(),
            self.effort.sheet_label().to_string(),
            self.last_completed
                .date()
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        ]
    }
}

/// Parse every usable row of the chore worksheet, skipping broken ones.
pub fn tasks_from_records(records: &[IndexMap<String, String>]) -> Vec<Task> {
    records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| match Task::from_record(record) {
            Ok(task) => Some(task),
            Err(reason) => {
                // +2: one for the header row, one for 1-based rows
                tracing::warn!(row = i + 2, %reason, "skipping chore row");
                None
            }
        })
        .collect()
}
