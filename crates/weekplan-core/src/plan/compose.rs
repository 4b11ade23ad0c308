//! Build the day record for one date.
//!
//! Meal and activity picks come from a [`Selection`]: `Cyclic` walks each
//! catalog by day of month plus the slot's offset, `Random` draws from a PCG
//! stream seeded by the plan seed, the date and the slot position. Chores come
//! from the weekday lookup into the distribution buckets.

use chrono::{Datelike, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use super::{Catalogs, DayRecord};
use crate::chore::{assign_day_task, AssignmentPlan};
use crate::storage::HouseholdConfig;

/// How meals and activities are picked per date.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    #[default]
    Cyclic,
    Random,
}

/// Selection bound to a seed for one planning pass.
#[derive(Debug, Clone, Copy)]
pub struct Picker {
    pub selection: Selection,
    pub seed: u64,
}

impl Picker {
    pub fn cyclic() -> Self {
        Self {
            selection: Selection::Cyclic,
            seed: 0,
        }
    }

    fn pick<'a>(
        &self,
        items: &'a [String],
        date: NaiveDate,
        offset: usize,
        salt: u64,
    ) -> Option<&'a String> {
        if items.is_empty() {
            return None;
        }
        let index = match self.selection {
            Selection::Cyclic => (date.day() as usize + offset) % items.len(),
            Selection::Random => {
                let day_seed = (date.num_days_from_ce() as u64)
                    .wrapping_mul(0x9E37_79B9_7F4A_7C15)
                    .wrapping_add(salt);
                let mut rng = Mcg128Xsl64::seed_from_u64(self.seed ^ day_seed);
                rng.gen_range(0..items.len())
            }
        };
        items.get(index)
    }
}

/// Compose the record for `date`.
///
/// Empty catalogs produce empty strings. Chores follow the weekday of
/// `date` and the on-days of each household member.
pub fn compose_day(
    date: NaiveDate,
    catalogs: &Catalogs,
    plan: &AssignmentPlan<'_>,
    household: &HouseholdConfig,
    picker: Picker,
) -> DayRecord {
    let weekday = date.weekday().num_days_from_monday() as u8;
    let task_for = |person: &str, on_days| {
        assign_day_task(weekday, on_days, plan.bucket(person)).map(|t| t.name.clone())
    };

    let meal = picker
        .pick(&catalogs.meals, date, 0, 0)
        .cloned()
        .unwrap_or_default();

    let activities = household
        .slots
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let items = catalogs.activities_in(&slot.worksheet);
            let choice = picker
                .pick(items, date, slot.offset, i as u64 + 1)
                .cloned()
                .unwrap_or_default();
            (slot.key.clone(), choice)
        })
        .collect();

    DayRecord {
        date: date.format("%A %d %B %Y").to_string(),
        date_short: date.format("%a %d/%m").to_string(),
        meal,
        primary_task: task_for(&household.primary, &household.primary_on_days),
        secondary_task: task_for(&household.secondary, &household.secondary_on_days),
        activities,
    }
}
