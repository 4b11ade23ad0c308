//! Which chores are due on a reference date.
//!
//! A chore is due when at least `Frequency::min_days` whole days have passed
//! since it was last completed. The bound is inclusive: a weekly chore done
//! exactly seven days ago is due. Chores never done are always due, and so
//! are one-off chores.
//!
//! A completion date that cannot be read is treated as "never done" under the
//! default [`RecencyPolicy::Lenient`]. [`RecencyPolicy::Strict`] reports it
//! instead.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Recency, Task};
use crate::error::ValidationError;

/// What to do with an unreadable `last_completed` cell.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecencyPolicy {
    /// Treat as never done; the chore is due.
    #[default]
    Lenient,
    /// Reject the catalog with a validation error.
    Strict,
}

/// Days elapsed between `last` and `reference`. Negative for future dates.
fn days_since(last: NaiveDate, reference: NaiveDate) -> i64 {
    (reference - last).num_days()
}

fn is_due(task: &Task, reference: NaiveDate) -> bool {
    let Some(min_days) = task.frequency.min_days() else {
        return true;
    };
    match &task.last_completed {
        Recency::Never | Recency::Unreadable(_) => true,
        Recency::On(last) => days_since(*last, reference) >= min_days,
    }
}

/// Filter `tasks` down to the ones due on `reference`, preserving order.
///
/// Unreadable completion dates fail open.
pub fn eligible(tasks: &[Task], reference: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| {
            if let Recency::Unreadable(raw) = &task.last_completed {
                tracing::warn!(
                    task = %task.name,
                    raw = %raw,
                    "unreadable completion date, treating as due"
                );
            }
            is_due(task, reference)
        })
        .cloned()
        .collect()
}

/// Like [`eligible`], with an explicit policy for unreadable dates.
pub fn eligible_with(
    tasks: &[Task],
    reference: NaiveDate,
    policy: RecencyPolicy,
) -> Result<Vec<Task>, ValidationError> {
    if policy == RecencyPolicy::Strict {
        if let Some(task) = tasks
            .iter()
            .find(|t| matches!(t.last_completed, Recency::Unreadable(_)))
        {
            let raw = match &task.last_completed {
                Recency::Unreadable(raw) => raw.as_str(),
                _ => "",
            };
            return Err(ValidationError::InvalidValue {
                field: format!("{}.last_completed", task.name),
                message: format!("'{raw}' is not a YYYY-MM-DD date"),
            });
        }
    }
    Ok(eligible(tasks, reference))
}
