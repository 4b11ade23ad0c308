//! Weekday lookup into a person's chore bucket.
//!
//! Weekdays are numbered from Monday = 0 to Sunday = 6. A person's n-th
//! on-day gets the n-th chore of their bucket.

use serde::{Deserialize, Serialize};

use super::Task;

/// Ordered weekdays on which a person may receive a chore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OnDays(Vec<u8>);

impl OnDays {
    /// Tuesday, Thursday, Saturday.
    pub fn primary() -> Self {
        Self(vec![1, 3, 5])
    }

    /// Monday, Wednesday, Friday.
    pub fn secondary() -> Self {
        Self(vec![0, 2, 4])
    }

    pub fn new(days: Vec<u8>) -> Self {
        Self(days)
    }

    /// Position of `weekday` in the on-day list.
    pub fn position(&self, weekday: u8) -> Option<usize> {
        self.0.iter().position(|d| *d == weekday)
    }

    pub fn days(&self) -> &[u8] {
        &self.0
    }
}

impl Default for OnDays {
    fn default() -> Self {
        Self::primary()
    }
}

/// The chore a person does on `weekday`, if any.
///
/// `None` when the weekday is not an on-day, or when the bucket holds fewer
/// chores than the weekday's position.
pub fn assign_day_task<'a>(weekday: u8, on_days: &OnDays, bucket: &[&'a Task]) -> Option<&'a Task> {
    let index = on_days.position(weekday)?;
    bucket.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chore::{Effort, Frequency};

    fn assigned(weekday: u8, on_days: &OnDays, bucket: &[&Task]) -> Option<String> {
        assign_day_task(weekday, on_days, bucket).map(|t| t.name.clone())
    }

    #[test]
    fn positions_map_to_bucket_slots() {
        let t1 = Task::new("T1", Frequency::Weekly, Effort::Low);
        let t2 = Task::new("T2", Frequency::Weekly, Effort::Low);
        let bucket = vec![&t1, &t2];
        let on_days = OnDays::primary();

        assert_eq!(assigned(1, &on_days, &bucket).as_deref(), Some("T1"));
        assert_eq!(assigned(3, &on_days, &bucket).as_deref(), Some("T2"));
        // Saturday is position 2, past the end of a two-chore bucket.
        assert!(assign_day_task(5, &on_days, &bucket).is_none());
    }

    #[test]
    fn off_days_and_sunday_get_nothing() {
        let t1 = Task::new("T1", Frequency::Weekly, Effort::Low);
        let bucket = vec![&t1];
        let on_days = OnDays::primary();
        for weekday in [0, 2, 4, 6] {
            assert!(assign_day_task(weekday, &on_days, &bucket).is_none());
        }
        assert!(assign_day_task(6, &OnDays::secondary(), &bucket).is_none());
        assert_eq!(
            assigned(0, &OnDays::secondary(), &bucket).as_deref(),
            Some("T1")
        );
    }

    #[test]
    fn empty_bucket() {
        assert!(assign_day_task(1, &OnDays::primary(), &[]).is_none());
    }
}
