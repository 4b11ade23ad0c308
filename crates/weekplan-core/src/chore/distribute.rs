//! Greedy fair distribution of due chores over people.
//!
//! People are served in order. Each person scans the chore list in order and
//! takes a chore when it is still free, their bucket holds fewer than
//! [`MAX_TASKS_PER_PERSON`] chores, and the sorted effort multiset with the
//! candidate appears in [`ALLOWED_COMBINATIONS`]. A candidate that does not fit
//! is skipped, not fatal: a later, lighter chore may still fit.
//!
//! Task and person order can be permuted first through a [`TaskOrdering`].
//! With [`Identity`] the result is fully determined by input order.

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::Serialize;
use std::collections::HashSet;

use super::{Effort, Task};

pub const MAX_TASKS_PER_PERSON: usize = 3;

/// Effort multisets a single person may hold, each sorted Low < Medium < High.
pub const ALLOWED_COMBINATIONS: &[&[Effort]] = &[
    &[Effort::Low],
    &[Effort::Low, Effort::Low],
    &[Effort::Low, Effort::Medium],
    &[Effort::Low, Effort::High],
    &[Effort::Medium, Effort::Medium],
    &[Effort::Low, Effort::Low, Effort::Low],
    &[Effort::Low, Effort::Low, Effort::High],
    &[Effort::Low, Effort::Medium, Effort::Medium],
];

/// True when `efforts` (any order) is one of the allowed combinations.
pub fn is_allowed(efforts: &[Effort]) -> bool {
    let mut sorted = efforts.to_vec();
    sorted.sort();
    ALLOWED_COMBINATIONS.contains(&sorted.as_slice())
}

/// Produces the visiting order for a list of `len` items.
pub trait TaskOrdering {
    /// Return a permutation of `0..len`.
    fn arrange(&mut self, len: usize) -> Vec<usize>;
}

/// Keep input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl TaskOrdering for Identity {
    fn arrange(&mut self, len: usize) -> Vec<usize> {
        (0..len).collect()
    }
}

/// Reproducible shuffle from a seed.
#[derive(Debug, Clone)]
pub struct Seeded {
    rng: Mcg128Xsl64,
}

impl Seeded {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mcg128Xsl64::seed_from_u64(seed),
        }
    }
}

impl TaskOrdering for Seeded {
    fn arrange(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(&mut self.rng);
        order
    }
}

/// Per-person chore buckets from one distribution pass.
///
/// Borrows the chores it was built from. Iteration follows the order the
/// people were given in, regardless of any shuffling.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentPlan<'a> {
    buckets: IndexMap<String, Vec<&'a Task>>,
}

impl<'a> AssignmentPlan<'a> {
    pub fn bucket(&self, person: &str) -> &[&'a Task] {
        self.buckets.get(person).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a Task])> {
        self.buckets.iter().map(|(p, b)| (p.as_str(), b.as_slice()))
    }

    pub fn people(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn assigned_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Greedy distributor parameterised by its ordering strategy.
#[derive(Debug, Clone, Default)]
pub struct Distributor<O = Identity> {
    ordering: O,
}

impl Distributor<Identity> {
    pub fn new() -> Self {
        Self { ordering: Identity }
    }
}

impl<O: TaskOrdering> Distributor<O> {
    pub fn with_ordering(ordering: O) -> Self {
        Self { ordering }
    }

    pub fn distribute<'a, P: AsRef<str>>(
        &mut self,
        tasks: &'a [Task],
        people: &[P],
    ) -> AssignmentPlan<'a> {
        let task_order = self.ordering.arrange(tasks.len());
        let person_order = self.ordering.arrange(people.len());

        let mut buckets: IndexMap<String, Vec<&'a Task>> = people
            .iter()
            .map(|p| (p.as_ref().to_string(), Vec::new()))
            .collect();
        let mut taken: HashSet<usize> = HashSet::new();

        for &pi in &person_order {
            let person = people[pi].as_ref();
            let mut efforts: Vec<Effort> = Vec::with_capacity(MAX_TASKS_PER_PERSON);
            let mut accepted: Vec<&'a Task> = Vec::with_capacity(MAX_TASKS_PER_PERSON);

            for &ti in &task_order {
                if accepted.len() >= MAX_TASKS_PER_PERSON {
                    break;
                }
                if taken.contains(&ti) {
                    continue;
                }
                let task = &tasks[ti];
                efforts.push(task.effort);
                if is_allowed(&efforts) {
                    taken.insert(ti);
                    accepted.push(task);
                } else {
                    efforts.pop();
                    tracing::trace!(person, task = %task.name, "effort combination rejected");
                }
            }

            tracing::debug!(person, count = accepted.len(), "bucket filled");
            if let Some(bucket) = buckets.get_mut(person) {
                bucket.extend(accepted);
            }
        }

        AssignmentPlan { buckets }
    }
}

/// Distribute with input order preserved.
pub fn distribute<'a, P: AsRef<str>>(tasks: &'a [Task], people: &[P]) -> AssignmentPlan<'a> {
    Distributor::new().distribute(tasks, people)
}
