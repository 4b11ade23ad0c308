use indexmap::IndexMap;

use crate::chore::{tasks_from_records, Task};
use crate::error::StoreError;
use crate::storage::Config;
use crate::store::TabularStore;

/// Header of the single column in every activity worksheet.
pub const ACTIVITY_COLUMN: &str = "Activiteiten";

/// Reference lists read from the tabular store for one pass.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub tasks: Vec<Task>,
    pub meals: Vec<String>,
    /// Activity names per worksheet.
    pub activities: IndexMap<String, Vec<String>>,
}

impl Catalogs {
    /// Read every catalog the configuration refers to.
    pub fn load<S: TabularStore>(store: &mut S, config: &Config) -> Result<Self, StoreError> {
        let sheets = &config.store.worksheets;
        let tasks = tasks_from_records(&store.records(&sheets.tasks)?);
        let meals = store.first_column(&sheets.meals)?;

        let mut activities = IndexMap::new();
        for worksheet in config.household.activity_worksheets() {
            store.column_index(worksheet, ACTIVITY_COLUMN)?;
            let names: Vec<String> = store
                .records(worksheet)?
                .into_iter()
                .filter_map(|mut r| r.shift_remove(ACTIVITY_COLUMN))
                .filter(|name| !name.trim().is_empty())
                .collect();
            activities.insert(worksheet.to_string(), names);
        }

        tracing::debug!(
            tasks = tasks.len(),
            meals = meals.len(),
            activity_sheets = activities.len(),
            "catalogs loaded"
        );
        Ok(Self {
            tasks,
            meals,
            activities,
        })
    }

    pub fn activities_in(&self, worksheet: &str) -> &[String] {
        self.activities
            .get(worksheet)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }
}
