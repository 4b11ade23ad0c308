//! TOML-based application configuration.
//!
//! Stores:
//! - Which tabular store backend to use and its worksheet names
//! - The two household members, their chore on-days and activity slots
//! - Planner options (shuffling, seed, recency policy, selection mode)
//!
//! Configuration is stored at `~/.config/weekplan/config.toml`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::chore::{OnDays, RecencyPolicy};
use crate::error::ConfigError;
use crate::plan::Selection;

/// Tabular store backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Nothing persisted; for trying things out.
    Memory,
    /// Local JSON workbook in the data directory.
    Workbook,
    /// Google Sheets via a service account.
    Sheets,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(StoreBackend::Memory),
            "workbook" => Ok(StoreBackend::Workbook),
            "sheets" => Ok(StoreBackend::Sheets),
            _ => Err(format!("unknown store backend: {s}")),
        }
    }
}

/// Worksheet names in the household spreadsheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorksheetNames {
    #[serde(default = "default_meals_sheet")]
    pub meals: String,
    #[serde(default = "default_tasks_sheet")]
    pub tasks: String,
    #[serde(default = "default_results_sheet")]
    pub results: String,
}

/// Store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,
    /// Spreadsheet id for the sheets backend.
    #[serde(default)]
    pub spreadsheet_id: String,
    /// Service-account key file. The OS keyring is used when unset.
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default)]
    pub worksheets: WorksheetNames,
}

/// One activity pick per day, drawn from an activity worksheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivitySlot {
    /// Field name in the day record.
    pub key: String,
    pub worksheet: String,
    /// Added to the day of month before wrapping around the catalog.
    #[serde(default)]
    pub offset: usize,
}

/// The two people sharing the chores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdConfig {
    #[serde(default = "default_primary")]
    pub primary: String,
    #[serde(default = "default_secondary")]
    pub secondary: String,
    #[serde(default = "OnDays::primary")]
    pub primary_on_days: OnDays,
    #[serde(default = "OnDays::secondary")]
    pub secondary_on_days: OnDays,
    #[serde(default = "default_slots")]
    pub slots: Vec<ActivitySlot>,
}

/// Planner options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Shuffle chore and person order before distributing.
    #[serde(default)]
    pub shuffle: bool,
    /// Fixed seed for shuffling and random selection.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Reject unreadable completion dates instead of treating them as due.
    #[serde(default)]
    pub strict_recency: bool,
    #[serde(default)]
    pub selection: Selection,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/weekplan/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub household: HouseholdConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
}

// Default functions
fn default_meals_sheet() -> String {
    "Eten".into()
}
fn default_tasks_sheet() -> String {
    "Taken".into()
}
fn default_results_sheet() -> String {
    "Weekresultaten".into()
}
fn default_backend() -> StoreBackend {
    StoreBackend::Workbook
}
fn default_cache_ttl_secs() -> u64 {
    300
}
fn default_primary() -> String {
    "cedric".into()
}
fn default_secondary() -> String {
    "lise".into()
}
fn default_slots() -> Vec<ActivitySlot> {
    let slot = |key: &str, worksheet: &str, offset| ActivitySlot {
        key: key.into(),
        worksheet: worksheet.into(),
        offset,
    };
    vec![
        slot("all", "Activiteiten Cédric", 0),
        slot("cedric", "Activiteiten Cédric", 1),
        slot("lise", "Activiteiten Lise", 0),
        slot("lars", "Activiteiten kids", 0),
        slot("robbe", "Activiteiten kids", 3),
    ]
}

impl Default for WorksheetNames {
    fn default() -> Self {
        Self {
            meals: default_meals_sheet(),
            tasks: default_tasks_sheet(),
            results: default_results_sheet(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            spreadsheet_id: String::new(),
            credentials_path: None,
            cache_ttl_secs: default_cache_ttl_secs(),
            worksheets: WorksheetNames::default(),
        }
    }
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            secondary: default_secondary(),
            primary_on_days: OnDays::primary(),
            secondary_on_days: OnDays::secondary(),
            slots: default_slots(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            shuffle: false,
            seed: None,
            strict_recency: false,
            selection: Selection::Cyclic,
        }
    }
}

impl HouseholdConfig {
    /// People in distribution order.
    pub fn people(&self) -> [&str; 2] {
        [self.primary.as_str(), self.secondary.as_str()]
    }

    /// Distinct activity worksheets, in slot order.
    pub fn activity_worksheets(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.slots
            .iter()
            .map(|s| s.worksheet.as_str())
            .filter(|w| seen.insert(*w))
            .collect()
    }

    pub fn slot(&self, key: &str) -> Option<&ActivitySlot> {
        self.slots.iter().find(|s| s.key == key)
    }
}

impl PlannerConfig {
    pub fn recency_policy(&self) -> RecencyPolicy {
        if self.strict_recency {
            RecencyPolicy::Strict
        } else {
            RecencyPolicy::Lenient
        }
    }
}

/// Top-level sections of `config.toml`.
pub const SECTIONS: [&str; 3] = ["store", "household", "planner"];

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    // Unset optionals: take JSON when it parses, text otherwise.
                    serde_json::Value::Null => serde_json::from_str(value)
                        .unwrap_or_else(|_| serde_json::Value::String(value.into())),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| failed(e.to_string()))
    }

    /// Check on-days and household names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let household = &self.household;
        for (key, on_days) in [
            ("household.primary_on_days", &household.primary_on_days),
            ("household.secondary_on_days", &household.secondary_on_days),
        ] {
            let mut seen = HashSet::new();
            for day in on_days.days() {
                if *day > 6 {
                    return Err(ConfigError::InvalidValue {
                        key: key.into(),
                        message: format!("weekday {day} is outside 0..=6"),
                    });
                }
                if !seen.insert(*day) {
                    return Err(ConfigError::InvalidValue {
                        key: key.into(),
                        message: format!("weekday {day} listed twice"),
                    });
                }
            }
        }
        if household.primary.trim().is_empty()
            || household.secondary.trim().is_empty()
            || household.primary == household.secondary
        {
            return Err(ConfigError::InvalidValue {
                key: "household.primary".into(),
                message: "the two household members need distinct, non-empty names".into(),
            });
        }
        let mut keys = HashSet::new();
        for slot in &household.slots {
            if slot.key == "meal" || !keys.insert(slot.key.as_str()) {
                return Err(ConfigError::InvalidValue {
                    key: "household.slots".into(),
                    message: format!("duplicate or reserved slot key '{}'", slot.key),
                });
            }
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Every dot-separated key that `get` and `set` accept, sorted per section.
    /// Arrays such as `household.slots` are a single key.
    pub fn keys(&self) -> Vec<String> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<String>) {
            match value.as_object() {
                Some(obj) => {
                    for (name, child) in obj {
                        let key = if prefix.is_empty() {
                            name.clone()
                        } else {
                            format!("{prefix}.{name}")
                        };
                        walk(&key, child, out);
                    }
                }
                None => out.push(prefix.to_string()),
            }
        }

        let mut keys = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut keys);
        }
        keys
    }

    /// What to tell the user about a key that `get` or `set` rejected.
    pub fn key_hint(&self, key: &str) -> String {
        let section = key.split('.').next().unwrap_or_default();
        if !SECTIONS.contains(&section) {
            return format!("valid sections are {}", SECTIONS.join(", "));
        }
        let prefix = format!("{section}.");
        let keys: Vec<_> = self
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(&prefix))
            .collect();
        format!("keys in [{section}] are {}", keys.join(", "))
    }

    /// Set a config value by key, validate, and persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// the result does not validate, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Set a config value in memory only.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}
