use clap::Subcommand;
use weekplan_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting, or a whole section as JSON
    Get {
        /// Key such as "store.backend", "household.primary_on_days" or "planner.seed"
        key: String,
    },
    /// Change one setting in config.toml
    Set {
        /// Key such as "store.spreadsheet_id" or "planner.shuffle"
        key: String,
        /// New value; lists and slots are given as JSON
        value: String,
    },
    /// Print the store, household and planner sections as JSON
    List,
    /// Write the default household back to config.toml
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(unknown_key(&config, &key)),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            match config.set(&key, &value) {
                Ok(()) => println!("{key} = {value}"),
                Err(ConfigError::UnknownKey(_)) => return Err(unknown_key(&config, &key)),
                Err(e) => return Err(e.into()),
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset; household and worksheets are back to defaults");
        }
    }
    Ok(())
}

fn unknown_key(config: &Config, key: &str) -> Box<dyn std::error::Error> {
    format!("unknown config key '{key}'; {}", config.key_hint(key)).into()
}
