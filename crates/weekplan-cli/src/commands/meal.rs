use clap::Subcommand;
use weekplan_core::StoreBackend;

use super::{open_session, report};

#[derive(Subcommand)]
pub enum MealAction {
    /// Add a meal to the meal catalog
    Add {
        /// Meal name
        name: String,
    },
}

pub fn run(
    action: MealAction,
    backend: Option<StoreBackend>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(backend)?;

    match action {
        MealAction::Add { name } => {
            let outcome = session.add_meal(&name)?;
            report(outcome, &format!("meal '{name}'"));
        }
    }
    Ok(())
}
