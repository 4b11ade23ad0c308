use clap::Subcommand;
use weekplan_core::StoreBackend;

use super::{open_session, report};

#[derive(Subcommand)]
pub enum ActivityAction {
    /// Add an activity to a catalog
    Add {
        /// Slot key (e.g. "lise") or activity worksheet name
        catalog: String,
        /// Activity name
        name: String,
    },
}

pub fn run(
    action: ActivityAction,
    backend: Option<StoreBackend>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(backend)?;

    match action {
        ActivityAction::Add { catalog, name } => {
            let outcome = session.add_activity(&catalog, &name)?;
            report(outcome, &format!("activity '{name}'"));
        }
    }
    Ok(())
}
