use chrono::NaiveDate;
use clap::Subcommand;
use weekplan_core::StoreBackend;

use super::open_session;

#[derive(Subcommand)]
pub enum DayAction {
    /// Change the meal or an activity of a planned day
    Edit {
        /// Date of the day (YYYY-MM-DD)
        date: NaiveDate,
        /// "meal" or an activity slot key (e.g. "lars")
        field: String,
        /// New value, taken from the matching catalog
        value: String,
    },
}

pub fn run(
    action: DayAction,
    backend: Option<StoreBackend>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(backend)?;

    match action {
        DayAction::Edit { date, field, value } => {
            let day = session.edit_day(date, &field, &value)?;
            println!("{}: {field} set to {value}", day.date);
        }
    }
    Ok(())
}
