use chrono::NaiveDate;
use clap::Subcommand;
use weekplan_core::{DayRecord, StoreBackend};

use super::{open_session, today};

#[derive(Subcommand)]
pub enum WeekAction {
    /// Show the week plan, composing days not planned yet
    Show {
        /// First day of the week (YYYY-MM-DD, default: today)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Recompose all seven days from fresh catalog reads
    Regenerate {
        #[arg(long)]
        start: Option<NaiveDate>,
    },
    /// Save the week plan to the results worksheet
    Archive {
        #[arg(long)]
        start: Option<NaiveDate>,
    },
}

fn print_week(week: &[DayRecord], people: [&str; 2]) {
    for day in week {
        println!("{}", day.date);
        println!("  meal: {}", day.meal);
        for (person, task) in people.iter().zip([&day.primary_task, &day.secondary_task]) {
            if let Some(task) = task {
                println!("  chore {person}: {task}");
            }
        }
        for (slot, activity) in &day.activities {
            println!("  {slot}: {activity}");
        }
    }
}

pub fn run(
    action: WeekAction,
    backend: Option<StoreBackend>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(backend)?;

    match action {
        WeekAction::Show { start, json } => {
            let week = session.build_week(start.unwrap_or_else(today))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&week)?);
            } else {
                print_week(&week, session.config().household.people());
            }
        }
        WeekAction::Regenerate { start } => {
            let week = session.regenerate_week(start.unwrap_or_else(today))?;
            print_week(&week, session.config().household.people());
        }
        WeekAction::Archive { start } => {
            let start = start.unwrap_or_else(today);
            session.archive_week(start)?;
            println!("week of {start} archived");
        }
    }
    Ok(())
}
