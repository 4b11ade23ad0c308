//! Chore catalog commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use weekplan_core::{Effort, Frequency, Recency, StoreBackend, Task};

use super::{open_session, report, today};

#[derive(Subcommand)]
pub enum TaskAction {
    /// List the chore catalog
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List chores due on a date
    Due {
        /// Reference date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show how due chores are split over the household
    Assign {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Add a chore to the catalog
    Add {
        /// Chore name
        name: String,
        /// weekly, monthly, quarterly, semiannual, yearly, every5years, oneoff
        /// (or the Dutch worksheet label)
        #[arg(long)]
        frequency: Frequency,
        /// low, medium or high (or laag, gemiddeld, hoog)
        #[arg(long)]
        effort: Effort,
    },
    /// Mark a chore as done today
    Complete {
        /// Chore name
        name: String,
    },
}

fn last_completed(task: &Task) -> String {
    match &task.last_completed {
        Recency::Never => "never".to_string(),
        Recency::On(date) => date.to_string(),
        Recency::Unreadable(raw) => format!("unreadable ({raw})"),
    }
}

pub fn run(
    action: TaskAction,
    backend: Option<StoreBackend>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(backend)?;

    match action {
        TaskAction::List { json } => {
            let tasks = session.load_catalogs()?.tasks;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                for task in &tasks {
                    println!(
                        "{}\t{}\t{}\t{}",
                        task.name,
                        task.frequency,
                        task.effort,
                        last_completed(task)
                    );
                }
            }
        }
        TaskAction::Due { date } => {
            for task in session.due_tasks(date.unwrap_or_else(today))? {
                println!("{}\t{}", task.name, task.effort);
            }
        }
        TaskAction::Assign { date } => {
            let plan = session.assignment(date.unwrap_or_else(today))?;
            for (person, tasks) in &plan {
                let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
                if names.is_empty() {
                    println!("{person}: -");
                } else {
                    println!("{person}: {}", names.join(", "));
                }
            }
        }
        TaskAction::Add { name, frequency, effort } => {
            let outcome = session.add_task(&name, frequency, effort)?;
            report(outcome, &format!("chore '{name}'"));
        }
        TaskAction::Complete { name } => {
            let outcome = session.complete_task(&name, today())?;
            report(outcome, &format!("chore '{name}'"));
        }
    }
    Ok(())
}
