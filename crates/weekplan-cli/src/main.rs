use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use weekplan_core::StoreBackend;

mod commands;

#[derive(Parser)]
#[command(name = "weekplan", version, about = "Household week planner")]
struct Cli {
    /// Store backend: memory, workbook or sheets (default: store.backend from config)
    #[arg(long, global = true)]
    store: Option<StoreBackend>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Week plan: show / regenerate / archive
    Week {
        #[command(subcommand)]
        action: commands::week::WeekAction,
    },
    /// Edit a planned day
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
    /// Chore catalog management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Meal catalog management
    Meal {
        #[command(subcommand)]
        action: commands::meal::MealAction,
    },
    /// Activity catalog management
    Activity {
        #[command(subcommand)]
        action: commands::activity::ActivityAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Spreadsheet credentials
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("weekplan=warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let backend = cli.store;
    let result = match cli.command {
        Commands::Week { action } => commands::week::run(action, backend),
        Commands::Day { action } => commands::day::run(action, backend),
        Commands::Task { action } => commands::task::run(action, backend),
        Commands::Meal { action } => commands::meal::run(action, backend),
        Commands::Activity { action } => commands::activity::run(action, backend),
        Commands::Config { action } => commands::config::run(action),
        Commands::Auth { action } => commands::auth::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
