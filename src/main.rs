mod commands;
mod notifier;
mod render;
mod session;
mod utils;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "unical")]
#[command(about = "Your action items and meetings on one month calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that opens the calendar.
#[derive(Args, Clone, Default)]
pub struct ViewArgs {
    /// Month to show (YYYY-MM), defaults to the current month
    #[arg(short, long)]
    month: Option<String>,

    /// Timezone to place meetings in (e.g. "local", "UTC", "Europe/Berlin", "-05:00")
    #[arg(long)]
    tz: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the month grid
    Month {
        #[command(flatten)]
        view: ViewArgs,

        /// Number of consecutive months to show
        #[arg(short, long, default_value_t = 1)]
        count: u32,

        /// Hide action items
        #[arg(long)]
        hide_tasks: bool,

        /// Hide meetings
        #[arg(long)]
        hide_meetings: bool,
    },
    /// List the month's items day by day
    Items {
        #[command(flatten)]
        view: ViewArgs,

        /// Print items as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the organization directory
    Companies {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Browse months interactively
    Browse {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Show config paths and effective settings
    Config,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("UNICAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Month {
            view,
            count,
            hide_tasks,
            hide_meetings,
        } => commands::month::run(&view, count, hide_tasks, hide_meetings).await,
        Commands::Items { view, json } => commands::items::run(&view, json).await,
        Commands::Companies { view } => commands::companies::run(&view).await,
        Commands::Browse { view } => commands::browse::run(&view).await,
        Commands::Config => commands::config::run(),
    }
}
