use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod config;
mod notify_cmd;
mod orchestrator;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "nudge",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("NUDGE_BUILD_SHA"), ")"),
    about = "Task check-in notification planner"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins if set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Compute as if it were this instant (RFC3339), instead of the wall clock
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: notify_cmd::NotifyCommand,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let home = state::Home::resolve()?;
    let clock = notify_cmd::clock_from(cli.now);
    notify_cmd::run(cli.command, &home, clock)
}
