//! Patchbay CLI
//!
//! Replays a routing scenario (subscriptions, listeners, engine events)
//! through a hub and prints which listener received what.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod scenario;

use scenario::Scenario;

#[derive(Parser)]
#[command(name = "patchbay")]
#[command(about = "Replay Patchbay routing scenarios")]
#[command(version)]
struct Cli {
    /// Scenario file (TOML)
    scenario: PathBuf,

    /// Override the hub name from the scenario
    #[arg(short, long)]
    name: Option<String>,

    /// Log every inbound event
    #[arg(short = 'e', long)]
    log_events: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut scenario = Scenario::load(&cli.scenario)?;
    if let Some(name) = cli.name {
        scenario.hub.name = name;
    }
    scenario.hub.log_events |= cli.log_events;

    tracing::info!(
        hub = %scenario.hub.name,
        listeners = scenario.listeners.len(),
        events = scenario.events.len(),
        "replaying {}",
        cli.scenario.display()
    );

    for line in scenario::run(scenario) {
        println!("{}", line);
    }

    Ok(())
}
