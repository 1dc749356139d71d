//! Autoscaling simulator dashboard CLI
//!
//! A command-line dashboard for the cluster autoscaling simulator:
//! start/stop the simulation, edit its configuration, and watch the
//! live telemetry stream in the terminal.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{simulation, watch};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Autoscaling Simulator Dashboard CLI
#[derive(Parser)]
#[command(name = "scalesim")]
#[command(author, version, about = "Dashboard for the autoscaling simulator", long_about = None)]
pub struct Cli {
    /// Control API base URL (can also be set via SCALESIM_API_URL env var)
    #[arg(long, env = "SCALESIM_API_URL")]
    pub api_url: Option<String>,

    /// Telemetry stream URL (can also be set via SCALESIM_STREAM_URL env var)
    #[arg(long, env = "SCALESIM_STREAM_URL")]
    pub stream_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the current simulation status
    Status,

    /// Start the simulation
    Start,

    /// Stop the simulation
    Stop,

    /// View or edit the simulation configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Attach to the telemetry stream and render the live dashboard
    Watch {
        /// Stop watching after this many seconds
        #[arg(long)]
        duration: Option<u64>,

        /// Render charts with the dark color scheme
        #[arg(long)]
        dark: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,

    /// Set a single configuration field by its dotted path
    Set {
        /// Field path, e.g. userResources.cpu
        path: String,

        /// New value for the field
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(fmt::layer().with_target(false))
        .init();

    let settings = config::CliSettings::load(cli.api_url, cli.stream_url)?;

    match cli.command {
        Commands::Status => simulation::status(&settings, cli.format).await?,
        Commands::Start => simulation::start(&settings).await?,
        Commands::Stop => simulation::stop(&settings).await?,
        Commands::Config(command) => match command {
            ConfigCommands::Show => commands::config::show(&settings, cli.format).await?,
            ConfigCommands::Set { path, value } => {
                commands::config::set(&settings, &path, &value, cli.format).await?
            }
        },
        Commands::Watch { duration, dark } => watch::run(&settings, duration, dark).await?,
    }

    Ok(())
}
