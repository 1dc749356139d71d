//! Simulation control commands

use anyhow::Result;
use dashboard_lib::ControlClient;

use crate::config::CliSettings;
use crate::output::{self, OutputFormat};

/// Show the current simulation status
pub async fn status(settings: &CliSettings, format: OutputFormat) -> Result<()> {
    let client = ControlClient::new(&settings.api_url)?;
    let status = client.fetch_status().await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
        OutputFormat::Table => {
            if status.is_running {
                output::print_success("Simulation is running");
            } else {
                output::print_info("Simulation is stopped");
            }
        }
    }
    Ok(())
}

/// Start the simulation
pub async fn start(settings: &CliSettings) -> Result<()> {
    let client = ControlClient::new(&settings.api_url)?;
    client.start_simulation().await?;
    output::print_success("Simulation started");
    Ok(())
}

/// Stop the simulation
pub async fn stop(settings: &CliSettings) -> Result<()> {
    let client = ControlClient::new(&settings.api_url)?;
    client.stop_simulation().await?;
    output::print_success("Simulation stopped");
    Ok(())
}
