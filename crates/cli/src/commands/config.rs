//! Configuration commands

use anyhow::Result;
use dashboard_lib::{ConfigEditor, ControlClient};

use crate::config::CliSettings;
use crate::output::{self, OutputFormat};

/// Show the current simulation configuration
pub async fn show(settings: &CliSettings, format: OutputFormat) -> Result<()> {
    let client = ControlClient::new(&settings.api_url)?;
    let config = client.fetch_config().await?;
    output::print_config(&config, format);
    Ok(())
}

/// Set a single configuration field and persist the result
pub async fn set(
    settings: &CliSettings,
    path: &str,
    value: &str,
    format: OutputFormat,
) -> Result<()> {
    let client = ControlClient::new(&settings.api_url)?;
    let current = client.fetch_config().await?;

    let mut editor = ConfigEditor::new(current);
    editor.set(path, value)?;
    let committed = editor.commit();

    client.save_config(&committed).await?;
    output::print_success(&format!("Set {} = {}", path, value));
    output::print_config(&committed, format);
    Ok(())
}
