//! Layered CLI settings: flags, environment, settings file, defaults

use anyhow::{Context, Result};
use dashboard_lib::DashboardSettings;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// CLI settings resolved from flags, environment, and the settings file.
#[derive(Debug, Clone, Deserialize)]
pub struct CliSettings {
    /// Control API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Telemetry stream URL
    #[serde(default = "default_stream_url")]
    pub stream_url: String,

    /// Delay before a closed stream is retried, in milliseconds
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

fn default_api_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_stream_url() -> String {
    "ws://localhost:5000".to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    2000
}

impl CliSettings {
    /// Resolve settings. Explicit flags win over the environment, which
    /// wins over the settings file, which wins over defaults.
    pub fn load(api_url: Option<String>, stream_url: Option<String>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = Self::settings_path() {
            if path.exists() {
                debug!(path = %path.display(), "Loading CLI settings file");
                builder = builder.add_source(config::File::from(path));
            }
        }

        let loaded = builder
            .add_source(config::Environment::with_prefix("SCALESIM"))
            .build()
            .context("Failed to load CLI settings")?;

        let mut settings: CliSettings = loaded.try_deserialize().unwrap_or_else(|_| CliSettings {
            api_url: default_api_url(),
            stream_url: default_stream_url(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
        });

        if let Some(url) = api_url {
            settings.api_url = url;
        }
        if let Some(url) = stream_url {
            settings.stream_url = url;
        }

        Ok(settings)
    }

    /// Connection settings for a dashboard session.
    pub fn dashboard(&self) -> DashboardSettings {
        DashboardSettings {
            api_url: self.api_url.clone(),
            stream_url: self.stream_url.clone(),
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
        }
    }

    /// Settings file path (~/.config/scalesim/config.json).
    fn settings_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("scalesim").join("config.json"))
    }
}
