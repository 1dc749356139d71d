//! Dashboard composition root
//!
//! Owns the run flag and the combined exposed state, issues control
//! commands, and pumps socket events through the stream manager strictly
//! in arrival order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::client::ControlClient;
use crate::config::{ConfigEditor, SimulationConfig};
use crate::error::DashboardError;
use crate::history::MetricsHistory;
use crate::models::Sample;
use crate::projector::{project, DisplayPod};
use crate::stream::{ConnectionState, SocketEvent, StreamConfig, StreamManager, StreamUpdate};

/// Connection settings for a dashboard session.
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    /// Base address of the control API.
    pub api_url: String,
    /// WebSocket endpoint of the telemetry stream.
    pub stream_url: String,
    /// Delay before a closed stream is retried.
    pub reconnect_delay: Duration,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            stream_url: "ws://localhost:5000".to_string(),
            reconnect_delay: Duration::from_millis(2000),
        }
    }
}

/// Coarse result of pumping one socket event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// New telemetry was applied to pods and history.
    Telemetry,
    /// The stream connection changed state.
    Connection(ConnectionState),
    /// A transient fault was recorded in the error slot.
    Fault(String),
}

/// Borrowed view of the combined dashboard state.
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub running: bool,
    pub connection: ConnectionState,
    pub pods: &'a [DisplayPod],
    pub history: &'a MetricsHistory,
    pub config: &'a SimulationConfig,
    pub last_error: Option<&'a str>,
}

/// Dashboard session over one backend.
pub struct Dashboard {
    client: ControlClient,
    stream: StreamManager,
    events: mpsc::UnboundedReceiver<SocketEvent>,
    run_state: Arc<AtomicBool>,
    history: MetricsHistory,
    pods: Vec<DisplayPod>,
    config: SimulationConfig,
    last_error: Option<String>,
}

impl Dashboard {
    /// Connect to the backend: fetch the configuration and run status,
    /// and attach to the stream when a simulation is already running.
    pub async fn connect(settings: DashboardSettings) -> Result<Self, DashboardError> {
        let client = ControlClient::new(&settings.api_url)?;
        let config = client.fetch_config().await?;
        let status = client.fetch_status().await?;

        let run_state = Arc::new(AtomicBool::new(status.is_running));
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let stream_config = StreamConfig {
            endpoint: settings.stream_url,
            reconnect_delay: settings.reconnect_delay,
        };
        let mut stream = StreamManager::new(stream_config, run_state.clone(), events_tx);

        if status.is_running {
            info!("Simulation already running, attaching to stream");
            stream.start();
        }

        Ok(Self {
            client,
            stream,
            events: events_rx,
            run_state,
            history: MetricsHistory::new(),
            pods: Vec::new(),
            config,
            last_error: None,
        })
    }

    /// Start a simulation run.
    ///
    /// On success the previous run's history and pod list are cleared
    /// before the stream opens. On failure the run flag stays down.
    pub async fn start(&mut self) -> Result<(), DashboardError> {
        if let Err(e) = self.client.start_simulation().await {
            self.last_error = Some(e.to_string());
            return Err(e);
        }

        self.run_state.store(true, Ordering::SeqCst);
        self.history.reset();
        self.pods.clear();
        self.last_error = None;
        self.stream.start();
        info!("Simulation started");
        Ok(())
    }

    /// Stop the simulation run.
    ///
    /// The run flag drops and the stream closes even when the stop call
    /// itself fails; the failure is still surfaced.
    pub async fn stop(&mut self) -> Result<(), DashboardError> {
        let result = self.client.stop_simulation().await;

        self.run_state.store(false, Ordering::SeqCst);
        self.stream.stop();

        match result {
            Ok(()) => {
                info!("Simulation stopped");
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Persist an edited configuration.
    ///
    /// The canonical configuration is replaced only once the backend
    /// accepts the new document.
    pub async fn save_config(&mut self, draft: SimulationConfig) -> Result<(), DashboardError> {
        if let Err(e) = self.client.save_config(&draft).await {
            self.last_error = Some(e.to_string());
            return Err(e);
        }

        self.config = draft;
        info!("Configuration saved");
        Ok(())
    }

    /// Open an edit session over a copy of the canonical configuration.
    pub fn edit_config(&self) -> ConfigEditor {
        ConfigEditor::new(self.config.clone())
    }

    /// Pump the next socket event.
    ///
    /// Events are processed strictly in arrival order; a sample's append
    /// and projection complete before the next event is read. Returns
    /// `None` when the event channel is gone.
    pub async fn next_change(&mut self) -> Option<Update> {
        loop {
            let event = self.events.recv().await?;
            match self.stream.handle(event) {
                StreamUpdate::Sample(sample) => {
                    self.apply_sample(sample);
                    return Some(Update::Telemetry);
                }
                StreamUpdate::StateChanged(state) => return Some(Update::Connection(state)),
                StreamUpdate::Fault(e) => {
                    let message = e.to_string();
                    warn!(error = %message, "Recorded dashboard fault");
                    self.last_error = Some(message.clone());
                    return Some(Update::Fault(message));
                }
                StreamUpdate::None => continue,
            }
        }
    }

    fn apply_sample(&mut self, sample: Sample) {
        let now = Utc::now();
        self.history.append(&sample);
        self.pods = sample.pods.iter().map(|pod| project(pod, now)).collect();
    }

    /// Combined state for the rendering layer.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            running: self.run_state.load(Ordering::SeqCst),
            connection: self.stream.state(),
            pods: &self.pods,
            history: &self.history,
            config: &self.config,
            last_error: self.last_error.as_deref(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.run_state.load(Ordering::SeqCst)
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.stream.state()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn history(&self) -> &MetricsHistory {
        &self.history
    }

    pub fn pods(&self) -> &[DisplayPod] {
        &self.pods
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
