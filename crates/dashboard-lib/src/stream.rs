//! Push-stream connection management
//!
//! This module owns the lifecycle of the telemetry connection:
//! - connect and read frames from the simulation WebSocket
//! - decode frames into samples
//! - detect failures and schedule a single delayed reconnect
//!
//! The state machine lives in [`StreamManager::handle`]; the socket and
//! timer tasks only emit [`SocketEvent`]s and never touch manager state.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, info, warn};

use crate::error::DashboardError;
use crate::models::Sample;

/// Delay before a closed connection is retried.
const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(2000);

/// Configuration for the push-stream connection.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// WebSocket endpoint of the telemetry stream.
    pub endpoint: String,
    /// Delay before a closed connection is retried.
    pub reconnect_delay: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://localhost:5000".to_string(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

/// Lifecycle state of the push connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Open,
    Reconnecting,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Reconnecting => "reconnecting",
        };
        f.write_str(s)
    }
}

/// Raw event emitted by the socket or timer tasks.
#[derive(Debug)]
pub enum SocketEvent {
    Opened,
    Frame(String),
    TransportError(String),
    Closed,
    RetryElapsed,
}

/// Decoded verdict on one socket event.
#[derive(Debug)]
pub enum StreamUpdate {
    /// Nothing user-visible changed.
    None,
    /// The connection state changed.
    StateChanged(ConnectionState),
    /// A telemetry sample arrived.
    Sample(Sample),
    /// A fault to surface; the connection keeps running.
    Fault(DashboardError),
}

/// Owns the push-connection lifecycle.
///
/// All mutable connection state lives on this instance; there is no
/// ambient handle. At most one socket task and one retry timer exist at
/// any time.
pub struct StreamManager {
    config: StreamConfig,
    state: ConnectionState,
    run_state: Arc<AtomicBool>,
    events: mpsc::UnboundedSender<SocketEvent>,
    socket_task: Option<JoinHandle<()>>,
    retry_timer: Option<JoinHandle<()>>,
}

impl StreamManager {
    /// Create a manager. `run_state` gates whether a closed connection is
    /// retried; only the controller writes it.
    pub fn new(
        config: StreamConfig,
        run_state: Arc<AtomicBool>,
        events: mpsc::UnboundedSender<SocketEvent>,
    ) -> Self {
        Self {
            config,
            state: ConnectionState::Disconnected,
            run_state,
            events,
            socket_task: None,
            retry_timer: None,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether a reconnect timer is pending.
    pub fn retry_pending(&self) -> bool {
        self.retry_timer.is_some()
    }

    /// Open the connection. No-op while the connection is already open.
    pub fn start(&mut self) {
        if self.state == ConnectionState::Open {
            debug!("Stream already open, ignoring start");
            return;
        }

        self.cancel_retry();
        if let Some(task) = self.socket_task.take() {
            task.abort();
        }

        info!(endpoint = %self.config.endpoint, "Opening telemetry stream");
        let endpoint = self.config.endpoint.clone();
        let events = self.events.clone();
        self.socket_task = Some(tokio::spawn(run_socket(endpoint, events)));
        self.state = ConnectionState::Connecting;
    }

    /// Close the connection and cancel any pending reconnect.
    ///
    /// Idempotent; the only way to suppress reconnection.
    pub fn stop(&mut self) {
        self.cancel_retry();
        if let Some(task) = self.socket_task.take() {
            task.abort();
            info!("Telemetry stream closed");
        }
        self.state = ConnectionState::Disconnected;
    }

    /// Advance the state machine with one raw socket event.
    pub fn handle(&mut self, event: SocketEvent) -> StreamUpdate {
        match event {
            SocketEvent::Opened => {
                info!("Telemetry stream open");
                self.state = ConnectionState::Open;
                StreamUpdate::StateChanged(self.state)
            }
            SocketEvent::Frame(text) => match serde_json::from_str::<Sample>(&text) {
                Ok(sample) => StreamUpdate::Sample(sample),
                Err(e) => {
                    warn!(error = %e, "Dropping undecodable telemetry frame");
                    StreamUpdate::Fault(DashboardError::Decode(e))
                }
            },
            SocketEvent::TransportError(message) => {
                // The read loop runs to its natural end; the close event
                // decides what happens next.
                warn!(error = %message, "Stream transport error");
                StreamUpdate::Fault(DashboardError::Connection(message))
            }
            SocketEvent::Closed => {
                self.socket_task = None;
                if self.run_state.load(Ordering::SeqCst) {
                    self.schedule_retry();
                    self.state = ConnectionState::Reconnecting;
                } else {
                    info!("Telemetry stream closed, run flag down");
                    self.state = ConnectionState::Disconnected;
                }
                StreamUpdate::StateChanged(self.state)
            }
            SocketEvent::RetryElapsed => {
                self.retry_timer = None;
                if self.state == ConnectionState::Reconnecting {
                    info!("Reconnect delay elapsed, retrying");
                    self.start();
                    StreamUpdate::StateChanged(self.state)
                } else {
                    // A cancelled timer raced its event into the queue.
                    StreamUpdate::None
                }
            }
        }
    }

    fn schedule_retry(&mut self) {
        if self.retry_timer.is_some() {
            return;
        }

        let delay = self.config.reconnect_delay;
        info!(delay_ms = delay.as_millis() as u64, "Scheduling stream reconnect");
        let events = self.events.clone();
        self.retry_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(SocketEvent::RetryElapsed);
        }));
    }

    fn cancel_retry(&mut self) {
        if let Some(timer) = self.retry_timer.take() {
            timer.abort();
            debug!("Cancelled pending reconnect timer");
        }
    }
}

impl Drop for StreamManager {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Socket task: connect, forward frames, report the close.
async fn run_socket(endpoint: String, events: mpsc::UnboundedSender<SocketEvent>) {
    let mut socket = match connect_async(endpoint.as_str()).await {
        Ok((socket, _response)) => socket,
        Err(e) => {
            let _ = events.send(SocketEvent::TransportError(e.to_string()));
            let _ = events.send(SocketEvent::Closed);
            return;
        }
    };

    if events.send(SocketEvent::Opened).is_err() {
        return;
    }

    while let Some(frame) = socket.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if events.send(SocketEvent::Frame(text)).is_err() {
                    return;
                }
            }
            Ok(Message::Close(_)) => break,
            // ping/pong/binary carry no telemetry
            Ok(_) => {}
            Err(e) => {
                let _ = events.send(SocketEvent::TransportError(e.to_string()));
                break;
            }
        }
    }

    let _ = events.send(SocketEvent::Closed);
}
