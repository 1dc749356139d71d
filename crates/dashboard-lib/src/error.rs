//! Error types for the dashboard client

use thiserror::Error;

/// Errors surfaced by the dashboard pipeline.
///
/// Decode and connection faults are transient: they land in the
/// controller's error slot while the pipeline keeps running. Control
/// faults are returned to the caller so the action can be retried.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A push frame could not be decoded as a telemetry sample.
    #[error("failed to decode telemetry frame: {0}")]
    Decode(#[source] serde_json::Error),

    /// The push connection reported a transport failure.
    #[error("stream transport error: {0}")]
    Connection(String),

    /// A control API request failed.
    #[error("control request failed: {0}")]
    Control(String),

    /// The control API base address could not be parsed.
    #[error("invalid control endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// A configuration edit addressed a field path that does not exist.
    #[error("unknown configuration field: {0}")]
    UnknownField(String),

    /// A configuration edit carried a value the addressed leaf cannot hold.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
