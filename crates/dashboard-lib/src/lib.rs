//! Dashboard library for the autoscaling simulator
//!
//! This crate provides the core functionality for:
//! - Telemetry ingestion from the simulation push stream
//! - Time-series accumulation for chart rendering
//! - Pod record projection into display state
//! - Simulation configuration editing
//! - Control API communication

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod models;
pub mod projector;
pub mod stream;

pub use client::ControlClient;
pub use config::{ConfigEditor, LoadPattern, SimulationConfig};
pub use controller::{Dashboard, DashboardSettings, Snapshot, Update};
pub use error::DashboardError;
pub use history::{ChartSink, MetricsHistory};
pub use models::*;
pub use projector::{project, DisplayPod, StatusTone, TierCounts};
pub use stream::{ConnectionState, SocketEvent, StreamConfig, StreamManager, StreamUpdate};
