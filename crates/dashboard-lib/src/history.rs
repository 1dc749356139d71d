//! Append-only time-series history for the dashboard charts

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tracing::debug;

use crate::config::SimulationConfig;
use crate::models::Sample;

const USER_COUNT_COLOR: &str = "rgb(153, 102, 255)";
const POD_COUNT_COLOR: &str = "rgb(54, 162, 235)";
const CPU_COLOR: &str = "rgb(75, 192, 192)";
const MEMORY_COLOR: &str = "rgb(255, 99, 132)";

/// Rendering boundary for chart output.
///
/// `labels` and `values` always have equal length.
pub trait ChartSink {
    fn render(
        &mut self,
        title: &str,
        labels: &[String],
        values: &[f64],
        color: &str,
        y_axis_max: f64,
        dark_mode: bool,
    );
}

/// Parallel append-only series, one entry per received sample.
///
/// Index `i` refers to the same sample across every channel; entries keep
/// arrival order and are never truncated. Sequences grow for the lifetime
/// of the session; there is no eviction or windowing.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsHistory {
    timestamps: Vec<String>,
    cpu: Vec<f64>,
    memory: Vec<f64>,
    pod_count: Vec<usize>,
    user_count: Vec<u64>,
}

impl MetricsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one point per channel from a received sample.
    pub fn append(&mut self, sample: &Sample) {
        self.timestamps.push(time_label(&sample.timestamp));
        self.cpu.push(sample.averages.cpu);
        self.memory.push(sample.averages.memory);
        self.pod_count.push(sample.pods.len());
        self.user_count.push(sample.total_users);
        debug!(points = self.timestamps.len(), "Appended telemetry point");
    }

    /// Clear every channel. Called when a new run starts so stale history
    /// does not bleed into the new charts.
    pub fn reset(&mut self) {
        self.timestamps.clear();
        self.cpu.clear();
        self.memory.clear();
        self.pod_count.clear();
        self.user_count.clear();
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[String] {
        &self.timestamps
    }

    pub fn cpu(&self) -> &[f64] {
        &self.cpu
    }

    pub fn memory(&self) -> &[f64] {
        &self.memory
    }

    pub fn pod_count(&self) -> &[usize] {
        &self.pod_count
    }

    pub fn user_count(&self) -> &[u64] {
        &self.user_count
    }

    /// Emit the four standard charts into a sink.
    pub fn render_into(&self, sink: &mut dyn ChartSink, config: &SimulationConfig, dark_mode: bool) {
        let users: Vec<f64> = self.user_count.iter().map(|&v| v as f64).collect();
        let pods: Vec<f64> = self.pod_count.iter().map(|&v| v as f64).collect();

        sink.render(
            "Active Users",
            &self.timestamps,
            &users,
            USER_COUNT_COLOR,
            config.default_load_profile.max_users as f64,
            dark_mode,
        );
        sink.render(
            "Pod Count",
            &self.timestamps,
            &pods,
            POD_COUNT_COLOR,
            config.max_replicas as f64,
            dark_mode,
        );
        sink.render("CPU Usage", &self.timestamps, &self.cpu, CPU_COLOR, 100.0, dark_mode);
        sink.render(
            "Memory Usage",
            &self.timestamps,
            &self.memory,
            MEMORY_COLOR,
            100.0,
            dark_mode,
        );
    }
}

/// Local wall-clock label for a sample timestamp.
pub fn time_label(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M:%S").to_string()
}
