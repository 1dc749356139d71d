//! Live dashboard view

use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use dashboard_lib::{Dashboard, Update};

use crate::config::CliSettings;
use crate::output::{self, OutputFormat, SparklineSink};

/// Attach to the telemetry stream and render updates until interrupted.
pub async fn run(settings: &CliSettings, duration: Option<u64>, dark: bool) -> Result<()> {
    let mut dashboard = Dashboard::connect(settings.dashboard()).await?;

    if !dashboard.is_running() {
        output::print_warning("No simulation is running; start one to see telemetry");
    }

    let started = tokio::time::Instant::now();
    let deadline = duration.map(Duration::from_secs);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                output::print_info("Interrupted");
                break;
            }
            _ = sleep_until_deadline(deadline, started) => break,
            update = dashboard.next_change() => match update {
                Some(Update::Telemetry) => render(&dashboard, dark),
                Some(Update::Connection(state)) => {
                    output::print_info(&format!("Stream {}", state));
                }
                Some(Update::Fault(message)) => output::print_error(&message),
                None => break,
            },
        }
    }

    Ok(())
}

async fn sleep_until_deadline(deadline: Option<Duration>, started: tokio::time::Instant) {
    match deadline {
        Some(total) => tokio::time::sleep_until(started + total).await,
        None => std::future::pending().await,
    }
}

fn render(dashboard: &Dashboard, dark: bool) {
    let snapshot = dashboard.snapshot();

    println!();
    println!(
        "{} — {} pods, {} samples",
        Local::now().format("%H:%M:%S"),
        snapshot.pods.len(),
        snapshot.history.len()
    );
    if let Some(error) = snapshot.last_error {
        output::print_error(error);
    }

    let mut sink = SparklineSink;
    snapshot.history.render_into(&mut sink, snapshot.config, dark);
    output::print_pods(snapshot.pods, OutputFormat::Table);
}
