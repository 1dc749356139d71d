//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use dashboard_lib::{ChartSink, DisplayPod, SimulationConfig, StatusTone};
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Row for the pod table
#[derive(Tabled)]
struct PodRow {
    #[tabled(rename = "Pod")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Users L/M/H")]
    users: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Restart In")]
    restart_in: String,
    #[tabled(rename = "Requests")]
    requests: String,
    #[tabled(rename = "Limits")]
    limits: String,
}

/// Print the pod list
pub fn print_pods(pods: &[DisplayPod], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(pods) {
                println!("{}", json);
            }
        }
        OutputFormat::Table => {
            if pods.is_empty() {
                print_warning("No active pods");
                return;
            }
            let rows: Vec<PodRow> = pods.iter().map(pod_row).collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
    }
}

fn pod_row(pod: &DisplayPod) -> PodRow {
    PodRow {
        name: pod.name.clone(),
        status: tone_colored(&pod.status_label, pod.tone),
        users: format!("{}/{}/{}", pod.users.light, pod.users.medium, pod.users.heavy),
        cpu: gauge(pod.cpu_percent, pod.cpu_critical),
        memory: gauge(pod.memory_percent, pod.memory_critical),
        restart_in: if pod.restart_in_secs > 0 {
            format!("{}s", pod.restart_in_secs)
        } else {
            "-".to_string()
        },
        requests: format!(
            "{} / {}",
            pod.resources.requests.cpu, pod.resources.requests.memory
        ),
        limits: format!(
            "{} / {}",
            pod.resources.limits.cpu, pod.resources.limits.memory
        ),
    }
}

/// Color a status label by its tone
pub fn tone_colored(label: &str, tone: StatusTone) -> String {
    match tone {
        StatusTone::Success => label.green().to_string(),
        StatusTone::Warning => label.yellow().to_string(),
        StatusTone::Failure => label.red().to_string(),
    }
}

/// Format a percentage gauge, highlighting critical values
fn gauge(percent: f64, critical: bool) -> String {
    let text = format!("{:.1}%", percent);
    if critical {
        text.red().bold().to_string()
    } else {
        text
    }
}

/// Print the simulation configuration
pub fn print_config(config: &SimulationConfig, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(config) {
                println!("{}", json);
            }
        }
        OutputFormat::Table => {
            println!("{}", "Pod Resources".bold());
            println!(
                "  requests: {} CPU, {} memory",
                config.pod_resources.requests.cpu, config.pod_resources.requests.memory
            );
            println!(
                "  limits:   {} CPU, {} memory",
                config.pod_resources.limits.cpu, config.pod_resources.limits.memory
            );
            println!("{}", "Autoscaling".bold());
            println!("  replicas: {}..{}", config.min_replicas, config.max_replicas);
            println!(
                "  thresholds: cpu {}%, memory {}%",
                config.cpu_threshold, config.memory_threshold
            );
            println!("{}", "User Load".bold());
            println!(
                "  per-user: {}% CPU, {}% memory",
                config.user_resources.cpu, config.user_resources.memory
            );
            let profile = &config.default_load_profile;
            println!(
                "  profile: {} (max {}, base {}, amplitude {}, period {}, growth {})",
                profile.pattern,
                profile.max_users,
                profile.base_load,
                profile.amplitude,
                profile.period,
                profile.user_growth_rate
            );
        }
    }
}

const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// How many trailing points a sparkline shows
const SPARK_WINDOW: usize = 40;

/// Sparkline chart renderer for the terminal
pub struct SparklineSink;

impl ChartSink for SparklineSink {
    fn render(
        &mut self,
        title: &str,
        labels: &[String],
        values: &[f64],
        _color: &str,
        y_axis_max: f64,
        _dark_mode: bool,
    ) {
        let max = if y_axis_max > 0.0 { y_axis_max } else { 1.0 };
        let spark: String = values
            .iter()
            .rev()
            .take(SPARK_WINDOW)
            .rev()
            .map(|&v| {
                let top = (SPARKS.len() - 1) as f64;
                let idx = ((v / max) * top).clamp(0.0, top);
                SPARKS[idx as usize]
            })
            .collect();

        let latest = values.last().copied().unwrap_or(0.0);
        let when = labels.last().map(String::as_str).unwrap_or("-");
        println!("{:<14} {:<40} {:>8.1} (at {})", title.bold(), spark, latest, when);
    }
}
