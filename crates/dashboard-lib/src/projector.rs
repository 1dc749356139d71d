//! Projection of raw pod records into render-ready display state

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{PodRecord, PodResources, UserTier};

/// Gauge value at or above which a resource is flagged critical.
const CRITICAL_PERCENT: f64 = 90.0;

/// Tone bucket for a pod status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Success,
    Warning,
    Failure,
}

impl StatusTone {
    /// Classify a raw status string. Anything that is neither running nor
    /// crash-looping falls into the warning bucket.
    pub fn for_status(status: &str) -> Self {
        match status {
            "Running" => StatusTone::Success,
            "CrashLoopBackOff" => StatusTone::Failure,
            _ => StatusTone::Warning,
        }
    }

    /// Badge color for renderers that draw with CSS colors.
    pub fn hex(&self) -> &'static str {
        match self {
            StatusTone::Success => "#155724",
            StatusTone::Failure => "#721c24",
            StatusTone::Warning => "#856404",
        }
    }
}

/// Per-tier user counts for one pod.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub light: usize,
    pub medium: usize,
    pub heavy: usize,
}

/// Render-ready view of a pod record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPod {
    pub name: String,
    pub status: String,
    pub tone: StatusTone,
    /// Status text plus the restart count once the pod has restarted.
    pub status_label: String,
    pub restarts: u32,
    pub last_error: Option<String>,
    /// Seconds until the announced restart, rounded up; 0 when none is
    /// pending.
    pub restart_in_secs: u64,
    pub users: TierCounts,
    pub total_users: usize,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub cpu_critical: bool,
    pub memory_critical: bool,
    pub resources: PodResources,
}

/// Project one pod record into display state.
///
/// Pure: the same record and `now` always produce the same output.
pub fn project(pod: &PodRecord, now: DateTime<Utc>) -> DisplayPod {
    let tone = StatusTone::for_status(&pod.status);

    let status_label = if pod.restarts > 0 {
        format!("{} (Restarts: {})", pod.status, pod.restarts)
    } else {
        pod.status.clone()
    };

    let restart_in_secs = pod
        .restarting_at
        .map(|at| remaining_secs(at, now))
        .unwrap_or(0);

    let mut users = TierCounts::default();
    for user in &pod.active_users {
        match user.tier {
            UserTier::Light => users.light += 1,
            UserTier::Medium => users.medium += 1,
            UserTier::Heavy => users.heavy += 1,
            UserTier::Unknown => {}
        }
    }

    let cpu = pod.metrics.cpu;
    let memory = pod.metrics.memory;

    DisplayPod {
        name: pod.name.clone(),
        status: pod.status.clone(),
        tone,
        status_label,
        restarts: pod.restarts,
        last_error: pod.last_error.clone(),
        restart_in_secs,
        users,
        total_users: pod.active_users.len(),
        cpu_percent: cpu.unwrap_or(0.0),
        memory_percent: memory.unwrap_or(0.0),
        cpu_critical: cpu.map_or(false, |v| v >= CRITICAL_PERCENT),
        memory_critical: memory.map_or(false, |v| v >= CRITICAL_PERCENT),
        resources: pod.resources.clone(),
    }
}

/// Whole seconds until `at`, rounded up; 0 once `at` has passed.
fn remaining_secs(at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let ms = (at - now).num_milliseconds();
    if ms <= 0 {
        0
    } else {
        ((ms + 999) / 1000) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActiveUser, PodMetrics, ResourceSpec};
    use chrono::Duration;

    fn test_pod(status: &str) -> PodRecord {
        PodRecord {
            name: "pod-1".to_string(),
            status: status.to_string(),
            restarts: 0,
            last_error: None,
            restarting_at: None,
            active_users: Vec::new(),
            metrics: PodMetrics::default(),
            resources: PodResources {
                requests: ResourceSpec {
                    cpu: "1000m".to_string(),
                    memory: "4Gi".to_string(),
                },
                limits: ResourceSpec {
                    cpu: "4000m".to_string(),
                    memory: "5Gi".to_string(),
                },
            },
        }
    }

    fn users(tiers: &[UserTier]) -> Vec<ActiveUser> {
        tiers.iter().map(|&tier| ActiveUser { tier }).collect()
    }

    #[test]
    fn test_running_pod_gets_success_tone() {
        let display = project(&test_pod("Running"), Utc::now());
        assert_eq!(display.tone, StatusTone::Success);
        assert_eq!(display.status_label, "Running");
        assert_eq!(display.restart_in_secs, 0);
    }

    #[test]
    fn test_unknown_status_gets_warning_tone() {
        let display = project(&test_pod("Pending"), Utc::now());
        assert_eq!(display.tone, StatusTone::Warning);
    }

    #[test]
    fn test_crashloop_pod_with_pending_restart() {
        let now = Utc::now();
        let mut pod = test_pod("CrashLoopBackOff");
        pod.restarts = 3;
        pod.last_error = Some("OOMKilled".to_string());
        pod.restarting_at = Some(now + Duration::milliseconds(5000));

        let display = project(&pod, now);
        assert_eq!(display.tone, StatusTone::Failure);
        assert_eq!(display.status_label, "CrashLoopBackOff (Restarts: 3)");
        assert_eq!(display.restart_in_secs, 5);
        assert_eq!(display.last_error.as_deref(), Some("OOMKilled"));
    }

    #[test]
    fn test_countdown_rounds_up() {
        let now = Utc::now();
        let mut pod = test_pod("CrashLoopBackOff");
        pod.restarting_at = Some(now + Duration::milliseconds(4200));

        let display = project(&pod, now);
        assert_eq!(display.restart_in_secs, 5);
    }

    #[test]
    fn test_countdown_zero_once_past() {
        let now = Utc::now();
        let mut pod = test_pod("Running");
        pod.restarting_at = Some(now - Duration::milliseconds(100));

        let display = project(&pod, now);
        assert_eq!(display.restart_in_secs, 0);
    }

    #[test]
    fn test_tier_counts_ignore_unknown() {
        let mut pod = test_pod("Running");
        pod.active_users = users(&[
            UserTier::Light,
            UserTier::Light,
            UserTier::Heavy,
            UserTier::Unknown,
        ]);

        let display = project(&pod, Utc::now());
        assert_eq!(display.users.light, 2);
        assert_eq!(display.users.medium, 0);
        assert_eq!(display.users.heavy, 1);
        assert_eq!(display.total_users, 4);
    }

    #[test]
    fn test_missing_metrics_render_zero_without_critical() {
        let display = project(&test_pod("Running"), Utc::now());
        assert_eq!(display.cpu_percent, 0.0);
        assert_eq!(display.memory_percent, 0.0);
        assert!(!display.cpu_critical);
        assert!(!display.memory_critical);
    }

    #[test]
    fn test_critical_flag_at_threshold() {
        let mut pod = test_pod("Running");
        pod.metrics = PodMetrics {
            cpu: Some(90.0),
            memory: Some(89.9),
        };

        let display = project(&pod, Utc::now());
        assert!(display.cpu_critical);
        assert!(!display.memory_critical);
        assert_eq!(display.cpu_percent, 90.0);
        assert_eq!(display.memory_percent, 89.9);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let now = Utc::now();
        let mut pod = test_pod("CrashLoopBackOff");
        pod.restarts = 1;
        pod.restarting_at = Some(now + Duration::milliseconds(2500));
        pod.active_users = users(&[UserTier::Medium]);

        assert_eq!(project(&pod, now), project(&pod, now));
    }
}
