//! Wire types pushed by the simulation backend
//!
//! Keep this module minimal and stable — it defines the wire format.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One telemetry push message. Immutable once decoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    #[serde(deserialize_with = "de_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub pods: Vec<PodRecord>,
    pub averages: Averages,
    pub total_users: u64,
}

/// Cluster-wide resource averages carried by a sample.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Averages {
    pub cpu: f64,
    pub memory: f64,
}

/// Raw state of a single simulated pod.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodRecord {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub restarts: u32,
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub restarting_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active_users: Vec<ActiveUser>,
    #[serde(default)]
    pub metrics: PodMetrics,
    pub resources: PodResources,
}

/// Resource gauges for one pod, as percentages.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PodMetrics {
    #[serde(default)]
    pub cpu: Option<f64>,
    #[serde(default)]
    pub memory: Option<f64>,
}

/// Requested and limited resources for one pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodResources {
    pub requests: ResourceSpec,
    pub limits: ResourceSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub cpu: String,
    pub memory: String,
}

/// A simulated user attached to a pod.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActiveUser {
    #[serde(rename = "type")]
    pub tier: UserTier,
}

/// Load classification of a simulated user.
///
/// Tier strings the backend may add later decode as [`UserTier::Unknown`]
/// rather than failing the whole sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserTier {
    Light,
    Medium,
    Heavy,
    #[serde(other)]
    Unknown,
}

/// Response of the simulation status endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStatus {
    pub is_running: bool,
}

/// The backend emits either RFC 3339 strings or epoch milliseconds.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
}

impl RawTimestamp {
    fn resolve(self) -> Result<DateTime<Utc>, String> {
        match self {
            RawTimestamp::Text(s) => s
                .parse::<DateTime<Utc>>()
                .map_err(|e| format!("invalid timestamp {:?}: {}", s, e)),
            RawTimestamp::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| format!("timestamp {} out of range", ms)),
        }
    }
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    RawTimestamp::deserialize(deserializer)?
        .resolve()
        .map_err(serde::de::Error::custom)
}

fn de_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawTimestamp>::deserialize(deserializer)?
        .map(RawTimestamp::resolve)
        .transpose()
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_sample() {
        let json = r#"{
            "timestamp": "2024-05-01T12:00:00Z",
            "pods": [{
                "name": "pod-1",
                "status": "Running",
                "restarts": 2,
                "lastError": "OOMKilled",
                "restartingAt": "2024-05-01T12:00:05Z",
                "activeUsers": [{"type": "light"}, {"type": "heavy"}],
                "metrics": {"cpu": 42.5, "memory": 61.0},
                "resources": {
                    "requests": {"cpu": "1000m", "memory": "4Gi"},
                    "limits": {"cpu": "4000m", "memory": "5Gi"}
                }
            }],
            "averages": {"cpu": 42.5, "memory": 61.0},
            "totalUsers": 2
        }"#;

        let sample: Sample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.total_users, 2);
        assert_eq!(sample.pods.len(), 1);

        let pod = &sample.pods[0];
        assert_eq!(pod.name, "pod-1");
        assert_eq!(pod.restarts, 2);
        assert_eq!(pod.last_error.as_deref(), Some("OOMKilled"));
        assert!(pod.restarting_at.is_some());
        assert_eq!(pod.active_users[0].tier, UserTier::Light);
        assert_eq!(pod.metrics.cpu, Some(42.5));
        assert_eq!(pod.resources.limits.memory, "5Gi");
    }

    #[test]
    fn test_decode_epoch_millis_timestamp() {
        let json = r#"{
            "timestamp": 1714564800000,
            "pods": [],
            "averages": {"cpu": 0.0, "memory": 0.0},
            "totalUsers": 0
        }"#;

        let sample: Sample = serde_json::from_str(json).unwrap();
        assert_eq!(
            sample.timestamp,
            Utc.timestamp_millis_opt(1_714_564_800_000).unwrap()
        );
    }

    #[test]
    fn test_optional_pod_fields_default() {
        let json = r#"{
            "name": "pod-2",
            "status": "Pending",
            "resources": {
                "requests": {"cpu": "1000m", "memory": "4Gi"},
                "limits": {"cpu": "4000m", "memory": "5Gi"}
            }
        }"#;

        let pod: PodRecord = serde_json::from_str(json).unwrap();
        assert_eq!(pod.restarts, 0);
        assert!(pod.last_error.is_none());
        assert!(pod.restarting_at.is_none());
        assert!(pod.active_users.is_empty());
        assert!(pod.metrics.cpu.is_none());
        assert!(pod.metrics.memory.is_none());
    }

    #[test]
    fn test_unknown_tier_is_tolerated() {
        let user: ActiveUser = serde_json::from_str(r#"{"type": "whale"}"#).unwrap();
        assert_eq!(user.tier, UserTier::Unknown);
    }

    #[test]
    fn test_status_flag_round_trip() {
        let status: SimulationStatus = serde_json::from_str(r#"{"isRunning": true}"#).unwrap();
        assert!(status.is_running);

        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("isRunning"));
    }
}
