//! Simulation configuration model
//!
//! The backend persists a nested configuration document. Every leaf
//! carries its own default, so a partial document always loads into a
//! fully populated structure. Edits go through [`ConfigEditor`], which
//! works on a copy and resolves dotted wire paths against the fixed shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

/// Simulation configuration as persisted by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    #[serde(default)]
    pub pod_resources: PodResourcesConfig,
    #[serde(default = "default_min_replicas")]
    pub min_replicas: u32,
    #[serde(default = "default_max_replicas")]
    pub max_replicas: u32,
    #[serde(default = "default_threshold")]
    pub cpu_threshold: u32,
    #[serde(default = "default_threshold")]
    pub memory_threshold: u32,
    #[serde(default)]
    pub user_resources: UserResources,
    #[serde(default)]
    pub default_load_profile: LoadProfile,
}

/// Kubernetes-style resource strings for pods created by the simulator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PodResourcesConfig {
    #[serde(default)]
    pub requests: ResourceRequests,
    #[serde(default)]
    pub limits: ResourceLimits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequests {
    #[serde(default = "default_request_cpu")]
    pub cpu: String,
    #[serde(default = "default_request_memory")]
    pub memory: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    #[serde(default = "default_limit_cpu")]
    pub cpu: String,
    #[serde(default = "default_limit_memory")]
    pub memory: String,
}

/// Resource footprint of a single simulated user, in percent of a pod.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserResources {
    #[serde(default = "default_user_cpu")]
    pub cpu: f64,
    #[serde(default = "default_user_memory")]
    pub memory: f64,
}

/// Parameters of the generated user-load curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadProfile {
    #[serde(default)]
    pub pattern: LoadPattern,
    #[serde(default = "default_max_users")]
    pub max_users: u32,
    #[serde(default = "default_base_load")]
    pub base_load: u32,
    #[serde(default = "default_amplitude")]
    pub amplitude: u32,
    #[serde(default = "default_period")]
    pub period: u32,
    #[serde(default = "default_user_growth_rate")]
    pub user_growth_rate: u32,
}

/// Shape of the generated user-load curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPattern {
    Linear,
    Sine,
    Spike,
    Sawtooth,
    Square,
    #[default]
    Random,
    Daily,
}

impl LoadPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadPattern::Linear => "linear",
            LoadPattern::Sine => "sine",
            LoadPattern::Spike => "spike",
            LoadPattern::Sawtooth => "sawtooth",
            LoadPattern::Square => "square",
            LoadPattern::Random => "random",
            LoadPattern::Daily => "daily",
        }
    }
}

impl fmt::Display for LoadPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(LoadPattern::Linear),
            "sine" => Ok(LoadPattern::Sine),
            "spike" => Ok(LoadPattern::Spike),
            "sawtooth" => Ok(LoadPattern::Sawtooth),
            "square" => Ok(LoadPattern::Square),
            "random" => Ok(LoadPattern::Random),
            "daily" => Ok(LoadPattern::Daily),
            _ => Err(format!("unknown load pattern {:?}", s)),
        }
    }
}

fn default_request_cpu() -> String {
    "1000m".to_string()
}

fn default_request_memory() -> String {
    "4Gi".to_string()
}

fn default_limit_cpu() -> String {
    "4000m".to_string()
}

fn default_limit_memory() -> String {
    "5Gi".to_string()
}

fn default_min_replicas() -> u32 {
    1
}

fn default_max_replicas() -> u32 {
    10
}

fn default_threshold() -> u32 {
    60
}

fn default_user_cpu() -> f64 {
    0.5
}

fn default_user_memory() -> f64 {
    1.0
}

fn default_max_users() -> u32 {
    1000
}

fn default_base_load() -> u32 {
    100
}

fn default_amplitude() -> u32 {
    200
}

fn default_period() -> u32 {
    10
}

fn default_user_growth_rate() -> u32 {
    200
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pod_resources: PodResourcesConfig::default(),
            min_replicas: default_min_replicas(),
            max_replicas: default_max_replicas(),
            cpu_threshold: default_threshold(),
            memory_threshold: default_threshold(),
            user_resources: UserResources::default(),
            default_load_profile: LoadProfile::default(),
        }
    }
}

impl Default for ResourceRequests {
    fn default() -> Self {
        Self {
            cpu: default_request_cpu(),
            memory: default_request_memory(),
        }
    }
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            cpu: default_limit_cpu(),
            memory: default_limit_memory(),
        }
    }
}

impl Default for UserResources {
    fn default() -> Self {
        Self {
            cpu: default_user_cpu(),
            memory: default_user_memory(),
        }
    }
}

impl Default for LoadProfile {
    fn default() -> Self {
        Self {
            pattern: LoadPattern::default(),
            max_users: default_max_users(),
            base_load: default_base_load(),
            amplitude: default_amplitude(),
            period: default_period(),
            user_growth_rate: default_user_growth_rate(),
        }
    }
}

impl SimulationConfig {
    /// Load a possibly partial configuration document, filling in the
    /// documented default for every omitted leaf.
    pub fn from_partial(raw: serde_json::Value) -> Result<Self, DashboardError> {
        serde_json::from_value(raw).map_err(DashboardError::Decode)
    }
}

/// Edit session over a configuration copy.
///
/// The editor never holds the canonical object; [`ConfigEditor::commit`]
/// hands the edited copy back for submission.
#[derive(Debug, Clone)]
pub struct ConfigEditor {
    draft: SimulationConfig,
}

impl ConfigEditor {
    pub fn new(current: SimulationConfig) -> Self {
        Self { draft: current }
    }

    /// Open an edit session from a raw configuration document.
    pub fn from_partial(raw: serde_json::Value) -> Result<Self, DashboardError> {
        Ok(Self::new(SimulationConfig::from_partial(raw)?))
    }

    pub fn get(&self) -> &SimulationConfig {
        &self.draft
    }

    /// Set a single leaf addressed by its dotted wire path.
    ///
    /// Paths use the wire spelling (`userResources.cpu`). Only the
    /// addressed leaf changes; every other field keeps its value.
    pub fn set(&mut self, path: &str, value: &str) -> Result<(), DashboardError> {
        let draft = &mut self.draft;
        match path {
            "podResources.requests.cpu" => draft.pod_resources.requests.cpu = value.to_string(),
            "podResources.requests.memory" => {
                draft.pod_resources.requests.memory = value.to_string()
            }
            "podResources.limits.cpu" => draft.pod_resources.limits.cpu = value.to_string(),
            "podResources.limits.memory" => draft.pod_resources.limits.memory = value.to_string(),
            "minReplicas" => draft.min_replicas = parse_leaf(path, value)?,
            "maxReplicas" => draft.max_replicas = parse_leaf(path, value)?,
            "cpuThreshold" => draft.cpu_threshold = parse_leaf(path, value)?,
            "memoryThreshold" => draft.memory_threshold = parse_leaf(path, value)?,
            "userResources.cpu" => draft.user_resources.cpu = parse_leaf(path, value)?,
            "userResources.memory" => draft.user_resources.memory = parse_leaf(path, value)?,
            "defaultLoadProfile.pattern" => {
                draft.default_load_profile.pattern =
                    value.parse().map_err(|reason| DashboardError::InvalidValue {
                        field: path.to_string(),
                        reason,
                    })?
            }
            "defaultLoadProfile.maxUsers" => {
                draft.default_load_profile.max_users = parse_leaf(path, value)?
            }
            "defaultLoadProfile.baseLoad" => {
                draft.default_load_profile.base_load = parse_leaf(path, value)?
            }
            "defaultLoadProfile.amplitude" => {
                draft.default_load_profile.amplitude = parse_leaf(path, value)?
            }
            "defaultLoadProfile.period" => {
                draft.default_load_profile.period = parse_leaf(path, value)?
            }
            "defaultLoadProfile.userGrowthRate" => {
                draft.default_load_profile.user_growth_rate = parse_leaf(path, value)?
            }
            _ => return Err(DashboardError::UnknownField(path.to_string())),
        }
        Ok(())
    }

    /// Finish the edit session and return the edited configuration.
    pub fn commit(self) -> SimulationConfig {
        self.draft
    }
}

fn parse_leaf<T>(field: &str, value: &str) -> Result<T, DashboardError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| DashboardError::InvalidValue {
            field: field.to_string(),
            reason: e.to_string(),
        })
}
