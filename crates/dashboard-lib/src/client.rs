//! HTTP client for the simulation control API

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::SimulationConfig;
use crate::error::DashboardError;
use crate::models::SimulationStatus;

/// Client for the simulation control endpoints.
#[derive(Debug)]
pub struct ControlClient {
    client: Client,
    base_url: Url,
}

impl ControlClient {
    /// Create a new control client.
    pub fn new(base_url: &str) -> Result<Self, DashboardError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DashboardError::Control(format!("failed to create HTTP client: {}", e)))?;

        let base_url = Url::parse(base_url)?;
        Ok(Self { client, base_url })
    }

    /// Fetch the current simulation configuration.
    pub async fn fetch_config(&self) -> Result<SimulationConfig, DashboardError> {
        self.get("api/simulation/config").await
    }

    /// Fetch whether a simulation is currently running.
    pub async fn fetch_status(&self) -> Result<SimulationStatus, DashboardError> {
        self.get("api/simulation/status").await
    }

    /// Start the backend simulation.
    pub async fn start_simulation(&self) -> Result<(), DashboardError> {
        self.post_empty("api/simulation/start").await
    }

    /// Stop the backend simulation.
    pub async fn stop_simulation(&self) -> Result<(), DashboardError> {
        self.post_empty("api/simulation/stop").await
    }

    /// Persist a committed configuration.
    pub async fn save_config(&self, config: &SimulationConfig) -> Result<(), DashboardError> {
        self.post_json("api/simulation/config", config).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DashboardError> {
        let url = self.base_url.join(path)?;
        debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DashboardError::Control(e.to_string()))?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| DashboardError::Control(format!("failed to parse response: {}", e)))
    }

    async fn post_empty(&self, path: &str) -> Result<(), DashboardError> {
        let url = self.base_url.join(path)?;
        debug!(%url, "POST");

        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| DashboardError::Control(e.to_string()))?;
        check_status(response).await?;
        Ok(())
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<(), DashboardError> {
        let url = self.base_url.join(path)?;
        debug!(%url, "POST");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| DashboardError::Control(e.to_string()))?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DashboardError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(DashboardError::Control(format!(
        "API error ({}): {}",
        status, body
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_status_parses_flag() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/simulation/status")
            .with_header("content-type", "application/json")
            .with_body(r#"{"isRunning": true}"#)
            .create_async()
            .await;

        let client = ControlClient::new(&server.url()).unwrap();
        let status = client.fetch_status().await.unwrap();
        assert!(status.is_running);
    }

    #[tokio::test]
    async fn test_fetch_config_fills_defaults() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/simulation/config")
            .with_header("content-type", "application/json")
            .with_body(r#"{"maxReplicas": 4}"#)
            .create_async()
            .await;

        let client = ControlClient::new(&server.url()).unwrap();
        let config = client.fetch_config().await.unwrap();
        assert_eq!(config.max_replicas, 4);
        assert_eq!(config.min_replicas, 1);
        assert_eq!(config.pod_resources.requests.cpu, "1000m");
    }

    #[tokio::test]
    async fn test_start_maps_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/simulation/start")
            .with_status(500)
            .with_body("scheduler unavailable")
            .create_async()
            .await;

        let client = ControlClient::new(&server.url()).unwrap();
        let err = client.start_simulation().await.unwrap_err();
        match err {
            DashboardError::Control(message) => {
                assert!(message.contains("500"));
                assert!(message.contains("scheduler unavailable"));
            }
            other => panic!("expected control error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_save_config_posts_document() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/simulation/config")
            .match_header("content-type", "application/json")
            .create_async()
            .await;

        let client = ControlClient::new(&server.url()).unwrap();
        client
            .save_config(&SimulationConfig::default())
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = ControlClient::new("not a url").unwrap_err();
        assert!(matches!(err, DashboardError::Endpoint(_)));
    }
}
