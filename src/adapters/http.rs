use crate::domain::model::{
    IndicatorDefinition, RawIndicatorSet, SustainabilityResult, WeightsTable,
};
use crate::domain::ports::ScoringBackend;
use crate::utils::error::{Result, ScoreError};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

const API_PREFIX: &str = "api/sustainability/";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Scores through a remote service that exposes the sustainability API.
#[derive(Debug, Clone)]
pub struct RemoteScoringClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl RemoteScoringClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = validate_url("remote", base_url)?;
        // Url::join drops the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> Result<Url> {
        self.base_url
            .join(API_PREFIX)
            .and_then(|api| api.join(route))
            .map_err(|e| ScoreError::InvalidConfigValueError {
                field: "remote".to_string(),
                value: self.base_url.to_string(),
                reason: format!("Cannot build endpoint for {}: {}", route, e),
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, route: &str) -> Result<T> {
        let url = self.endpoint(route)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).timeout(self.timeout).send().await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        route: &str,
        body: &impl serde::Serialize,
    ) -> Result<T> {
        let url = self.endpoint(route)?;
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("Remote response status: {}", status);

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|body| body.get("detail").and_then(|d| d.as_str()).map(String::from))
            .unwrap_or_else(|| {
                if text.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    text
                }
            });

        tracing::warn!("⚠️ Remote scoring failed with {}: {}", status, detail);
        Err(ScoreError::Remote {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl ScoringBackend for RemoteScoringClient {
    async fn calculate(&self, input: &RawIndicatorSet) -> Result<SustainabilityResult> {
        self.post_json("calculate", input).await
    }

    async fn indicator_definitions(&self) -> Result<Vec<IndicatorDefinition>> {
        self.get_json("indicators").await
    }

    async fn weights(&self) -> Result<WeightsTable> {
        self.get_json("weights").await
    }

    async fn example(&self) -> Result<RawIndicatorSet> {
        self.get_json("example").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = RemoteScoringClient::new("https://scores.example.com/v1").unwrap();
        assert_eq!(
            client.endpoint("calculate").unwrap().as_str(),
            "https://scores.example.com/v1/api/sustainability/calculate"
        );

        let root = RemoteScoringClient::new("http://localhost:8000").unwrap();
        assert_eq!(
            root.endpoint("weights").unwrap().as_str(),
            "http://localhost:8000/api/sustainability/weights"
        );
    }

    #[test]
    fn test_rejects_non_http_urls() {
        assert!(RemoteScoringClient::new("ftp://scores.example.com").is_err());
        assert!(RemoteScoringClient::new("").is_err());
    }
}
