//! Prediction API integration.
//!
//! The fetcher never fails: transport errors, HTTP error statuses and
//! undecodable bodies come back as an `{"error": "..."}` payload, which the
//! normalizer reports as an upstream error.

use reqwest::blocking::Client;
use serde_json::{Value, json};

use crate::config::ApiConfig;
use crate::domain::ApiRequest;
use crate::error::AppError;

/// Anything that can answer an `ApiRequest` with a JSON payload.
pub trait PredictionSource {
    fn fetch(&self, request: &ApiRequest) -> Value;
}

pub struct PredictionClient {
    client: Client,
    base_url: String,
}

impl PredictionClient {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn try_fetch(&self, url: &str, params: &[(String, String)]) -> Result<Value, String> {
        let resp = self
            .client
            .get(url)
            .query(params)
            .send()
            .map_err(|e| format!("Prediction request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("Prediction request to {url} failed with status {status}."));
        }

        resp.json::<Value>()
            .map_err(|e| format!("Failed to parse prediction response: {e}"))
    }
}

impl PredictionSource for PredictionClient {
    fn fetch(&self, request: &ApiRequest) -> Value {
        let url = endpoint_url(&self.base_url, &request.path);
        tracing::info!(%url, params = ?request.params, "fetching predictions");

        match self.try_fetch(&url, &request.params) {
            Ok(body) => {
                tracing::debug!(%url, "prediction response decoded");
                body
            }
            Err(message) => {
                tracing::warn!(%url, error = %message, "prediction request failed");
                error_payload(message)
            }
        }
    }
}

/// `{"error": message}`, the same shape the upstream API uses for failures.
pub fn error_payload(message: impl Into<String>) -> Value {
    json!({ "error": message.into() })
}

/// Join the API base and a relative endpoint path with exactly one slash.
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::error::ErrorReason;
    use crate::normalize::normalize;

    #[test]
    fn endpoint_url_joins_cleanly() {
        assert_eq!(
            endpoint_url("http://localhost:5000/api/v1", "predictions/next_week"),
            "http://localhost:5000/api/v1/predictions/next_week"
        );
        assert_eq!(
            endpoint_url("http://localhost:5000/api/v1/", "/predictions"),
            "http://localhost:5000/api/v1/predictions"
        );
    }

    #[test]
    fn error_payload_normalizes_to_upstream_error() {
        let payload = error_payload("connection refused");
        assert_eq!(
            normalize(&payload),
            Err(ErrorReason::UpstreamError("connection refused".to_string()))
        );
    }

    #[test]
    fn unreachable_server_yields_error_payload() {
        // Port 9 (discard) on localhost is closed in test environments.
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9/api/v1".to_string(),
            timeout: Duration::from_secs(2),
        };
        let client = PredictionClient::new(&config).unwrap();
        let payload = client.fetch(&ApiRequest {
            path: "predictions/next_week".to_string(),
            params: Vec::new(),
        });
        let message = payload
            .get("error")
            .and_then(Value::as_str)
            .expect("fetch failure should be wrapped");
        assert!(message.starts_with("Prediction request failed"), "{message}");
    }
}
