//! HTTP access to the remote prediction service

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use super::config::{endpoint_url, normalize_base_url, AppConfig};
use super::error::ApiError;
use super::types::{AnalysisRequest, Endpoint, PredictionResult, ShapReport};

/// The two calls the application makes. Implementations block; the
/// controller runs them off the UI thread.
pub trait PredictionBackend: Send + Sync {
    fn predict(&self, request: &AnalysisRequest) -> Result<PredictionResult, ApiError>;

    fn shap(&self, request: &AnalysisRequest) -> Result<ShapReport, ApiError>;
}

/// Error body convention of the service
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        builder = match config.request_timeout_secs {
            Some(secs) => builder.timeout(Duration::from_secs(secs)),
            None => builder.timeout(None),
        };
        let client = builder.build()?;
        Ok(Self::with_client(client, &config.backend_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }

    fn post(
        &self,
        endpoint: Endpoint,
        request: &AnalysisRequest,
    ) -> Result<serde_json::Value, ApiError> {
        let url = endpoint_url(&self.base_url, endpoint);
        tracing::info!(
            %url,
            mode = %request.mode,
            length = request.sequence.len(),
            "sending request"
        );

        let response = self.client.post(&url).json(request).send()?;
        let status = response.status();
        let body = response.text()?;

        if status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), "request succeeded");
            Ok(serde_json::from_str(&body)?)
        } else {
            let message = parse_error_message(&body);
            tracing::warn!(
                %url,
                status = status.as_u16(),
                error = message.as_deref().unwrap_or(""),
                "request rejected"
            );
            Err(ApiError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}

impl PredictionBackend for HttpBackend {
    fn predict(&self, request: &AnalysisRequest) -> Result<PredictionResult, ApiError> {
        let body = self.post(Endpoint::Predict, request)?;
        Ok(PredictionResult::decode(request.mode, body)?)
    }

    fn shap(&self, request: &AnalysisRequest) -> Result<ShapReport, ApiError> {
        let body = self.post(Endpoint::Shap, request)?;
        Ok(serde_json::from_value(body)?)
    }
}

/// Non-empty `error` field of a rejection body, if there is one
pub fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
}
