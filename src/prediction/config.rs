//! Client configuration

use super::sequence::DEFAULT_MAX_SEQUENCE_LENGTH;
use super::types::Endpoint;

/// Environment variable that overrides the backend base URL
pub const BACKEND_URL_ENV: &str = "CADUCEUS_BACKEND_URL";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub backend_url: String,
    pub max_sequence_length: usize,
    /// `None` leaves requests without a deadline
    pub request_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
            request_timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Defaults, with the backend URL taken from the environment when set
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var(BACKEND_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => config.with_backend_url(&url),
            _ => config,
        }
    }

    pub fn with_backend_url(mut self, url: &str) -> Self {
        self.backend_url = normalize_base_url(url);
        self
    }
}

/// Full URL of `endpoint` under `base_url`
pub fn endpoint_url(base_url: &str, endpoint: Endpoint) -> String {
    format!("{}{}", normalize_base_url(base_url), endpoint.path())
}

/// Strip surrounding whitespace and trailing slashes
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
