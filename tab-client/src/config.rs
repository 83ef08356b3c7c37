//! Client configuration

use crate::{ClientError, ClientResult};

/// Configuration for talking to the restaurant backend
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | TAB_API_BASE_URL | http://localhost:8080/api | Backend base URL |
/// | TAB_API_TOKEN | - | Session bearer token |
/// | TAB_REQUEST_TIMEOUT_SECS | unset (no timeout) | Per-request timeout |
/// | TAB_TIP_URL | http://localhost:3000/tip-selection | Tip selection step |
/// | LOG_LEVEL | info | Log level |
/// | LOG_JSON | false | JSON log lines |
/// | LOG_DIR | - | Daily rolling log files |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "https://api.example.com/v1")
    pub base_url: String,

    /// Session bearer token, issued by the identity provider
    pub token: Option<String>,

    /// Request timeout in seconds; `None` leaves requests unbounded
    pub timeout: Option<u64>,

    /// Tip selection page the checkout hands off to
    pub tip_url: String,

    /// Log level filter
    pub log_level: String,

    /// Emit JSON log lines
    pub log_json: bool,

    /// Directory for daily rolling log files
    pub log_dir: Option<String>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: None,
            tip_url: "http://localhost:3000/tip-selection".into(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
        }
    }

    /// Load configuration from the environment
    ///
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Self {
        let base_url = std::env::var("TAB_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080/api".into());
        let mut config = Self::new(base_url);
        config.token = std::env::var("TAB_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());
        config.timeout = std::env::var("TAB_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok());
        if let Ok(url) = std::env::var("TAB_TIP_URL") {
            config.tip_url = url;
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }
        config.log_json = std::env::var("LOG_JSON")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);
        config.log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Set the tip selection URL
    pub fn with_tip_url(mut self, url: impl Into<String>) -> Self {
        self.tip_url = url.into();
        self
    }

    /// Check the URLs parse
    pub fn validate(&self) -> ClientResult<()> {
        for (name, value) in [("base_url", &self.base_url), ("tip_url", &self.tip_url)] {
            reqwest::Url::parse(value)
                .map_err(|e| ClientError::Config(format!("{} '{}': {}", name, value, e)))?;
        }
        if self.timeout == Some(0) {
            return Err(ClientError::Config("timeout must be positive".into()));
        }
        Ok(())
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<super::NetworkHttpClient> {
        super::NetworkHttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080/api")
    }
}
