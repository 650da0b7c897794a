use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8001/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid API base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("invalid endpoint {path:?}: {reason}")]
    InvalidEndpoint { path: String, reason: String },
    #[error("failed to build http client: {0}")]
    Client(String),
}

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Always ends with `/`, so endpoint paths join beneath it.
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientSettings {
    /// Replaces the base url. Only absolute http(s) urls are accepted; a
    /// missing trailing slash is added.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason,
        };
        let mut url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);
        self.base_url = url;
        Ok(self)
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Resolves a relative endpoint path such as `users/login` against the base url.
    pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        self.base_url
            .join(path)
            .map_err(|err| ConfigError::InvalidEndpoint {
                path: path.to_string(),
                reason: err.to_string(),
            })
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client, ConfigError> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()
            .map_err(|err| ConfigError::Client(err.to_string()))
    }
}
