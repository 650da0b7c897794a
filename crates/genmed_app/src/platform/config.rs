//! Startup configuration read from `GENMED_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use genmed_engine::{ClientSettings, ConfigError};
use genmed_logging::LogDestination;

pub const API_URL_VAR: &str = "GENMED_API_URL";
pub const STATE_DIR_VAR: &str = "GENMED_STATE_DIR";
pub const REQUEST_TIMEOUT_VAR: &str = "GENMED_REQUEST_TIMEOUT_SECS";
pub const LOG_VAR: &str = "GENMED_LOG";

pub const DEFAULT_STATE_DIR: &str = "./.genmed";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client: ClientSettings,
    pub state_dir: PathBuf,
    pub log_destination: LogDestination,
    /// Values that were ignored. Logged once logging is up.
    pub warnings: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Only an unusable API url is fatal; other bad values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut warnings = Vec::new();
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let mut client = ClientSettings::default();
        if let Some(url) = value(API_URL_VAR) {
            client = client.with_base_url(&url)?;
        }

        if let Some(raw) = value(REQUEST_TIMEOUT_VAR) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    client = client.with_request_timeout(Duration::from_secs(secs));
                }
                _ => warnings.push(format!(
                    "{REQUEST_TIMEOUT_VAR}={raw:?} is not a positive number of seconds; using {}s",
                    client.request_timeout.as_secs()
                )),
            }
        }

        let log_destination = match value(LOG_VAR) {
            Some(raw) => LogDestination::parse(&raw).unwrap_or_else(|| {
                warnings.push(format!("{LOG_VAR}={raw:?} is not one of file|terminal|both"));
                LogDestination::default()
            }),
            None => LogDestination::default(),
        };

        let state_dir = value(STATE_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR));

        Ok(Self {
            client,
            state_dir,
            log_destination,
            warnings,
        })
    }
}
