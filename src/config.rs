//! Document store settings.
//!
//! The adapter treats [`DocumentDbSettings`] as opaque and hands it to the
//! [`DocumentClientFactory`](crate::client::DocumentClientFactory) untouched.
//! [`DocumentDbSettings::load`] layers sources in this order (later wins):
//!
//! 1. built-in defaults
//! 2. the YAML file given as `path`, or named by `DOCUMENTDB_CONFIG`
//! 3. `DOCUMENTDB__*` environment variables (e.g. `DOCUMENTDB__AUTH_KEY`)

use crate::error::AdapterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Environment variable naming a settings file.
pub const CONFIG_ENV_VAR: &str = "DOCUMENTDB_CONFIG";
/// Prefix for settings environment variables.
pub const CONFIG_ENV_PREFIX: &str = "DOCUMENTDB";
/// Local emulator endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://localhost:8081/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionMode {
    #[default]
    Gateway,
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyLevel {
    Strong,
    BoundedStaleness,
    #[default]
    Session,
    ConsistentPrefix,
    Eventual,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentDbSettings {
    pub endpoint: String,
    pub auth_key: String,
    pub database: Option<String>,
    pub connection_mode: ConnectionMode,
    pub consistency_level: ConsistencyLevel,
    pub request_timeout_secs: u64,
    pub application_name: Option<String>,
}

impl Default for DocumentDbSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            auth_key: String::new(),
            database: None,
            connection_mode: ConnectionMode::default(),
            consistency_level: ConsistencyLevel::default(),
            request_timeout_secs: 60,
            application_name: None,
        }
    }
}

// The auth key must never reach a log line.
impl fmt::Debug for DocumentDbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentDbSettings")
            .field("endpoint", &self.endpoint)
            .field("auth_key", &"<redacted>")
            .field("database", &self.database)
            .field("connection_mode", &self.connection_mode)
            .field("consistency_level", &self.consistency_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("application_name", &self.application_name)
            .finish()
    }
}

impl DocumentDbSettings {
    pub fn new(endpoint: impl Into<String>, auth_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth_key: auth_key.into(),
            ..Self::default()
        }
    }

    /// Loads settings from an optional YAML file and the environment, then validates them.
    pub fn load(path: Option<&str>) -> Result<Self, AdapterError> {
        use ::config::{Config, Environment, File, FileFormat};

        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::new(path, FileFormat::Yaml).required(true));
        } else if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&path, FileFormat::Yaml).required(true));
        }

        let settings: Self = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AdapterError> {
        if self.endpoint.trim().is_empty() {
            return Err(AdapterError::Configuration("endpoint is empty".into()));
        }
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(AdapterError::Configuration(format!(
                "endpoint must be an http(s) URL: {}",
                self.endpoint
            )));
        }
        if self.auth_key.is_empty() {
            return Err(AdapterError::Configuration("auth_key is empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(AdapterError::Configuration(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_emulator() {
        let settings = DocumentDbSettings::default();
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.connection_mode, ConnectionMode::Gateway);
        assert_eq!(settings.consistency_level, ConsistencyLevel::Session);
        assert_eq!(settings.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn validate_requires_key_and_url() {
        assert!(DocumentDbSettings::new("https://acct.documents.example:443/", "key")
            .validate()
            .is_ok());

        let missing_key = DocumentDbSettings::new("https://acct.documents.example:443/", "");
        assert!(matches!(missing_key.validate(), Err(AdapterError::Configuration(_))));

        let bad_url = DocumentDbSettings::new("acct.documents.example", "key");
        assert!(matches!(bad_url.validate(), Err(AdapterError::Configuration(_))));

        let mut zero_timeout = DocumentDbSettings::new("http://localhost:8081/", "key");
        zero_timeout.request_timeout_secs = 0;
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn debug_redacts_auth_key() {
        let settings = DocumentDbSettings::new("https://localhost:8081/", "super-secret");
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
