use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_LIVE_ENDPOINT: &str =
    "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";
pub const DEFAULT_LIVE_MODEL: &str = "models/gemini-2.0-flash-live-001";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub user: UserSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserSettings {
    #[serde(default)]
    pub name: String,
    /// Free-form context the companion is told about the user.
    #[serde(default)]
    pub info: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            info: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_reconnect_backoff_ms")]
    pub reconnect_backoff_ms: u64,
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            reconnect_backoff_ms: default_reconnect_backoff_ms(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_LIVE_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_LIVE_MODEL.to_string()
}

fn default_reconnect_backoff_ms() -> u64 {
    1000
}

fn default_max_reconnect_attempts() -> u32 {
    5
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.session.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::Settings(
                "session.endpoint must be non-empty".to_string(),
            ));
        }
        if !endpoint.starts_with("wss://") && !endpoint.starts_with("ws://") {
            return Err(ConfigError::Settings(format!(
                "session.endpoint must use ws:// or wss://, got `{endpoint}`"
            )));
        }
        if self.session.model.trim().is_empty() {
            return Err(ConfigError::Settings(
                "session.model must be non-empty".to_string(),
            ));
        }
        if self.session.reconnect_backoff_ms == 0 {
            return Err(ConfigError::Settings(
                "session.reconnect_backoff_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
