//! Runtime configuration.
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. built-in defaults (every field has one)
//! 2. an optional `config/rosterforge.{toml,yaml,json,...}` file
//! 3. environment variables such as `ROSTERFORGE__SESSION__TIMEOUT_SECS`

use rosterforge_session::SessionConfig;
use rosterforge_team::TeamComposition;
use serde::{Deserialize, Serialize};

use crate::RosterError;

/// Default location of the optional config file, without extension.
pub const DEFAULT_CONFIG_PATH: &str = "config/rosterforge";

/// Prefix of the environment variables read by [`RosterConfig::load`].
pub const ENV_PREFIX: &str = "ROSTERFORGE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub store: StoreConfig,
    pub listener: ListenerConfig,
    pub team: TeamComposition,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Where the persistent store lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub uri: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "postgresql://postgres@localhost:5432/rosterforge-db".to_string(),
        }
    }
}

/// Address a transport layer should listen on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 35353,
        }
    }
}

impl ListenerConfig {
    /// `host:port`, ready for a socket bind.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive, e.g. `info` or `rosterforge_team=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl RosterConfig {
    /// Loads from [`DEFAULT_CONFIG_PATH`] and the environment.
    pub fn load() -> Result<Self, RosterError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads from the config file at `path` (if it exists) and the
    /// environment.
    pub fn load_from(path: &str) -> Result<Self, RosterError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(path).required(false));
        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, RosterError> {
        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
