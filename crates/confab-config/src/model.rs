//! Configuration schema for Confab.

use crate::error::ConfigError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Root config for the Confab service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfabConfig {
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl ConfabConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> ConfabConfigBuilder {
        ConfabConfigBuilder::new()
    }

    /// Detect configuration from the environment.
    ///
    /// Remote-store credentials and the data directory are deployment
    /// facts, not user flags: the remote tier is attempted only when both
    /// `CONFAB_REMOTE_URL` and `CONFAB_REMOTE_TOKEN` are present. A value
    /// that is present but unparseable is an operator error and fails
    /// startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        config.memory.remote = remote_from_parts(
            env::var("CONFAB_REMOTE_URL").ok(),
            env::var("CONFAB_REMOTE_TOKEN").ok(),
        );
        if let Ok(dir) = env::var("CONFAB_DATA_DIR") {
            config.memory.data_dir = Some(PathBuf::from(dir));
        }
        if let Ok(raw) = env::var("CONFAB_MAX_TURNS") {
            config.memory.max_turns = parse_field("CONFAB_MAX_TURNS", &raw)?;
        }
        if let Ok(host) = env::var("CONFAB_HOST") {
            config.server.host = host;
        }
        if let Ok(raw) = env::var("CONFAB_PORT") {
            config.server.port = parse_field("CONFAB_PORT", &raw)?;
        }
        Ok(config)
    }
}

/// Builder for assembling a `ConfabConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct ConfabConfigBuilder {
    config: ConfabConfig,
}

impl ConfabConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: ConfabConfig::default(),
        }
    }

    /// Replace the memory configuration.
    pub fn memory(mut self, memory: MemoryConfig) -> Self {
        self.config.memory = memory;
        self
    }

    /// Replace the server configuration.
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    /// Finalize and return the built `ConfabConfig`.
    pub fn build(self) -> ConfabConfig {
        self.config
    }
}

/// Memory subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Maximum turns retained in the active window.
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
    /// Directory for the local-file tier; platform data dir when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Remote store credentials; the tier is skipped when unset.
    #[serde(default)]
    pub remote: Option<RemoteStoreConfig>,
    /// Bound on a single durable-tier operation, in seconds.
    #[serde(default = "default_op_timeout_secs")]
    pub op_timeout_secs: u64,
}

impl Default for MemoryConfig {
    /// Default memory settings.
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            data_dir: None,
            remote: None,
            op_timeout_secs: default_op_timeout_secs(),
        }
    }
}

impl MemoryConfig {
    /// Resolve the effective data directory for the local-file tier.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let dirs = directories::ProjectDirs::from("dev", "confab", "confab")
            .ok_or_else(|| ConfigError::Invalid("no home directory available".to_string()))?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

fn default_max_turns() -> usize {
    50
}

fn default_op_timeout_secs() -> u64 {
    5
}

/// Credentials for the remote key-value tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteStoreConfig {
    /// Base URL of the REST endpoint.
    pub url: String,
    /// Bearer token.
    pub token: String,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    /// Default server settings.
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Bind address in `host:port` form.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Build remote credentials only when both halves are present.
fn remote_from_parts(url: Option<String>, token: Option<String>) -> Option<RemoteStoreConfig> {
    match (url, token) {
        (Some(url), Some(token)) => Some(RemoteStoreConfig { url, token }),
        (Some(_), None) | (None, Some(_)) => {
            warn!("incomplete remote store credentials; remote tier disabled");
            None
        }
        (None, None) => None,
    }
}

/// Parse an environment value, reporting the variable on failure.
fn parse_field<T: FromStr>(path: &str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidField {
        path: path.to_string(),
        message: format!("cannot parse {raw:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::{
        ConfabConfig, MemoryConfig, RemoteStoreConfig, ServerConfig, parse_field,
        remote_from_parts,
    };
    use crate::error::ConfigError;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_the_deployment_contract() {
        let config = ConfabConfig::default();
        assert_eq!(config.memory.max_turns, 50);
        assert_eq!(config.memory.op_timeout_secs, 5);
        assert_eq!(config.memory.remote, None);
        assert_eq!(config.server.addr(), "127.0.0.1:3000");
    }

    #[test]
    fn builder_replaces_sections() {
        let config = ConfabConfig::builder()
            .memory(MemoryConfig {
                max_turns: 10,
                ..MemoryConfig::default()
            })
            .server(ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            })
            .build();
        assert_eq!(config.memory.max_turns, 10);
        assert_eq!(config.server.addr(), "0.0.0.0:8080");
    }

    #[test]
    fn remote_credentials_require_both_halves() {
        assert_eq!(remote_from_parts(None, None), None);
        assert_eq!(remote_from_parts(Some("url".to_string()), None), None);
        assert_eq!(remote_from_parts(None, Some("token".to_string())), None);
        assert_eq!(
            remote_from_parts(Some("url".to_string()), Some("token".to_string())),
            Some(RemoteStoreConfig {
                url: "url".to_string(),
                token: "token".to_string(),
            })
        );
    }

    #[test]
    fn unparseable_values_name_the_variable() {
        let err = parse_field::<u16>("CONFAB_PORT", "not-a-port").expect_err("must fail");
        match err {
            ConfigError::InvalidField { path, .. } => assert_eq!(path, "CONFAB_PORT"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(parse_field::<u16>("CONFAB_PORT", "8080").expect("parse"), 8080);
    }

    #[test]
    fn explicit_data_dir_wins_over_platform_default() {
        let config = MemoryConfig {
            data_dir: Some(std::path::PathBuf::from("/var/lib/confab")),
            ..MemoryConfig::default()
        };
        assert_eq!(
            config.resolve_data_dir().expect("dir"),
            std::path::PathBuf::from("/var/lib/confab")
        );
    }

    #[test]
    fn partial_json_decodes_with_defaults() {
        let config: ConfabConfig =
            serde_json::from_str(r#"{"memory": {"max_turns": 20}}"#).expect("decode");
        assert_eq!(config.memory.max_turns, 20);
        assert_eq!(config.server.port, 3000);
    }
}
