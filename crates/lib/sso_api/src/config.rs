//! API server configuration.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Deployment profile. Only affects log level and format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    #[default]
    Local,
    Dev,
    Prod,
}

impl Env {
    pub fn as_str(self) -> &'static str {
        match self {
            Env::Local => "local",
            Env::Dev => "dev",
            Env::Prod => "prod",
        }
    }
}

impl FromStr for Env {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Env::Local),
            "dev" => Ok(Env::Dev),
            "prod" => Ok(Env::Prod),
            other => Err(ConfigError::Invalid {
                key: "env",
                value: other.to_string(),
            }),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub env: Env,
    /// TCP port to listen on.
    pub port: u16,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Lifetime of issued session tokens.
    pub token_ttl: Duration,
    /// Maximum number of pooled database connections.
    pub max_connections: u32,
}

const DEFAULT_PORT: u16 = 44044;
const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/sso";
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
/// Longest accepted token lifetime (365 days).
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            env: Env::Local,
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.into(),
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// On-disk shape of the YAML config file.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    env: Env,
    port: u16,
    database_url: String,
    token_ttl_secs: u64,
    max_connections: u32,
}

impl Default for FileConfig {
    fn default() -> Self {
        let defaults = ApiConfig::default();
        Self {
            env: defaults.env,
            port: defaults.port,
            database_url: defaults.database_url,
            token_ttl_secs: defaults.token_ttl.as_secs(),
            max_connections: defaults.max_connections,
        }
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable          | Default                           |
    /// |-------------------|-----------------------------------|
    /// | `SSO_ENV`         | `local`                           |
    /// | `PORT`            | `44044`                           |
    /// | `DATABASE_URL`    | `postgres://localhost:5432/sso`   |
    /// | `TOKEN_TTL_SECS`  | `3600`                            |
    /// | `MAX_CONNECTIONS` | `5`                               |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            env: match lookup("SSO_ENV") {
                Some(v) => v.parse()?,
                None => defaults.env,
            },
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            token_ttl: parse_var(&lookup, "TOKEN_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.token_ttl),
            max_connections: parse_var(&lookup, "MAX_CONNECTIONS")?
                .unwrap_or(defaults.max_connections),
        };
        config.validate()
    }

    /// Reads configuration from a YAML file. Missing keys take defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = serde_yaml::from_str(raw)?;
        Self {
            env: file.env,
            port: file.port,
            database_url: file.database_url,
            token_ttl: Duration::from_secs(file.token_ttl_secs),
            max_connections: file.max_connections,
        }
        .validate()
    }

    /// Address to bind the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.token_ttl.is_zero() {
            return Err(ConfigError::Invalid {
                key: "token_ttl",
                value: "0".into(),
            });
        }
        if self.token_ttl > MAX_TOKEN_TTL {
            return Err(ConfigError::Invalid {
                key: "token_ttl",
                value: self.token_ttl.as_secs().to_string(),
            });
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "max_connections",
                value: "0".into(),
            });
        }
        if self.database_url.is_empty() {
            return Err(ConfigError::Invalid {
                key: "database_url",
                value: String::new(),
            });
        }
        Ok(self)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}
