//! Configuration management with layered hierarchy
//!
//! Lowest priority first: built-in defaults, the YAML config file, `OCTANE_*`
//! environment variables, then command-line flags via [`Config::merge`].

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use miette::Diagnostic;
use thiserror::Error;

use crate::octane::client::{Credentials, OctaneSettings};

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection and migration settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Octane server URL, e.g. https://octane.example.com
    pub server: Option<String>,

    pub shared_space: Option<u64>,

    pub workspace: Option<u64>,

    /// API access key id
    pub client_id: Option<String>,

    /// API access key secret
    pub client_secret: Option<String>,

    /// User name for password sign-in
    pub user: Option<String>,

    pub password: Option<String>,

    /// Default owner name for migrated tests; accepted but not sent to the server
    pub default_user_name: Option<String>,

    pub default_user_id: Option<String>,

    /// HTTP timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Configuration keys with a short description, in display order
pub const CONFIG_KEYS: &[(&str, &str)] = &[
    ("server", "Octane server URL"),
    ("shared_space", "Shared space id"),
    ("workspace", "Workspace id"),
    ("client_id", "API access key id"),
    ("client_secret", "API access key secret"),
    ("user", "User name for password sign-in"),
    ("password", "Password for password sign-in"),
    ("default_user_name", "Default user name"),
    ("default_user_id", "Default user id"),
    ("timeout_secs", "HTTP timeout in seconds"),
];

const SECRET_KEYS: &[&str] = &["client_secret", "password"];

/// Errors that can occur while loading or validating configuration
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    #[diagnostic(code(octane_migrate::config::read))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    #[diagnostic(
        code(octane_migrate::config::parse),
        help("The config file is YAML with keys from 'octane-migrate config keys'")
    )]
    Parse {
        path: PathBuf,
        source: serde_yml::Error,
    },

    #[error("Invalid value for {var}: '{value}'")]
    #[diagnostic(code(octane_migrate::config::invalid_env), help("Expected a whole number"))]
    InvalidEnv { var: String, value: String },

    #[error("Missing configuration: {key} (set it with --{flag}, {env} or the config file)")]
    #[diagnostic(code(octane_migrate::config::missing))]
    Missing {
        key: &'static str,
        flag: String,
        env: String,
    },

    #[error("Missing credentials: provide client_id/client_secret or user/password")]
    #[diagnostic(
        code(octane_migrate::config::missing_credentials),
        help("An API access key is used when both are configured")
    )]
    MissingCredentials,
}

impl ConfigError {
    fn missing(key: &'static str) -> Self {
        ConfigError::Missing {
            key,
            flag: key.replace('_', "-"),
            env: env_var_for(key),
        }
    }
}

fn env_var_for(key: &str) -> String {
    format!("OCTANE_{}", key.to_uppercase())
}

impl Config {
    /// Load the config file and environment.
    ///
    /// With an explicit path the file must exist; otherwise the global file is
    /// used when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        match explicit {
            Some(path) => config.merge(Self::from_file(path)?),
            None => {
                if let Some(global_path) = Self::global_config_path() {
                    if global_path.exists() {
                        config.merge(Self::from_file(&global_path)?);
                    }
                }
            }
        }

        config.merge(Self::from_env(|key| std::env::var(key).ok())?);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yml::Error> {
        // An empty file is a valid, empty config
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yml::from_str(contents)
    }

    /// Read `OCTANE_*` variables through `lookup`
    pub fn from_env<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str| -> Result<Option<u64>, ConfigError> {
            let var = env_var_for(key);
            match lookup(&var) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map(Some)
                    .map_err(|_| ConfigError::InvalidEnv { var, value }),
                None => Ok(None),
            }
        };

        Ok(Config {
            server: lookup("OCTANE_SERVER"),
            shared_space: number("shared_space")?,
            workspace: number("workspace")?,
            client_id: lookup("OCTANE_CLIENT_ID"),
            client_secret: lookup("OCTANE_CLIENT_SECRET"),
            user: lookup("OCTANE_USER"),
            password: lookup("OCTANE_PASSWORD"),
            default_user_name: lookup("OCTANE_DEFAULT_USER_NAME"),
            default_user_id: lookup("OCTANE_DEFAULT_USER_ID"),
            timeout_secs: number("timeout_secs")?,
        })
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "octane-migrate")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.server.is_some() {
            self.server = other.server;
        }
        if other.shared_space.is_some() {
            self.shared_space = other.shared_space;
        }
        if other.workspace.is_some() {
            self.workspace = other.workspace;
        }
        if other.client_id.is_some() {
            self.client_id = other.client_id;
        }
        if other.client_secret.is_some() {
            self.client_secret = other.client_secret;
        }
        if other.user.is_some() {
            self.user = other.user;
        }
        if other.password.is_some() {
            self.password = other.password;
        }
        if other.default_user_name.is_some() {
            self.default_user_name = other.default_user_name;
        }
        if other.default_user_id.is_some() {
            self.default_user_id = other.default_user_id;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Value of a key for display, secrets masked
    pub fn display_value(&self, key: &str) -> Option<String> {
        let value = match key {
            "server" => self.server.clone(),
            "shared_space" => self.shared_space.map(|v| v.to_string()),
            "workspace" => self.workspace.map(|v| v.to_string()),
            "client_id" => self.client_id.clone(),
            "client_secret" => self.client_secret.clone(),
            "user" => self.user.clone(),
            "password" => self.password.clone(),
            "default_user_name" => self.default_user_name.clone(),
            "default_user_id" => self.default_user_id.clone(),
            "timeout_secs" => self.timeout_secs.map(|v| v.to_string()),
            _ => None,
        }?;

        if SECRET_KEYS.contains(&key) {
            Some("********".to_string())
        } else {
            Some(value)
        }
    }

    /// Validate and build connection settings. An API key wins over a user.
    pub fn into_settings(self) -> Result<OctaneSettings, ConfigError> {
        let timeout = self.timeout();
        let server = self.server.ok_or_else(|| ConfigError::missing("server"))?;
        let shared_space = self
            .shared_space
            .ok_or_else(|| ConfigError::missing("shared_space"))?;
        let workspace = self
            .workspace
            .ok_or_else(|| ConfigError::missing("workspace"))?;

        let credentials = match (self.client_id, self.client_secret, self.user, self.password) {
            (Some(client_id), Some(client_secret), _, _) => Credentials::ApiKey {
                client_id,
                client_secret,
            },
            (_, _, Some(user), Some(password)) => Credentials::User { user, password },
            _ => return Err(ConfigError::MissingCredentials),
        };

        Ok(OctaneSettings {
            server,
            shared_space,
            workspace,
            credentials,
            timeout,
        })
    }
}
