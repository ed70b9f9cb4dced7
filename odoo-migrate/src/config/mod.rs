//! Server configuration
//!
//! Named servers live in a TOML file, by default
//! `~/.config/odoo-migrate/config.toml`:
//!
//! ```toml
//! [servers.production]
//! url = "https://erp.example.com"
//! database = "prod"
//! username = "admin"
//! password_env = "ODOO_PROD_PASSWORD"
//! ```
//!
//! Passwords come from `password`, then the variable named by `password_env`
//! (a `.env` file is honoured), then an interactive prompt.

use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::ServerConfig;

const APP_DIR: &str = "odoo-migrate";
const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Server '{0}' is not configured")]
    UnknownServer(String),

    #[error("No password for server '{0}': set `password`, `password_env`, or run interactively")]
    MissingPassword(String),

    #[error("Failed to read password for server '{name}': {source}")]
    Prompt {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine the user configuration directory")]
    NoConfigDir,
}

/// One `[servers.<name>]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerEntry {
    pub url: String,
    pub database: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub servers: BTreeMap<String, ServerEntry>,
}

impl Config {
    /// `~/.config/odoo-migrate/config.toml` or the platform equivalent
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from `path`, or from the default location when `None`
    ///
    /// A missing file at the default location yields an empty config; a
    /// missing file at an explicit path is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_path()?, false),
        };

        if !explicit && !path.exists() {
            log::debug!("No config file at {}, starting empty", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        log::debug!("Loaded {} servers from {}", config.servers.len(), path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolve a named server, reading the password from the environment or a prompt
    pub fn server(&self, name: &str) -> Result<ServerConfig, ConfigError> {
        self.server_with(name, |var| std::env::var(var).ok(), || {
            if std::io::stdin().is_terminal() {
                rpassword::prompt_password(format!("Password for '{}': ", name)).map(Some)
            } else {
                Ok(None)
            }
        })
    }

    /// Resolve a named server with injectable environment lookup and prompt
    pub fn server_with<E, P>(&self, name: &str, env: E, prompt: P) -> Result<ServerConfig, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
        P: FnOnce() -> std::io::Result<Option<String>>,
    {
        let entry = self
            .servers
            .get(name)
            .ok_or_else(|| ConfigError::UnknownServer(name.to_string()))?;

        let configured = entry
            .password
            .clone()
            .or_else(|| entry.password_env.as_deref().and_then(|var| env(var)));

        let password = match configured {
            Some(password) => password,
            None => prompt()
                .map_err(|source| ConfigError::Prompt {
                    name: name.to_string(),
                    source,
                })?
                .ok_or_else(|| ConfigError::MissingPassword(name.to_string()))?,
        };

        Ok(ServerConfig {
            url: entry.url.clone(),
            database: entry.database.clone(),
            username: entry.username.clone(),
            password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[servers.production]
url = "https://erp.example.com"
database = "prod"
username = "admin"
password_env = "ODOO_PROD_PASSWORD"

[servers.staging]
url = "http://localhost:8069"
database = "staging"
username = "admin"
password = "admin"
"#;

    fn no_prompt() -> std::io::Result<Option<String>> {
        Ok(None)
    }

    #[test]
    fn test_parse_servers() {
        let config = Config::parse(SAMPLE).unwrap();
        assert_eq!(config.servers.len(), 2);

        let production = &config.servers["production"];
        assert_eq!(production.url, "https://erp.example.com");
        assert_eq!(production.password, None);
        assert_eq!(production.password_env.as_deref(), Some("ODOO_PROD_PASSWORD"));
    }

    #[test]
    fn test_inline_password() {
        let config = Config::parse(SAMPLE).unwrap();
        let server = config.server_with("staging", |_| None, no_prompt).unwrap();
        assert_eq!(server.password, "admin");
        assert_eq!(server.database, "staging");
    }

    #[test]
    fn test_password_from_env() {
        let config = Config::parse(SAMPLE).unwrap();
        let server = config
            .server_with(
                "production",
                |var| (var == "ODOO_PROD_PASSWORD").then(|| "from-env".to_string()),
                no_prompt,
            )
            .unwrap();
        assert_eq!(server.password, "from-env");
    }

    #[test]
    fn test_password_prompt_fallback() {
        let config = Config::parse(SAMPLE).unwrap();
        let server = config
            .server_with("production", |_| None, || Ok(Some("typed".to_string())))
            .unwrap();
        assert_eq!(server.password, "typed");
    }

    #[test]
    fn test_missing_password() {
        let config = Config::parse(SAMPLE).unwrap();
        let err = config.server_with("production", |_| None, no_prompt).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPassword(name) if name == "production"));
    }

    #[test]
    fn test_unknown_server() {
        let config = Config::parse(SAMPLE).unwrap();
        let err = config.server_with("nope", |_| None, no_prompt).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownServer(_)));
    }

    #[test]
    fn test_empty_config() {
        let config = Config::parse("").unwrap();
        assert!(config.servers.is_empty());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.servers.contains_key("staging"));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[servers.x]\nurl = ").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
