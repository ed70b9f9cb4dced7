//! Connection models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything needed to open a session against one Odoo server
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub url: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl ServerConfig {
    pub fn new(
        url: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep the password out of logs
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("url", &self.url)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// An authenticated session; only produced by a successful authenticate call
#[derive(Clone)]
pub struct Session {
    pub(crate) config: ServerConfig,
    pub(crate) uid: i64,
}

impl Session {
    pub fn uid(&self) -> i64 {
        self.uid
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    pub fn database(&self) -> &str {
        &self.config.database
    }

    pub fn username(&self) -> &str {
        &self.config.username
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("uid", &self.uid)
            .finish()
    }
}
