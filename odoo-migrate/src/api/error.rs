//! Error types for Odoo API operations

use thiserror::Error;

use super::xmlrpc::RpcError;

/// Failure of a client operation
///
/// Everything except [`ApiError::RecordCreate`] is fatal to the workflow that
/// hit it. Create failures are logged per record and skipped.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Credentials rejected, or the server could not be reached to check them
    #[error("Authentication failed for {username}@{database}: {reason}")]
    Authentication {
        database: String,
        username: String,
        reason: String,
        #[source]
        source: Option<RpcError>,
    },

    /// `fields_get` failed
    #[error("Failed to introspect fields of '{entity}'")]
    SchemaIntrospection {
        entity: String,
        #[source]
        source: RpcError,
    },

    /// `search_read` failed
    #[error("Failed to read records from '{entity}'")]
    DataRead {
        entity: String,
        #[source]
        source: RpcError,
    },

    /// `create` failed for a single record
    #[error("Failed to create record on '{entity}'")]
    RecordCreate {
        entity: String,
        #[source]
        source: RpcError,
    },
}

impl ApiError {
    pub fn schema(entity: impl Into<String>, source: RpcError) -> Self {
        Self::SchemaIntrospection {
            entity: entity.into(),
            source,
        }
    }

    pub fn read(entity: impl Into<String>, source: RpcError) -> Self {
        Self::DataRead {
            entity: entity.into(),
            source,
        }
    }

    pub fn create(entity: impl Into<String>, source: RpcError) -> Self {
        Self::RecordCreate {
            entity: entity.into(),
            source,
        }
    }

    /// Format error with the full source chain
    pub fn format_detailed(&self) -> String {
        let mut output = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            output.push_str(&format!(": {}", err));
            source = err.source();
        }
        output
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
