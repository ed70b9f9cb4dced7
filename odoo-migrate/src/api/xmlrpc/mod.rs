//! XML-RPC plumbing for the Odoo external API
//!
//! Odoo exposes two services over XML-RPC: `common` (version, authenticate)
//! and `object` (`execute_kw` against any model). [`RpcTransport`] is the seam
//! between the client and the wire, [`HttpTransport`] the real implementation.

pub mod codec;
pub mod http;

pub use codec::{decode_response, encode_call};
pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// XML-RPC service exposed by an Odoo server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `/xmlrpc/2/common` - authentication and server info
    Common,
    /// `/xmlrpc/2/object` - model methods through `execute_kw`
    Object,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Common => "/xmlrpc/2/common",
            Self::Object => "/xmlrpc/2/object",
        }
    }
}

/// Failure of a single remote procedure call
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Server fault {code}: {message}")]
    Fault { code: i64, message: String },

    #[error("Malformed XML-RPC response: {0}")]
    Xml(String),

    #[error("Failed to encode XML-RPC request: {0}")]
    Encode(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Something that can carry an XML-RPC call to a server and bring back the result
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn call(&self, endpoint: Endpoint, method: &str, params: Vec<Value>) -> Result<Value, RpcError>;
}
