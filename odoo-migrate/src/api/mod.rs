//! Odoo external API module
//!
//! A thin client over Odoo's XML-RPC interface: authenticate once, then
//! introspect fields, read records and create records on a named model.

pub mod client;
pub mod error;
pub mod metadata;
pub mod models;
pub mod xmlrpc;

pub use client::{OdooClient, Record, authenticate};
pub use error::ApiError;
pub use metadata::{FieldDescriptor, FieldType};
pub use models::{ServerConfig, Session};
pub use xmlrpc::{Endpoint, HttpTransport, RpcError, RpcTransport};
