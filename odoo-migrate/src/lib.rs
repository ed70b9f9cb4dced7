//! Compare field schemas and copy records between Odoo servers
//!
//! ```no_run
//! # async fn run() -> Result<(), odoo_migrate::api::ApiError> {
//! use odoo_migrate::api::ServerConfig;
//! use odoo_migrate::migration::{compare_entities, migrate_entities};
//!
//! let source = ServerConfig::new("https://old.example.com", "old", "admin", "secret");
//! let destination = ServerConfig::new("https://new.example.com", "new", "admin", "secret");
//!
//! let comparison = compare_entities(&source, &destination, "crm.tag").await?;
//! println!("common fields: {:?}", comparison.common);
//!
//! let created = migrate_entities(&source, &destination, "crm.tag", None, None).await?;
//! println!("created {} records", created.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod migration;
