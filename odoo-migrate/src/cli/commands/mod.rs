pub mod compare;
pub mod fields;
pub mod migrate;
pub mod servers;

use anyhow::{Context, Result};
use std::path::Path;

use odoo_migrate::api::{FieldType, ServerConfig};
use odoo_migrate::config::Config;

/// Load the config and resolve both ends of a transfer
pub(crate) fn resolve_pair(config_path: Option<&Path>, from: &str, to: &str) -> Result<(ServerConfig, ServerConfig)> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    let source = config
        .server(from)
        .with_context(|| format!("Failed to resolve source server '{}'", from))?;
    let destination = config
        .server(to)
        .with_context(|| format!("Failed to resolve destination server '{}'", to))?;
    Ok((source, destination))
}

/// `--exclude-type` values, or the relational kinds when none were given
pub(crate) fn exclude_kinds(exclude_types: &[String]) -> Vec<FieldType> {
    if exclude_types.is_empty() {
        FieldType::RELATIONAL.to_vec()
    } else {
        exclude_types.iter().map(|t| FieldType::from_tag(t)).collect()
    }
}
