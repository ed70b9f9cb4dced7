//! Servers command handler

use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

use odoo_migrate::config::Config;

pub fn handle_servers_command(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path).context("Failed to load configuration")?;

    if config.servers.is_empty() {
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => Config::default_path()?,
        };
        println!("No servers configured. Add [servers.<name>] tables to {}", path.display());
        return Ok(());
    }

    for (name, entry) in &config.servers {
        println!(
            "{}  {}  db={} user={}",
            name.bright_green().bold(),
            entry.url,
            entry.database,
            entry.username
        );
    }
    Ok(())
}
