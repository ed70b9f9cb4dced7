//! Fields command handler

use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

use crate::cli::FieldsCommands;
use odoo_migrate::api::OdooClient;
use odoo_migrate::config::Config;

pub async fn handle_fields_command(config_path: Option<&Path>, args: FieldsCommands) -> Result<()> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    let server = config
        .server(&args.server)
        .with_context(|| format!("Failed to resolve server '{}'", args.server))?;

    let client = OdooClient::connect(&server)
        .await
        .with_context(|| format!("Failed to connect to '{}'", args.server))?;
    let fields = client
        .describe_fields(&args.entity)
        .await
        .with_context(|| format!("Failed to list fields of '{}'", args.entity))?;

    let width = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let mut shown = 0;
    for field in &fields {
        if field.field_type.is_relational() {
            if !args.all {
                continue;
            }
            println!("{:width$}  {}", field.name, field.field_type.to_string().dimmed(), width = width);
        } else {
            println!("{:width$}  {}", field.name, field.field_type.to_string().cyan(), width = width);
        }
        shown += 1;
    }

    println!();
    println!(
        "{} of {} fields on {} ({})",
        shown,
        fields.len(),
        args.entity.bright_white(),
        args.server
    );
    Ok(())
}
