//! Migrate command handler

use anyhow::{Context, Result};
use colored::*;
use serde_json::Value;
use std::path::Path;

use super::{exclude_kinds, resolve_pair};
use crate::cli::MigrateCommands;
use odoo_migrate::migration::{MigrationOptions, migrate_entities_with};

pub async fn handle_migrate_command(config_path: Option<&Path>, args: MigrateCommands) -> Result<()> {
    let domain = args.domain.as_deref().map(parse_domain).transpose()?;
    let (source, destination) = resolve_pair(config_path, &args.from, &args.to)?;

    let options = MigrationOptions {
        fields: (!args.fields.is_empty()).then_some(args.fields),
        domain,
        exclude_kinds: exclude_kinds(&args.exclude_types),
        dry_run: args.dry_run,
    };

    let report = migrate_entities_with(&source, &destination, &args.entity, &options)
        .await
        .with_context(|| format!("Failed to migrate '{}' from {} to {}", args.entity, args.from, args.to))?;

    if report.dry_run {
        println!(
            "{} {} records of {} would be created on {}",
            "Dry run:".bright_yellow().bold(),
            report.projected.len(),
            args.entity.bright_white(),
            args.to.cyan()
        );
        let fields: Vec<&str> = report.common_fields.iter().map(String::as_str).collect();
        println!("Fields: {}", fields.join(", ").dimmed());
        println!();
        println!(
            "{}",
            serde_json::to_string_pretty(&report.projected).context("Failed to format records")?
        );
        return Ok(());
    }

    let ids: Vec<String> = report.created_ids.iter().map(i64::to_string).collect();
    println!(
        "Created {} of {} records of {} on {}",
        report.created_ids.len().to_string().bright_green().bold(),
        report.records_read(),
        args.entity.bright_white(),
        args.to.cyan()
    );
    if !ids.is_empty() {
        println!("IDs: {}", ids.join(", "));
    }
    if report.failed() > 0 {
        println!(
            "{}",
            format!("{} records failed to create, see the log for details", report.failed()).bright_red()
        );
    }

    Ok(())
}

/// Parse a domain given as a JSON array of terms
fn parse_domain(raw: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(raw).with_context(|| format!("Invalid domain JSON: {}", raw))?;
    match value {
        Value::Array(terms) => Ok(terms),
        _ => anyhow::bail!("Domain must be a JSON array, e.g. '[[\"active\", \"=\", true]]'"),
    }
}
