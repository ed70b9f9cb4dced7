//! Compare command handler

use anyhow::{Context, Result};
use colored::*;
use std::collections::BTreeSet;
use std::path::Path;

use super::{exclude_kinds, resolve_pair};
use crate::cli::CompareCommands;
use odoo_migrate::migration::compare_entities_with;

pub async fn handle_compare_command(config_path: Option<&Path>, args: CompareCommands) -> Result<()> {
    let (source, destination) = resolve_pair(config_path, &args.from, &args.to)?;
    let exclude = exclude_kinds(&args.exclude_types);

    let comparison = compare_entities_with(&source, &destination, &args.entity, &exclude)
        .await
        .with_context(|| format!("Failed to compare '{}'", args.entity))?;

    println!(
        "Fields of {} on {} vs {}",
        args.entity.bright_white().bold(),
        args.from.cyan(),
        args.to.cyan()
    );
    println!();
    print_set(&format!("Only on {}", args.from), &comparison.unique_to_source, Color::Yellow);
    print_set(&format!("Only on {}", args.to), &comparison.unique_to_destination, Color::Magenta);
    print_set("Common", &comparison.common, Color::Green);

    if comparison.is_identical() {
        println!("{}", "Both servers expose the same fields.".bright_green());
    }

    Ok(())
}

fn print_set(title: &str, fields: &BTreeSet<String>, color: Color) {
    println!("{} ({})", title.bold(), fields.len());
    for field in fields {
        println!("  {}", field.color(color));
    }
    println!();
}
