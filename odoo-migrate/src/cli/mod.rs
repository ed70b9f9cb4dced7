//! Command-line interface

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "odoo-migrate")]
#[command(about = "Compare field schemas and copy records between Odoo servers")]
#[command(version)]
pub struct Cli {
    /// Path to the server configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare the fields of a model between two servers
    Compare(CompareCommands),

    /// Copy records of a model from one server to another
    Migrate(MigrateCommands),

    /// List the fields of a model on one server
    Fields(FieldsCommands),

    /// List configured servers
    Servers,
}

#[derive(Args)]
pub struct CompareCommands {
    /// Model name, e.g. crm.tag
    pub entity: String,

    /// Source server name
    #[arg(long)]
    pub from: String,

    /// Destination server name
    #[arg(long)]
    pub to: String,

    /// Field types to leave out (replaces the default many2one, one2many, many2many)
    #[arg(long = "exclude-type", value_name = "TYPE")]
    pub exclude_types: Vec<String>,
}

#[derive(Args)]
pub struct MigrateCommands {
    /// Model name, e.g. crm.tag
    pub entity: String,

    /// Source server name
    #[arg(long)]
    pub from: String,

    /// Destination server name
    #[arg(long)]
    pub to: String,

    /// Fields to read from the source (repeatable); non-relational fields by default
    #[arg(long = "field", value_name = "FIELD")]
    pub fields: Vec<String>,

    /// Domain filter as JSON, e.g. '[["active", "=", true]]'
    #[arg(long)]
    pub domain: Option<String>,

    /// Field types to leave out (replaces the default many2one, one2many, many2many)
    #[arg(long = "exclude-type", value_name = "TYPE")]
    pub exclude_types: Vec<String>,

    /// Show the records that would be created without creating them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct FieldsCommands {
    /// Model name, e.g. crm.tag
    pub entity: String,

    /// Server name
    #[arg(long)]
    pub server: String,

    /// Include relational fields
    #[arg(long)]
    pub all: bool,
}
