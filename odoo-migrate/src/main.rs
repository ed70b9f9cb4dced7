mod cli;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Compare(args) => cli::commands::compare::handle_compare_command(cli.config.as_deref(), args).await,
        Commands::Migrate(args) => cli::commands::migrate::handle_migrate_command(cli.config.as_deref(), args).await,
        Commands::Fields(args) => cli::commands::fields::handle_fields_command(cli.config.as_deref(), args).await,
        Commands::Servers => cli::commands::servers::handle_servers_command(cli.config.as_deref()),
    }
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();
}
