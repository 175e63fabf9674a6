use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use mattertime::Settings;

mod cli_bin;

use cli_bin::args::{Cli, Commands};
use cli_bin::commands;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let settings = Settings::load_or_default(cli.config.as_ref()).with_context(|| match &cli.config {
        Some(path) => format!("failed to load settings from {}", path.display()),
        None => "failed to load settings".to_string(),
    })?;

    match cli.command {
        Commands::Upsert(args) => commands::upsert_command(args),
        Commands::Stamp(args) => commands::stamp_command(args, settings),
        Commands::UpdateAll(args) => commands::update_all_command(args, settings),
        Commands::Watch(args) => commands::watch_command(args, settings),
        Commands::Config(command) => commands::config_command(command, settings),
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
