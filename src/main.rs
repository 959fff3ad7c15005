//! Soundbank CLI - Audio Bank Assembly
//!
//! Command-line interface for the soundbank assembly tool.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use soundbank::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Soundbank v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Soundbank v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Check { paths } => commands::check(&paths).context("import check failed"),
        Commands::Build {
            settings,
            output,
            debug_files,
        } => commands::build(&settings, output.as_deref(), debug_files)
            .context("bank build failed"),
        Commands::Inspect { bank } => commands::inspect(&bank).context("bank inspection failed"),
        Commands::Theme { theme, file } => {
            commands::theme(theme.as_deref(), &file).context("theme update failed")
        }
    }
}
