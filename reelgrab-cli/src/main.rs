//! reelgrab CLI
//!
//! Scrape a Letterboxd watchlist (or read a saved one) and fetch a torrent
//! file for every film at the best available quality.

mod cli_types;
mod commands;
mod error;
mod logging;
mod spinner;

use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use cli_types::{Cli, Commands, ConfigAction};
use error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Could not open log file: {}", e);
        return ExitCode::FAILURE;
    }

    let result: Result<(), CliError> = match cli.command {
        Commands::Fetch(args) => commands::fetch::run_fetch(args, cli.quiet),
        Commands::Rated {
            users,
            rating,
            output_dir,
        } => commands::rated::run_rated(users, rating, output_dir, cli.quiet),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Init => commands::config::run_config_init(),
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!(
                "{} {}",
                "\u{2718}".if_supports_color(Stderr, |t| t.red()),
                e,
            );
            ExitCode::FAILURE
        }
    }
}
