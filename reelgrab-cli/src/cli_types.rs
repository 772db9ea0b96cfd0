//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "reelgrab")]
#[command(
    about = "Scrape Letterboxd watchlists and fetch torrent files for them",
    long_about = None
)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the films to fetch come from. Exactly one mode must be given.
#[derive(Args, Clone, Debug)]
pub(crate) struct SourceArgs {
    /// Letterboxd username whose watchlist to scrape
    #[arg(short, long)]
    pub user: Option<String>,

    /// Watchlist CSV (a previous snapshot or a Letterboxd export)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Title of a single film to fetch (requires --year)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Release year for --title
    #[arg(short, long)]
    pub year: Option<u16>,
}

#[derive(Args, Clone, Debug)]
pub(crate) struct FetchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory to save torrent files in
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Movie library to check; titles with a folder here are skipped
    #[arg(long)]
    pub library_dir: Option<PathBuf>,

    /// Acceptable qualities, most preferred first (e.g., 2160p,1080p,720p)
    #[arg(long, value_delimiter = ',')]
    pub quality: Option<Vec<String>>,

    /// Number of concurrent lookups/downloads
    #[arg(long)]
    pub threads: Option<usize>,

    /// Look up and select, but do not download anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Don't write a watchlist snapshot CSV in username mode
    #[arg(long)]
    pub no_snapshot: bool,

    /// Also write the run summary to this file
    #[arg(long)]
    pub log_summary: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Fetch torrent files for a watchlist, a snapshot file, or one film
    Fetch(FetchArgs),

    /// Export films rated at a star level; with several users, the ones they share
    Rated {
        /// Letterboxd username (repeat for several users)
        #[arg(short, long = "user", required = true)]
        users: Vec<String>,

        /// Star rating to collect
        #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,

        /// Directory for the CSV output (default: the snapshot directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective settings and where they come from
    Show,

    /// Write a settings file with the defaults (if none exists)
    Init,

    /// Print the settings file path
    Path,
}
