//! Command-line options of the game binary.

use std::path::PathBuf;

use clap::Parser;

/// Default location of the save file holding the level to resume from.
pub const DEFAULT_SAVE_FILE: &str = "fogmaze.level";

/// Explore procedurally generated mazes through a fog of war.
#[derive(Debug, Parser, PartialEq, Eq)]
#[command(about, long_about = None, version)]
pub struct Cli {
    /// Level to start at, overriding the one stored in the save file
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub level: Option<u32>,

    /// Seed for a reproducible sequence of mazes
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// File the reached level is saved to and resumed from
    #[arg(long, default_value = DEFAULT_SAVE_FILE)]
    pub save_file: PathBuf,

    /// Write log messages to this file; the terminal itself is taken by the game
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
