// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The tool is meant to be double-clicked or run with no arguments: all the
// real configuration lives in Settings.json. The flags here only change
// where that file is read from, how chatty the logs are, and whether we
// pause before exiting.
//
// Rust concepts:
// - Derive macros: clap generates the parser from the struct definition
// - ArgAction::Count: -v, -vv, -vvv become 1, 2, 3
// =============================================================================

use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "release-fetch",
    version,
    about = "Fetch a GitHub repository's 'user' folder or one of its releases",
    long_about = "release-fetch reads RepositoryUrl and TargetPath from Settings.json next to \
                  the executable, lists the repository's releases, and lets you pick either \
                  the full repository (its 'user' folder is copied) or one release (its zipball \
                  is extracted, replacing the target)."
)]
pub struct Cli {
    /// Read settings from this file instead of Settings.json beside the executable
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Exit right away instead of waiting for a key press (or 10 seconds)
    #[arg(long)]
    pub no_wait: bool,

    /// Print diagnostic logs to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
