// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and set up logging
// 2. Load Settings.json (stop here if it's missing or invalid)
// 3. Run one session: list releases, show the menu, fetch
// 4. Print any unexpected error instead of crashing
// 5. Wait for a key press (or 10 seconds when not on a terminal) and exit
//
// Rust concepts used:
// - async/await: the GitHub API call and the archive download are async
// - Result<T, E>: For error handling (T = success type, E = error type)
// - Closures: the backend is built lazily, only once the settings are valid
// =============================================================================

// Module declarations - tells Rust about our other source files
mod app;     // src/app.rs - one run: listing, menu, dispatch
mod cli;     // src/cli.rs - command-line parsing
mod config;  // src/config.rs - Settings.json
mod console; // src/console.rs - the exit wait
mod error;   // src/error.rs - FetchError
mod fetch;   // src/fetch/ - full repository and release fetchers
mod github;  // src/github/ - GitHub API access
mod menu;    // src/menu.rs - the numbered menu

use app::GitHubBackend;
use clap::Parser; // Parser trait enables the parse() method
use cli::Cli;
use config::Settings;
use error::FetchError;
use fetch::Scratch;
use std::io;
use tracing_subscriber::EnvFilter;

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Top-level catch-all: anything not handled inside the session ends up here
    if let Err(e) = run(&cli).await {
        println!("An unexpected error occurred: {}", e);
    }

    if !cli.no_wait {
        console::wait_before_exit().await;
    }
}

// This is the main application logic
//
// Expected failures (bad settings, no releases, a failed fetch) are printed
// where they happen and return Ok. Err is for everything else.
async fn run(cli: &Cli) -> Result<()> {
    let settings_path = match &cli.settings {
        Some(path) => path.clone(),
        None => Settings::default_path()?,
    };

    let make_backend = || -> Result<GitHubBackend, FetchError> {
        GitHubBackend::new(Scratch::in_dir(&config::executable_dir()?))
    };

    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();
    let outcome = app::run_from_settings(&settings_path, make_backend, &mut input, &mut out).await?;
    tracing::info!(?outcome, "session finished");

    Ok(())
}

// Sets up tracing output on stderr
//
// The level comes only from -v flags:
//   0 = warn, 1 = info, 2 = debug, 3+ = trace (for our crate; dependencies stay at warn)
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::new(format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
