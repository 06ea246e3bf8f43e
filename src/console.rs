// src/console.rs
// =============================================================================
// The end-of-run pause that keeps the console window open.
//
// Two cases:
// - stdin or stdout redirected: nobody can press a key, wait 10 seconds
// - interactive terminal: switch to raw mode and return on the first key
//   press (any key, not just Enter), then restore the terminal
//
// Rust concepts:
// - crossterm: portable raw mode and key events
// - Closures as parameters: the event source is passed in so tests can
//   feed scripted events instead of a real terminal
// =============================================================================

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::terminal;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;

/// How long to keep the window open when nobody can press a key
const REDIRECTED_EXIT_DELAY: Duration = Duration::from_secs(10);

/// Waits for a key press, or a fixed delay when the console is redirected
pub async fn wait_before_exit() {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        println!("Output or input is redirected. Exiting in 10 seconds...");
        tokio::time::sleep(REDIRECTED_EXIT_DELAY).await;
        return;
    }

    println!("Press any key to exit...");
    if let Err(e) = io::stdout().flush() {
        tracing::warn!(error = %e, "could not flush stdout");
    }

    if let Err(e) = read_key_raw() {
        tracing::warn!(error = %e, "could not read a key press");
    }
}

// Reads one key press with the terminal in raw mode
//
// Raw mode is always switched off again, even when reading fails.
fn read_key_raw() -> io::Result<KeyEvent> {
    terminal::enable_raw_mode()?;

    let result = next_key_press(event::read);

    if let Err(e) = terminal::disable_raw_mode() {
        tracing::warn!(error = %e, "could not restore the terminal mode");
    }
    result
}

// Pulls events until a key press shows up
//
// Resize, focus, mouse, and key release/repeat events are skipped.
// Windows reports both press and release, other platforms only press.
fn next_key_press<F>(mut next_event: F) -> io::Result<KeyEvent>
where
    F: FnMut() -> io::Result<Event>,
{
    loop {
        if let Event::Key(key) = next_event()? {
            if key.kind == KeyEventKind::Press {
                return Ok(key);
            }
        }
    }
}
