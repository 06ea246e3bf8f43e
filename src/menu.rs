// src/menu.rs
// =============================================================================
// The numbered menu: print the options, read one line, validate it.
//
//   1. Download full repository
//   2. Download release: <name> (<tag>)
//   3. ...
//
// Input and output are passed in (BufRead / Write) instead of using
// stdin/stdout directly, so tests can feed a line and check what was
// printed without a terminal.
//
// There is exactly one attempt. A bad answer is reported and the run ends.
// =============================================================================

use crate::error::FetchError;
use crate::github::Release;
use std::io::{self, BufRead, Write};

// What the user asked us to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPlan {
    /// Clone the repository and copy its 'user' folder
    FullRepository,
    /// Download and extract this release's zipball
    Release(Release),
}

/// Prints the menu and the input prompt
pub fn render_menu<W: Write>(out: &mut W, releases: &[Release]) -> io::Result<()> {
    writeln!(out, "Choose an option:")?;
    writeln!(out, "1. Download full repository")?;
    for (i, release) in releases.iter().enumerate() {
        writeln!(
            out,
            "{}. Download release: {} ({})",
            i + 2,
            release.display_name(),
            release.tag_name
        )?;
    }
    write!(out, "Enter your choice: ")?;
    out.flush()
}

/// Reads a single line; end of input counts as an empty answer
pub fn read_choice<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

// Maps the typed line to a plan
//
// "1"          -> FullRepository
// "2"..="n+1"  -> Release(releases[k - 2])
// anything else (including "0", out of range, non-numeric) -> InvalidChoice
pub fn parse_choice(line: &str, releases: &[Release]) -> Result<FetchPlan, FetchError> {
    let answer = line.trim();

    if answer == "1" {
        return Ok(FetchPlan::FullRepository);
    }

    answer
        .parse::<usize>()
        .ok()
        .filter(|&k| k >= 2)
        .and_then(|k| releases.get(k - 2))
        .map(|release| FetchPlan::Release(release.clone()))
        .ok_or_else(|| FetchError::InvalidChoice(answer.to_string()))
}
