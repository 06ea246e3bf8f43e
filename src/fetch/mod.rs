// src/fetch/mod.rs
// =============================================================================
// The two ways of getting content into the target directory.
//
// Submodules:
// - repository: clone the whole repository, copy its 'user' folder
// - release: download one release's zipball and extract it
// - copy: recursive directory copy (used by repository)
// - extract: zip extraction (used by release)
//
// Both fetchers print their progress lines to an injected writer and
// return an error instead of printing it. The caller decides how to
// report the failure.
// =============================================================================

mod copy;
mod extract;
mod release;
mod repository;

pub use release::fetch_release;
pub use repository::fetch_full_repository;

use crate::error::FetchError;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name of the scratch clone directory
pub const CLONE_DIR_NAME: &str = "TempRepo";
/// Name of the temporary archive file
pub const ARCHIVE_FILE_NAME: &str = "release.zip";

// Transient files owned by the current run
//
// Both live next to the executable. The clone directory survives a
// failed run and is removed at the start of the next full-repository
// fetch. The archive is removed before the release fetcher returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scratch {
    pub clone_dir: PathBuf,
    pub archive_file: PathBuf,
}

impl Scratch {
    pub fn in_dir(base: &Path) -> Self {
        Scratch {
            clone_dir: base.join(CLONE_DIR_NAME),
            archive_file: base.join(ARCHIVE_FILE_NAME),
        }
    }
}

// Prints one progress line
pub(crate) fn say(out: &mut dyn Write, message: &str) -> Result<(), FetchError> {
    writeln!(out, "{}", message)
        .and_then(|_| out.flush())
        .map_err(|e| FetchError::io("writing to the console", e))
}
