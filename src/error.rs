// src/error.rs
// =============================================================================
// One error type for everything that can go wrong during a run.
//
// Every failure is caught close to where it happens, printed as a single
// line, and stops the current step. Nothing is retried and nothing is
// turned into a different kind of error on the way up.
//
// The Display text of each variant is what the user sees. The "reason"
// variants (RepositoryUrl, Network, Extract) are printed behind a prefix chosen
// by the caller ("Failed to fetch releases: ...", "Failed to download or
// extract release: ...").
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[from]: lets the ? operator convert library errors automatically
// =============================================================================

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The settings file does not exist
    #[error("Settings file '{}' not found.", .0.display())]
    ConfigMissing(PathBuf),

    /// The settings file exists but is not usable (holds the file name)
    #[error("Invalid settings in '{0}'.")]
    ConfigInvalid(String),

    /// The repository URL (or the API address built from it) is unusable
    #[error("{0}")]
    RepositoryUrl(String),

    /// Listing releases or downloading the archive failed
    #[error("{0}")]
    Network(String),

    #[error("No releases found.")]
    NoReleasesFound,

    /// Holds the raw line the user typed
    #[error("Invalid choice. Exiting program.")]
    InvalidChoice(String),

    #[error("Failed to clone repository: {0}")]
    Clone(#[from] git2::Error),

    /// Holds the subdirectory name that was expected in the clone
    #[error("Folder '{0}' not found in the repository.")]
    MissingSubdirectory(String),

    #[error("Failed to copy 'user' folder: {0}")]
    Copy(#[source] io::Error),

    #[error("{0}")]
    Extract(#[from] zip::result::ZipError),

    #[error("Failed to delete temporary directory: {0}")]
    Cleanup(#[source] io::Error),

    /// Local file work on the release path (writing the archive, clearing the target)
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    /// Wraps an io::Error with a short description of what we were doing
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        FetchError::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        FetchError::Network(error.to_string())
    }
}
