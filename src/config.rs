// src/config.rs
// =============================================================================
// Loads Settings.json, the only runtime configuration this tool has.
//
// The file lives next to the executable and looks like:
//
//   { "RepositoryUrl": "https://github.com/owner/repo", "TargetPath": "/some/dir" }
//
// There are no defaults and no environment-variable fallback. If the file
// is missing, unreadable, or either field is blank, the run stops before
// any network call is made.
//
// Rust concepts:
// - serde rename: map PascalCase JSON keys onto snake_case fields
// - Associated functions: Settings::load() instead of a free function
// =============================================================================

use crate::error::FetchError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the settings file (looked up beside the executable)
pub const SETTINGS_FILE_NAME: &str = "Settings.json";

// What we read from disk
//
// Both fields are plain Strings in the file. We keep the target as a
// PathBuf once it has been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub repository_url: String,
    pub target_path: PathBuf,
}

// Raw shape of the JSON file
//
// Fields default to empty so a missing key ends up in the same
// "blank field" check as an empty one.
#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(rename = "RepositoryUrl", default)]
    repository_url: String,
    #[serde(rename = "TargetPath", default)]
    target_path: String,
}

impl Settings {
    /// Path of Settings.json in the directory holding the running executable
    pub fn default_path() -> Result<PathBuf, FetchError> {
        Ok(executable_dir()?.join(SETTINGS_FILE_NAME))
    }

    /// Reads and validates the settings file at `path`
    pub fn load(path: &Path) -> Result<Self, FetchError> {
        if !path.is_file() {
            return Err(FetchError::ConfigMissing(path.to_path_buf()));
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| SETTINGS_FILE_NAME.to_string());

        let content = fs::read_to_string(path).map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "could not read settings");
            FetchError::ConfigInvalid(file_name.clone())
        })?;

        Self::parse(&content).ok_or(FetchError::ConfigInvalid(file_name))
    }

    // Parses the JSON text, returning None for anything unusable
    fn parse(content: &str) -> Option<Self> {
        let raw: RawSettings = match serde_json::from_str(content) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(error = %e, "settings are not valid JSON");
                return None;
            }
        };

        if raw.repository_url.trim().is_empty() || raw.target_path.trim().is_empty() {
            tracing::debug!("settings have a blank RepositoryUrl or TargetPath");
            return None;
        }

        Some(Settings {
            repository_url: raw.repository_url.trim().to_string(),
            target_path: PathBuf::from(raw.target_path),
        })
    }
}

/// Directory holding the running executable
///
/// Settings.json, the scratch clone, and the temporary archive all live here.
pub fn executable_dir() -> Result<PathBuf, FetchError> {
    let exe = std::env::current_exe()
        .map_err(|e| FetchError::io("locating the running executable", e))?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        FetchError::io(
            "locating the running executable",
            std::io::Error::new(std::io::ErrorKind::NotFound, "executable has no parent directory"),
        )
    })
}
