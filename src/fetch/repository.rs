// src/fetch/repository.rs
// =============================================================================
// "Download full repository": clone, then copy the 'user' folder out.
//
// Steps (any failure stops here, nothing after it runs):
// 1. Remove a clone left over from an earlier run
// 2. Clone the repository (full clone, working tree + history)
// 3. Check that the clone has a 'user' folder
// 4. Copy that folder's contents into the target directory
//
// A clone without a 'user' folder is left on disk. The next run deletes it
// in step 1.
// =============================================================================

use super::copy::copy_tree;
use super::{say, Scratch};
use crate::config::Settings;
use crate::error::FetchError;
use git2::Repository;
use std::fs;
use std::io::Write;

/// Folder inside the repository that gets copied to the target
pub const USER_FOLDER: &str = "user";

pub fn fetch_full_repository(
    settings: &Settings,
    scratch: &Scratch,
    out: &mut dyn Write,
) -> Result<(), FetchError> {
    if scratch.clone_dir.exists() {
        say(out, "Cleaning up previous clone...")?;
        fs::remove_dir_all(&scratch.clone_dir).map_err(FetchError::Cleanup)?;
    }

    say(out, "Cloning repository...")?;
    tracing::debug!(
        url = %settings.repository_url,
        path = %scratch.clone_dir.display(),
        "cloning"
    );
    // The handle is only needed to know the clone finished
    drop(Repository::clone(&settings.repository_url, &scratch.clone_dir)?);

    let user_folder = scratch.clone_dir.join(USER_FOLDER);
    if !user_folder.is_dir() {
        return Err(FetchError::MissingSubdirectory(USER_FOLDER.to_string()));
    }

    say(out, &format!("Copying '{}' folder...", USER_FOLDER))?;
    let copied = copy_tree(&user_folder, &settings.target_path).map_err(FetchError::Copy)?;
    tracing::debug!(files = copied, target = %settings.target_path.display(), "copy finished");

    say(
        out,
        &format!(
            "Repository downloaded and '{}' folder copied successfully!",
            USER_FOLDER
        ),
    )
}
