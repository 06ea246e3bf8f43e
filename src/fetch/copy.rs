// src/fetch/copy.rs
// =============================================================================
// Recursive directory copy used to move the 'user' folder out of the clone.
//
// Rules:
// - The target directory (and any subdirectory) is created as needed
// - Files are copied byte for byte, overwriting same-named files
// - Files that exist only in the target are left alone
// - Symlinks are followed: a linked file is copied as a regular file with
//   the target's bytes, a linked directory is copied as a directory
// - Only links that resolve inside the source folder are followed; links
//   pointing elsewhere (`user/x -> /`) are skipped with a warning
// - Special files (FIFOs, sockets, device nodes) are skipped with a warning
// - A dangling symlink fails the copy
// =============================================================================

use std::fs;
use std::io;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Copies the contents of `source` into `target`, returning the number of files copied
pub fn copy_tree(source: &Path, target: &Path) -> io::Result<usize> {
    let root = fs::canonicalize(source)?;
    fs::create_dir_all(target)?;

    let mut copied = 0;

    // min_depth(1) skips `source` itself, we only want what's inside it
    let walker = WalkDir::new(source)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| resolves_inside(entry, &root));

    for entry in walker {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let destination = target.join(relative);

        // With follow_links(true) this is the type of whatever the link points at
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&destination)?;
        } else if file_type.is_file() {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &destination)?;
            copied += 1;
        } else {
            tracing::warn!(path = %entry.path().display(), "skipping special file");
        }
    }

    Ok(copied)
}

// False for a symlink whose target lies outside `root`
//
// A link that can't be resolved is let through so the walk reports it.
fn resolves_inside(entry: &DirEntry, root: &Path) -> bool {
    if !entry.path_is_symlink() {
        return true;
    }
    match fs::canonicalize(entry.path()) {
        Ok(resolved) if resolved.starts_with(root) => true,
        Ok(resolved) => {
            tracing::warn!(
                link = %entry.path().display(),
                points_to = %resolved.display(),
                "skipping symlink outside the copied folder"
            );
            false
        }
        Err(_) => true,
    }
}
