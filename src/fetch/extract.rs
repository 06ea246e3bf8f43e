// src/fetch/extract.rs
// =============================================================================
// Unpacks a release zipball into the target directory.
//
// GitHub zipballs contain a single top-level folder named
// "<owner>-<repo>-<short sha>/". We keep the archive layout as-is, so that
// folder ends up directly under the target.
//
// Entry names come from the archive and are not trusted: anything that
// would land outside the destination ("../x", "/etc/x") is skipped.
// =============================================================================

use crate::error::FetchError;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

/// Extracts every entry of the zip at `archive_path` under `destination`
///
/// Returns the number of files written.
pub fn extract_zip(archive_path: &Path, destination: &Path) -> Result<usize, FetchError> {
    let file = File::open(archive_path).map_err(ZipError::Io)?;
    let mut archive = ZipArchive::new(file)?;

    fs::create_dir_all(destination).map_err(ZipError::Io)?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(name = entry.name(), "skipping archive entry outside the target");
            continue;
        };
        let outpath = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath).map_err(ZipError::Io)?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent).map_err(ZipError::Io)?;
        }
        let mut outfile = File::create(&outpath).map_err(ZipError::Io)?;
        io::copy(&mut entry, &mut outfile).map_err(ZipError::Io)?;
        written += 1;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&outpath, fs::Permissions::from_mode(mode & 0o7777))
                    .map_err(ZipError::Io)?;
            }
        }
    }

    Ok(written)
}
