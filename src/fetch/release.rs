// src/fetch/release.rs
// =============================================================================
// "Download release": fetch the zipball of one tag and unpack it.
//
// How it works:
// 1. GET the release's zipball URL (must return 2xx)
// 2. Stream the body into release.zip beside the executable
// 3. Delete the target directory if it exists (no merge, no backup)
// 4. Extract the archive into the target directory
// 5. Always delete release.zip afterwards, whatever happened in 1-4
//
// A failure part-way through is not rolled back: if extraction fails after
// step 3, the old target is already gone.
//
// Rust concepts:
// - Streams: reading the HTTP body chunk by chunk with StreamExt::next()
// - tokio::fs: async file writes so the download doesn't block the runtime
// =============================================================================

use super::extract::extract_zip;
use super::{say, Scratch};
use crate::config::Settings;
use crate::error::FetchError;
use crate::github::Release;
use futures::StreamExt; // gives us .next() on the body stream
use reqwest::Client;
use std::fs;
use std::io::Write;
use std::path::Path;
use tokio::io::AsyncWriteExt;

pub async fn fetch_release(
    client: &Client,
    settings: &Settings,
    scratch: &Scratch,
    release: &Release,
    out: &mut dyn Write,
) -> Result<(), FetchError> {
    say(out, &format!("Downloading release version: {}", release.tag_name))?;

    let result = download_and_extract(client, settings, scratch, release, out).await;

    // Runs on every path, success or failure
    remove_archive(&scratch.archive_file);

    result
}

async fn download_and_extract(
    client: &Client,
    settings: &Settings,
    scratch: &Scratch,
    release: &Release,
    out: &mut dyn Write,
) -> Result<(), FetchError> {
    let bytes = download(client, &release.zipball_url, &scratch.archive_file).await?;
    tracing::debug!(bytes, path = %scratch.archive_file.display(), "archive downloaded");

    say(out, "Extracting release...")?;

    let target = &settings.target_path;
    if target.exists() {
        tracing::debug!(target = %target.display(), "removing existing target");
        fs::remove_dir_all(target)
            .map_err(|e| FetchError::io(format!("removing {}", target.display()), e))?;
    }

    let files = extract_zip(&scratch.archive_file, target)?;
    tracing::debug!(files, target = %target.display(), "archive extracted");

    say(out, "Release version downloaded and extracted successfully!")
}

// Streams `url` into the file at `destination`, returning the byte count
async fn download(client: &Client, url: &str, destination: &Path) -> Result<u64, FetchError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::Network(format!(
            "{} returned HTTP {}",
            url,
            response.status()
        )));
    }

    let mut file = tokio::fs::File::create(destination)
        .await
        .map_err(|e| FetchError::io("creating the temporary archive", e))?;

    let mut written = 0u64;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| FetchError::io("writing the temporary archive", e))?;
        written += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| FetchError::io("writing the temporary archive", e))?;

    Ok(written)
}

// Best effort: a leftover archive is overwritten by the next run anyway
fn remove_archive(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(e) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "could not delete temporary archive");
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why split fetch_release and download_and_extract?
//    - The inner function uses ? freely and returns on the first error
//    - The outer one always runs remove_archive, then hands back the result
//    - Rust has no try/finally; this "call, clean up, return" shape is the
//      usual way to get the same effect without a Drop guard
//
// 2. What is bytes_stream()?
//    - Turns the response body into a Stream of Bytes chunks
//    - We never hold the whole archive in memory
//    - Needs reqwest's "stream" feature (see Cargo.toml)
//
// 3. Why tokio::fs here but std::fs elsewhere?
//    - The download loop is already async, so its writes are async too
//    - Extraction and directory removal are plain blocking calls; this tool
//      does one thing at a time, so blocking briefly is fine
// -----------------------------------------------------------------------------
