// src/github/releases.rs
// =============================================================================
// Lists the published releases of a repository through the REST API.
//
// Strategy:
// - Build the endpoint from a RepoRef (see repo_url.rs)
// - One GET request, identified with a User-Agent (GitHub rejects requests
//   without one)
// - Parse the JSON array and keep the three fields we use
//
// No pagination: we show whatever the first page holds, in API order.
//
// Rust concepts:
// - async functions: For network I/O
// - serde Deserialize: unknown JSON fields are skipped automatically
// =============================================================================

use crate::error::FetchError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;

/// Sent with every request we make
pub const CLIENT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// One entry from GET /repos/{owner}/{repo}/releases
//
// `name` is nullable in the API (releases created from a bare tag have no
// title), so it is optional here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    pub zipball_url: String,
}

impl Release {
    /// Title for the menu, falling back to the tag when the release has none
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.tag_name,
        }
    }
}

/// Builds the HTTP client shared by the listing and the archive download
///
/// Every request carries our User-Agent, including the zipball download
/// (which is served by the API host too).
pub fn build_client() -> Result<Client, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

    Client::builder()
        .default_headers(headers)
        .build()
        .map_err(FetchError::from)
}

// Fetches and parses the release list
//
// Parameters:
//   client: reqwest HTTP client (from build_client)
//   url: the releases endpoint, e.g. https://api.github.com/repos/owner/repo/releases
//
// Returns: releases in the order the API returned them (possibly empty)
pub async fn list_releases(client: &Client, url: &url::Url) -> Result<Vec<Release>, FetchError> {
    tracing::debug!(%url, "listing releases");

    let response = client
        .get(url.as_str())
        .header(ACCEPT, "application/vnd.github+json")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(FetchError::Network(format!(
            "{} returned HTTP {}",
            url,
            response.status()
        )));
    }

    let releases: Vec<Release> = response.json().await?;
    tracing::debug!(count = releases.len(), "releases received");
    Ok(releases)
}
