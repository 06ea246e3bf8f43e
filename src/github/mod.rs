// src/github/mod.rs
// =============================================================================
// This module handles everything that talks to the GitHub REST API.
//
// Currently implements:
// - Parsing repository web URLs into owner/repo (repo_url.rs)
// - Building the releases endpoint for github.com or an Enterprise host
// - Listing releases with their zipball download URLs (releases.rs)
//
// Rust concepts:
// - Modules: Organizing related functionality
// - Public API: What other parts of the app can use
// =============================================================================

mod releases;
mod repo_url;

// Re-export the pieces the rest of the app uses
pub use releases::{build_client, list_releases, Release};
pub use repo_url::{repository_name, RepoRef};
