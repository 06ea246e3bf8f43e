// src/github/repo_url.rs
// =============================================================================
// Turns a repository web URL into the pieces we need to talk to the API.
//
// Input:  https://github.com/owner/repo   (what the user puts in Settings.json)
// Output: https://api.github.com/repos/owner/repo/releases
//
// The URL is parsed into host + path segments and the API address is built
// from those parts. Hosts other than github.com are treated as GitHub
// Enterprise servers, whose API lives under /api/v3/ on the same host.
//
// Rust concepts:
// - url::Url: a parsed URL with typed accessors (host, port, path segments)
// - Option combinators: and_then / filter / map instead of nested ifs
// =============================================================================

use crate::error::FetchError;
use url::Url;

const PUBLIC_HOST: &str = "github.com";
const PUBLIC_API: &str = "https://api.github.com/";

/// Shown when the repository name can't be read from the configured URL
pub const UNKNOWN_REPOSITORY: &str = "Unknown Repository";

// A repository on a GitHub-style host
//
// Example:
//   "https://github.com/rust-lang/rust.git" -> host "github.com", owner "rust-lang", repo "rust"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Parses a web URL such as `https://github.com/owner/repo`
    ///
    /// Accepts a trailing `.git`, a trailing slash, and extra segments after
    /// the repository name (`/tree/main`, `/releases`, ...), which are ignored.
    pub fn parse(repository_url: &str) -> Result<Self, FetchError> {
        let url = Url::parse(repository_url.trim()).map_err(|e| {
            FetchError::RepositoryUrl(format!(
                "Invalid repository URL '{}': {}",
                repository_url, e
            ))
        })?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(FetchError::RepositoryUrl(format!(
                "Unsupported URL scheme '{}' in {}",
                url.scheme(),
                repository_url
            )));
        }

        let host = url
            .host_str()
            .ok_or_else(|| {
                FetchError::RepositoryUrl(format!("URL has no host: {}", repository_url))
            })?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        if segments.len() < 2 {
            return Err(FetchError::RepositoryUrl(format!(
                "Expected https://{}/<owner>/<repo>, got {}",
                host, repository_url
            )));
        }

        let owner = segments[0].to_string();
        let repo = segments[1].trim_end_matches(".git").to_string();

        if repo.is_empty() {
            return Err(FetchError::RepositoryUrl(format!(
                "Missing repository name in {}",
                repository_url
            )));
        }

        Ok(RepoRef {
            scheme: url.scheme().to_string(),
            host: host.to_ascii_lowercase(),
            port: url.port(),
            owner,
            repo,
        })
    }

    /// Root of the REST API serving this repository (always ends with '/')
    pub fn api_base(&self) -> Result<Url, FetchError> {
        let base = if self.host == PUBLIC_HOST || self.host == "www.github.com" {
            PUBLIC_API.to_string()
        } else {
            match self.port {
                Some(port) => format!("{}://{}:{}/api/v3/", self.scheme, self.host, port),
                None => format!("{}://{}/api/v3/", self.scheme, self.host),
            }
        };

        Url::parse(&base).map_err(|e| {
            FetchError::RepositoryUrl(format!("Invalid API address '{}': {}", base, e))
        })
    }

    /// `<api_base>repos/<owner>/<repo>/releases`
    pub fn releases_url(&self, api_base: &Url) -> Result<Url, FetchError> {
        let mut url = api_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                FetchError::RepositoryUrl(format!("API address cannot be a base: {}", api_base))
            })?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str(), "releases"]);
        Ok(url)
    }
}

/// Repository name for the banner line
///
/// Falls back to "Unknown Repository" instead of failing, the banner is only
/// informational.
pub fn repository_name(repository_url: &str) -> String {
    Url::parse(repository_url.trim())
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|mut segments| segments.nth(1).map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_REPOSITORY.to_string())
}
