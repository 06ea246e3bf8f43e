// src/app.rs
// =============================================================================
// One run of the tool, from the banner to the final success/failure line.
//
// What happens here:
// 0. Load Settings.json; a bad file ends the run before any backend exists
// 1. Print the repository name
// 2. List releases (a failed listing counts as "no releases")
// 3. Show the menu and read one answer
// 4. Dispatch the chosen FetchPlan to the backend
// 5. Print the failure line if the fetch failed
//
// The network/filesystem work sits behind the Backend trait. The real
// implementation is GitHubBackend; tests plug in a recording fake so we can
// check which path ran for a given answer.
//
// Rust concepts:
// - Traits: describe "something that can list and fetch" without saying how
// - Generics: run_session works with any Backend, reader, and writer
// - async fn in traits: supported natively since Rust 1.75
// =============================================================================

use crate::config::Settings;
use crate::error::FetchError;
use crate::fetch::{self, Scratch};
use crate::github::{self, repository_name, Release, RepoRef};
use crate::menu::{parse_choice, read_choice, render_menu, FetchPlan};
use reqwest::Client;
use std::io::{self, BufRead, Write};
use std::path::Path;
use url::Url;

// The side-effecting half of a run
pub trait Backend {
    /// Lists releases of the repository at `repository_url`, in API order
    async fn list_releases(&self, repository_url: &str) -> Result<Vec<Release>, FetchError>;

    /// Clone + copy the 'user' folder into the target path
    fn fetch_full_repository(
        &self,
        settings: &Settings,
        out: &mut dyn Write,
    ) -> Result<(), FetchError>;

    /// Download + extract `release` into the target path
    async fn fetch_release(
        &self,
        settings: &Settings,
        release: &Release,
        out: &mut dyn Write,
    ) -> Result<(), FetchError>;
}

/// Talks to GitHub over HTTP and writes scratch files beside the executable
pub struct GitHubBackend {
    client: Client,
    scratch: Scratch,
    // Replaces the API root derived from the repository URL
    api_base: Option<Url>,
}

impl GitHubBackend {
    pub fn new(scratch: Scratch) -> Result<Self, FetchError> {
        Ok(GitHubBackend {
            client: github::build_client()?,
            scratch,
            api_base: None,
        })
    }

    /// Sends API calls to `api_base` instead of the host's own API
    #[cfg(test)]
    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = Some(api_base);
        self
    }
}

impl Backend for GitHubBackend {
    async fn list_releases(&self, repository_url: &str) -> Result<Vec<Release>, FetchError> {
        let repo = RepoRef::parse(repository_url)?;
        let api_base = match &self.api_base {
            Some(base) => base.clone(),
            None => repo.api_base()?,
        };
        let endpoint = repo.releases_url(&api_base)?;
        github::list_releases(&self.client, &endpoint).await
    }

    fn fetch_full_repository(
        &self,
        settings: &Settings,
        out: &mut dyn Write,
    ) -> Result<(), FetchError> {
        fetch::fetch_full_repository(settings, &self.scratch, out)
    }

    async fn fetch_release(
        &self,
        settings: &Settings,
        release: &Release,
        out: &mut dyn Write,
    ) -> Result<(), FetchError> {
        fetch::fetch_release(&self.client, settings, &self.scratch, release, out).await
    }
}

// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Settings.json was missing or invalid, nothing else ran
    InvalidSettings,
    /// The listing failed or returned nothing, no menu was shown
    NoReleases,
    /// The answer didn't match a menu entry, nothing was fetched
    InvalidChoice,
    /// The chosen fetch finished
    Completed(FetchPlan),
    /// The chosen fetch failed part-way (the reason was printed)
    Failed(FetchPlan),
}

/// Loads the settings at `settings_path`, then runs one session
///
/// `make_backend` is only called once the settings are valid, so a bad
/// settings file never reaches the network.
pub async fn run_from_settings<B, F, R, W>(
    settings_path: &Path,
    make_backend: F,
    input: &mut R,
    out: &mut W,
) -> Result<Outcome, FetchError>
where
    B: Backend,
    F: FnOnce() -> Result<B, FetchError>,
    R: BufRead,
    W: Write,
{
    let settings = match Settings::load(settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            line(out, &e.to_string())?;
            return Ok(Outcome::InvalidSettings);
        }
    };
    tracing::info!(
        repository = %settings.repository_url,
        target = %settings.target_path.display(),
        "settings loaded"
    );

    let backend = make_backend()?;
    run_session(&backend, &settings, input, out).await
}

/// Runs the listing, the menu, and the chosen fetch
///
/// Every expected failure is printed to `out` and reported through the
/// returned Outcome. An Err means the console itself failed.
pub async fn run_session<B, R, W>(
    backend: &B,
    settings: &Settings,
    input: &mut R,
    out: &mut W,
) -> Result<Outcome, FetchError>
where
    B: Backend,
    R: BufRead,
    W: Write,
{
    line(out, &format!("Repository: {}\n", repository_name(&settings.repository_url)))?;
    line(out, "Fetching available releases...")?;

    let releases = match backend.list_releases(&settings.repository_url).await {
        Ok(releases) => releases,
        Err(e) => {
            line(out, &format!("Failed to fetch releases: {}", e))?;
            Vec::new()
        }
    };

    if releases.is_empty() {
        line(out, &FetchError::NoReleasesFound.to_string())?;
        return Ok(Outcome::NoReleases);
    }

    render_menu(out, &releases).map_err(console_error)?;
    let answer = read_choice(input).map_err(|e| FetchError::io("reading the menu choice", e))?;

    let plan = match parse_choice(&answer, &releases) {
        Ok(plan) => plan,
        Err(e) => {
            tracing::debug!(error = ?e, "rejected menu answer");
            line(out, &e.to_string())?;
            return Ok(Outcome::InvalidChoice);
        }
    };

    let result = match &plan {
        FetchPlan::FullRepository => backend.fetch_full_repository(settings, &mut *out),
        FetchPlan::Release(release) => backend.fetch_release(settings, release, &mut *out).await,
    };

    match result {
        Ok(()) => Ok(Outcome::Completed(plan)),
        Err(e) => {
            let message = match plan {
                FetchPlan::FullRepository => e.to_string(),
                FetchPlan::Release(_) => format!("Failed to download or extract release: {}", e),
            };
            line(out, &message)?;
            Ok(Outcome::Failed(plan))
        }
    }
}

fn line<W: Write>(out: &mut W, message: &str) -> Result<(), FetchError> {
    writeln!(out, "{}", message).map_err(console_error)
}

fn console_error(e: io::Error) -> FetchError {
    FetchError::io("writing to the console", e)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why &mut dyn Write in the Backend trait but W: Write in run_session?
//    - run_session is generic, so each caller gets its own copy (fast, no vtable)
//    - The trait methods take a trait object so a fake Backend in tests
//      doesn't need to be generic over the writer
//    - &mut *out reborrows the generic writer as a trait object
//
// 2. Why RefCell in the fake backend?
//    - Backend methods take &self (shared borrow)
//    - The fake still needs to record calls, which means mutation
//    - RefCell moves the borrow check to runtime for that one field
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;
    use tempfile::TempDir;

    // Records which fetch ran and with what
    #[derive(Default)]
    struct FakeBackend {
        releases: Vec<Release>,
        listing_fails: bool,
        fetch_fails: bool,
        calls: RefCell<Vec<String>>,
    }

    impl FakeBackend {
        fn with_releases(count: usize) -> Self {
            FakeBackend {
                releases: (1..=count)
                    .map(|i| Release {
                        tag_name: format!("v{}", i),
                        name: Some(format!("Release {}", i)),
                        zipball_url: format!("https://api.github.com/repos/o/r/zipball/v{}", i),
                    })
                    .collect(),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl Backend for FakeBackend {
        async fn list_releases(&self, _url: &str) -> Result<Vec<Release>, FetchError> {
            self.calls.borrow_mut().push("list".to_string());
            if self.listing_fails {
                return Err(FetchError::Network("HTTP 403 Forbidden".to_string()));
            }
            Ok(self.releases.clone())
        }

        fn fetch_full_repository(
            &self,
            _settings: &Settings,
            _out: &mut dyn Write,
        ) -> Result<(), FetchError> {
            self.calls.borrow_mut().push("full".to_string());
            if self.fetch_fails {
                return Err(FetchError::MissingSubdirectory("user".to_string()));
            }
            Ok(())
        }

        async fn fetch_release(
            &self,
            _settings: &Settings,
            release: &Release,
            _out: &mut dyn Write,
        ) -> Result<(), FetchError> {
            self.calls
                .borrow_mut()
                .push(format!("release {}", release.zipball_url));
            if self.fetch_fails {
                return Err(FetchError::Network("HTTP 500".to_string()));
            }
            Ok(())
        }
    }

    fn settings() -> Settings {
        Settings {
            repository_url: "https://github.com/owner/tools".to_string(),
            target_path: PathBuf::from("/tmp/never-used"),
        }
    }

    async fn session(backend: &FakeBackend, answer: &str) -> (Outcome, String) {
        let mut input = Cursor::new(answer.to_string());
        let mut out = Vec::<u8>::new();
        let outcome = run_session(backend, &settings(), &mut input, &mut out)
            .await
            .unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_no_releases_means_no_fetch() {
        let backend = FakeBackend::with_releases(0);
        let (outcome, text) = session(&backend, "1\n").await;

        assert_eq!(outcome, Outcome::NoReleases);
        assert_eq!(backend.calls(), vec!["list"]);
        assert!(text.starts_with("Repository: tools\n\nFetching available releases...\n"));
        assert!(text.contains("No releases found."));
        assert!(!text.contains("Choose an option:"));
    }

    #[tokio::test]
    async fn test_failed_listing_is_reported_as_no_releases() {
        let backend = FakeBackend {
            listing_fails: true,
            ..FakeBackend::with_releases(2)
        };
        let (outcome, text) = session(&backend, "2\n").await;

        assert_eq!(outcome, Outcome::NoReleases);
        assert!(text.contains("Failed to fetch releases: HTTP 403 Forbidden"));
        assert!(text.contains("No releases found."));
        assert_eq!(backend.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn test_one_runs_full_repository_only() {
        let backend = FakeBackend::with_releases(3);
        let (outcome, text) = session(&backend, "1\n").await;

        assert_eq!(outcome, Outcome::Completed(FetchPlan::FullRepository));
        assert_eq!(backend.calls(), vec!["list", "full"]);
        assert!(text.contains("4. Download release: Release 3 (v3)"));
    }

    #[tokio::test]
    async fn test_release_answers_pick_matching_archive() {
        for (answer, tag) in [("2\n", "v1"), ("3\n", "v2"), ("4\n", "v3")] {
            let backend = FakeBackend::with_releases(3);
            session(&backend, answer).await;

            assert_eq!(
                backend.calls(),
                vec![
                    "list".to_string(),
                    format!("release https://api.github.com/repos/o/r/zipball/{}", tag)
                ]
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_answers_fetch_nothing() {
        for answer in ["0\n", "99\n", "latest\n", ""] {
            let backend = FakeBackend::with_releases(3);
            let (outcome, text) = session(&backend, answer).await;

            assert_eq!(outcome, Outcome::InvalidChoice);
            assert_eq!(backend.calls(), vec!["list"]);
            assert!(text.ends_with("Invalid choice. Exiting program.\n"));
        }
    }

    #[tokio::test]
    async fn test_failed_release_fetch_is_prefixed() {
        let backend = FakeBackend {
            fetch_fails: true,
            ..FakeBackend::with_releases(1)
        };
        let (outcome, text) = session(&backend, "2\n").await;

        assert!(matches!(outcome, Outcome::Failed(FetchPlan::Release(_))));
        assert!(text.ends_with("Failed to download or extract release: HTTP 500\n"));
    }

    #[tokio::test]
    async fn test_failed_full_fetch_prints_reason() {
        let backend = FakeBackend {
            fetch_fails: true,
            ..FakeBackend::with_releases(1)
        };
        let (outcome, text) = session(&backend, "1\n").await;

        assert_eq!(outcome, Outcome::Failed(FetchPlan::FullRepository));
        assert!(text.ends_with("Folder 'user' not found in the repository.\n"));
    }

    async fn from_settings_file(
        content: Option<&str>,
        built: &Cell<bool>,
    ) -> (Outcome, String) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Settings.json");
        if let Some(content) = content {
            fs::write(&path, content).unwrap();
        }
        let mut input = Cursor::new("1\n");
        let mut out = Vec::<u8>::new();
        let outcome = run_from_settings(
            &path,
            || {
                built.set(true);
                Ok(FakeBackend::with_releases(1))
            },
            &mut input,
            &mut out,
        )
        .await
        .unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_missing_field_never_builds_backend() {
        let built = Cell::new(false);
        let (outcome, text) =
            from_settings_file(Some(r#"{"RepositoryUrl": "https://github.com/o/r"}"#), &built).await;

        assert_eq!(outcome, Outcome::InvalidSettings);
        assert_eq!(text, "Invalid settings in 'Settings.json'.\n");
        assert!(!built.get());
    }

    #[tokio::test]
    async fn test_missing_settings_file_never_builds_backend() {
        let built = Cell::new(false);
        let (outcome, text) = from_settings_file(None, &built).await;

        assert_eq!(outcome, Outcome::InvalidSettings);
        assert!(text.starts_with("Settings file '"));
        assert!(text.ends_with("Settings.json' not found.\n"));
        assert!(!built.get());
    }

    #[tokio::test]
    async fn test_valid_settings_run_the_session() {
        let built = Cell::new(false);
        let (outcome, text) = from_settings_file(
            Some(r#"{"RepositoryUrl": "https://github.com/o/r", "TargetPath": "/tmp/unused"}"#),
            &built,
        )
        .await;

        assert!(built.get());
        assert_eq!(outcome, Outcome::Completed(FetchPlan::FullRepository));
        assert!(text.starts_with("Repository: r\n"));
    }

    #[tokio::test]
    async fn test_failed_listing_names_url_once() {
        use mockito::Server;

        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/repos/owner/tools/releases")
            .with_status(404)
            .create_async()
            .await;

        let work = TempDir::new().unwrap();
        let backend = GitHubBackend::new(Scratch::in_dir(work.path()))
            .unwrap()
            .with_api_base(Url::parse(&server.url()).unwrap());

        let mut out = Vec::<u8>::new();
        let outcome = run_session(&backend, &settings(), &mut Cursor::new(""), &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(outcome, Outcome::NoReleases);
        assert!(text.contains(&format!(
            "Failed to fetch releases: {}/repos/owner/tools/releases returned HTTP 404 Not Found\n",
            server.url()
        )));
        assert_eq!(text.matches("Failed to fetch").count(), 1);
    }

    #[tokio::test]
    async fn test_github_backend_end_to_end_release() {
        use mockito::Server;
        use std::io::Write as _;
        use zip::write::SimpleFileOptions;

        let mut archive = zip::ZipWriter::new(Cursor::new(Vec::<u8>::new()));
        archive
            .start_file("owner-tools-abc/user/tool.cfg", SimpleFileOptions::default())
            .unwrap();
        archive.write_all(b"mode=release").unwrap();
        let archive = archive.finish().unwrap().into_inner();

        let mut server = Server::new_async().await;
        let listing = format!(
            r#"[{{"tag_name": "v9", "name": "Nine", "zipball_url": "{}/repos/owner/tools/zipball/v9"}}]"#,
            server.url()
        );
        let _list = server
            .mock("GET", "/repos/owner/tools/releases")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(listing)
            .create_async()
            .await;
        let _zip = server
            .mock("GET", "/repos/owner/tools/zipball/v9")
            .with_status(200)
            .with_body(archive)
            .create_async()
            .await;

        let work = TempDir::new().unwrap();
        let settings = Settings {
            repository_url: "https://github.com/owner/tools".to_string(),
            target_path: work.path().join("target"),
        };
        let backend = GitHubBackend::new(Scratch::in_dir(work.path()))
            .unwrap()
            .with_api_base(Url::parse(&server.url()).unwrap());

        let mut input = Cursor::new("2\n");
        let mut out = Vec::<u8>::new();
        let outcome = run_session(&backend, &settings, &mut input, &mut out)
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Completed(FetchPlan::Release(ref r)) if r.tag_name == "v9"));
        assert_eq!(
            fs::read_to_string(work.path().join("target/owner-tools-abc/user/tool.cfg")).unwrap(),
            "mode=release"
        );
        assert!(!work.path().join("release.zip").exists());
    }
}
