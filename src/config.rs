use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::SetupError;

pub const DEFAULT_MANIFEST: &str = "github-issues.json";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Matches `owner/name` and the GitHub remote URL forms git produces.
static GITHUB_REPO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:git@github\.com:|ssh://git@github\.com/|https://github\.com/)?([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?/?$",
    )
    .expect("valid regex")
});

// -----------------------------------------------------------------------------
// RepoSlug

/// A GitHub repository, e.g. `akonan/wiremd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }
}

impl FromStr for RepoSlug {
    type Err = String;

    /// Accepts `owner/name` or a GitHub remote URL (SSH or HTTPS).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = GITHUB_REPO
            .captures(s.trim())
            .ok_or_else(|| format!("Not a GitHub repository: {}", s))?;
        Ok(Self::new(&captures[1], &captures[2]))
    }
}

impl Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// -----------------------------------------------------------------------------
// Config

#[derive(Debug, Clone)]
pub struct Config {
    /// Manifest listing the issues to create.
    pub manifest: PathBuf,
    /// Target repository. Required for REST; the gh CLI falls back to the
    /// working directory's repository.
    pub repo: Option<RepoSlug>,
    pub api_base: String,
    /// Overrides the per-transport pause between requests.
    pub delay: Option<Duration>,
    /// Reject records without a title or body.
    pub strict: bool,
}

impl Config {
    /// Create a config with default settings for the given manifest
    pub fn new(manifest: PathBuf) -> Self {
        Self {
            manifest,
            repo: None,
            api_base: DEFAULT_API_BASE.to_string(),
            delay: None,
            strict: false,
        }
    }

    /// Default config for tests
    pub fn default_for_tests() -> Self {
        Self {
            repo: Some(RepoSlug::new("test", "repo")),
            ..Self::new(PathBuf::from(DEFAULT_MANIFEST))
        }
    }

    /// Find the target repository from git config.
    ///
    /// `ghbatch.repo` wins over the `origin` remote. Remotes on the web host
    /// of `api_base` are accepted as well as github.com ones.
    pub fn detect_repo(&self) -> Option<RepoSlug> {
        ["ghbatch.repo", "remote.origin.url"]
            .into_iter()
            .filter_map(git_config)
            .find_map(|value| self.parse_remote(&value))
    }

    /// Parse `owner/name`, a github.com remote, or a remote on this
    /// config's web host.
    pub fn parse_remote(&self, value: &str) -> Option<RepoSlug> {
        if let Ok(repo) = value.parse() {
            return Some(repo);
        }
        let web_base = self.web_base();
        let host = web_base
            .split_once("://")
            .map_or(web_base.as_str(), |(_, host)| host);
        let host = regex::escape(host.trim_end_matches('/'));
        let remote = Regex::new(&format!(
            r"^(?:git@{host}:|ssh://git@{host}/|https?://{host}/)([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?/?$"
        ))
        .ok()?;
        let captures = remote.captures(value.trim())?;
        Some(RepoSlug::new(&captures[1], &captures[2]))
    }

    pub fn require_repo(&self) -> Result<&RepoSlug, SetupError> {
        self.repo.as_ref().ok_or(SetupError::UnknownRepository)
    }

    /// Base URL of the web UI belonging to `api_base`.
    pub fn web_base(&self) -> String {
        let api_base = self.api_base.trim_end_matches('/');
        if api_base == DEFAULT_API_BASE {
            return "https://github.com".to_string();
        }
        // GitHub Enterprise serves the API under /api/v3 on the web host
        api_base
            .strip_suffix("/api/v3")
            .unwrap_or(api_base)
            .to_string()
    }

    /// Web page listing `kind` (e.g. "issues") of the target repository.
    pub fn web_url(&self, kind: &str) -> Option<String> {
        self.repo
            .as_ref()
            .map(|repo| format!("{}/{}/{}", self.web_base(), repo, kind))
    }
}

fn git_config(key: &str) -> Option<String> {
    let output = std::process::Command::new("git")
        .args(["config", "--get", key])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!value.is_empty()).then_some(value)
}
