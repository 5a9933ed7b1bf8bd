//! Errors that abort a run before any record is submitted.

use std::path::PathBuf;

use thiserror::Error;

/// A fatal problem detected while preparing a run.
///
/// Per-record failures never surface here; transports report those as plain
/// messages and the synchronizer counts them.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The manifest file does not exist
    #[error("{} not found", .0.display())]
    ManifestNotFound(PathBuf),

    /// The manifest exists but could not be read
    #[error("Failed to read {}: {error}", path.display())]
    ManifestUnreadable {
        path: PathBuf,
        error: std::io::Error,
    },

    /// The manifest is not a JSON list of records
    #[error("Invalid JSON in {}: {error}", path.display())]
    MalformedManifest {
        path: PathBuf,
        error: serde_json::Error,
    },

    /// A record lacks a required field (strict mode only)
    #[error("Record {index} in {} has no {field}", path.display())]
    SchemaViolation {
        path: PathBuf,
        index: usize,
        field: &'static str,
    },

    #[error(
        "GitHub token required. Get a token from https://github.com/settings/tokens (required scopes: repo)"
    )]
    MissingToken,

    #[error("Could not determine the target repository. Pass --repo owner/name")]
    UnknownRepository,

    #[error("gh CLI not found. Install from https://cli.github.com/")]
    CliNotFound,

    #[error("GitHub CLI not authenticated. Run: gh auth login")]
    NotAuthenticated,
}
