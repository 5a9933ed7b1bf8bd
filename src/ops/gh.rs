#![allow(async_fn_in_trait)]

use anyhow::Context;
use anyhow::Result;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::instrument;

use crate::config::RepoSlug;
use crate::error::SetupError;
use crate::labels::LabelDefinition;
use crate::manifest::Record;

// -----------------------------------------------------------------------------
// GhOps trait

/// Operations delegated to the GitHub CLI.
#[cfg_attr(test, automock)]
pub trait GhOps {
    /// Whether the local gh session is authenticated.
    async fn auth_status(&self) -> Result<bool>;

    async fn issue_create(&self, record: &Record) -> Result<CommandOutput>;

    /// Create a label, overwriting an existing one with the same name.
    async fn label_create(&self, label: &LabelDefinition) -> Result<CommandOutput>;
}

/// Captured result of a finished gh invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

// -----------------------------------------------------------------------------
// RealGh

/// Real implementation that calls the gh CLI.
///
/// Without a repository gh targets the repository of the working directory.
pub struct RealGh {
    pub repo: Option<RepoSlug>,
}

impl RealGh {
    pub fn new(repo: Option<RepoSlug>) -> Self {
        Self { repo }
    }

    async fn run(&self, mut args: Vec<String>) -> Result<CommandOutput> {
        if let Some(repo) = &self.repo {
            args.push("--repo".to_string());
            args.push(repo.to_string());
        }

        let output = Command::new("gh")
            .args(&args)
            .output()
            .await
            .context("Failed to execute gh command")?;

        Ok(output.into())
    }
}

impl GhOps for RealGh {
    async fn auth_status(&self) -> Result<bool> {
        let output = match Command::new("gh").args(["auth", "status"]).output().await {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SetupError::CliNotFound.into());
            }
            Err(e) => return Err(e).context("Failed to execute gh command"),
        };
        Ok(output.status.success())
    }

    #[instrument(skip_all)]
    async fn issue_create(&self, record: &Record) -> Result<CommandOutput> {
        self.run(issue_create_args(record)).await
    }

    #[instrument(skip_all)]
    async fn label_create(&self, label: &LabelDefinition) -> Result<CommandOutput> {
        self.run(label_create_args(label)).await
    }
}

/// Arguments for `gh issue create`. Labels are comma-joined and omitted when
/// the record has none.
pub fn issue_create_args(record: &Record) -> Vec<String> {
    let mut args: Vec<String> = [
        "issue",
        "create",
        "--title",
        record.title(),
        "--body",
        record.body(),
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    if !record.labels.is_empty() {
        args.push("--label".to_string());
        args.push(record.labels.join(","));
    }
    args
}

/// Arguments for `gh label create ... --force`.
pub fn label_create_args(label: &LabelDefinition) -> Vec<String> {
    let mut args: Vec<String> = [
        "label",
        "create",
        label.name.as_str(),
        "--color",
        label.color.as_str(),
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    if let Some(description) = label.description.as_deref().filter(|d| !d.is_empty()) {
        args.push("--description".to_string());
        args.push(description.to_string());
    }
    args.push("--force".to_string());
    args
}
