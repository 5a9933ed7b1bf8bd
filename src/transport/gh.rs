use std::time::Duration;

use anyhow::Result;
use anyhow::bail;

use crate::error::SetupError;
use crate::labels::LabelDefinition;
use crate::manifest::Record;
use crate::ops::gh::CommandOutput;
use crate::ops::gh::GhOps;
use crate::sync::Created;
use crate::sync::Transport;

/// Stderr fragment gh prints when a label is already present.
const LABEL_EXISTS: &str = "already exists";

/// Pause between `gh issue create` calls.
pub const GH_ISSUE_DELAY: Duration = Duration::from_millis(300);
/// Label upserts through gh are not paced.
pub const GH_LABEL_DELAY: Duration = Duration::ZERO;

async fn check_auth(gh: &impl GhOps) -> Result<()> {
    if !gh.auth_status().await? {
        bail!(SetupError::NotAuthenticated);
    }
    Ok(())
}

fn failure_message(output: &CommandOutput) -> String {
    let stderr = output.stderr.trim();
    if stderr.is_empty() {
        "gh exited with an error".to_string()
    } else {
        stderr.to_string()
    }
}

// -----------------------------------------------------------------------------
// GhIssues

/// Creates issues with `gh issue create`.
pub struct GhIssues<G> {
    gh: G,
    results_url: Option<String>,
}

impl<G: GhOps> GhIssues<G> {
    pub fn new(gh: G, results_url: Option<String>) -> Self {
        Self { gh, results_url }
    }
}

impl<G: GhOps> Transport for GhIssues<G> {
    type Item = Record;

    fn noun(&self) -> &'static str {
        "issue"
    }

    fn default_delay(&self) -> Duration {
        GH_ISSUE_DELAY
    }

    fn results_url(&self) -> Option<String> {
        self.results_url.clone()
    }

    async fn preflight(&self) -> Result<()> {
        check_auth(&self.gh).await
    }

    async fn create(&self, record: &Record) -> Result<Created, String> {
        let output = self
            .gh
            .issue_create(record)
            .await
            .map_err(|e| format!("{:#}", e))?;
        if !output.success {
            return Err(failure_message(&output));
        }
        match output.stdout.trim() {
            "" => Err("gh printed no issue URL".to_string()),
            url => Ok(Created::Url(url.to_string())),
        }
    }
}

// -----------------------------------------------------------------------------
// GhLabels

/// Upserts labels with `gh label create --force`.
///
/// An "already exists" failure still counts as success.
pub struct GhLabels<G> {
    gh: G,
    results_url: Option<String>,
}

impl<G: GhOps> GhLabels<G> {
    pub fn new(gh: G, results_url: Option<String>) -> Self {
        Self { gh, results_url }
    }
}

impl<G: GhOps> Transport for GhLabels<G> {
    type Item = LabelDefinition;

    fn noun(&self) -> &'static str {
        "label"
    }

    fn default_delay(&self) -> Duration {
        GH_LABEL_DELAY
    }

    fn results_url(&self) -> Option<String> {
        self.results_url.clone()
    }

    async fn preflight(&self) -> Result<()> {
        check_auth(&self.gh).await
    }

    async fn create(&self, label: &LabelDefinition) -> Result<Created, String> {
        let output = self
            .gh
            .label_create(label)
            .await
            .map_err(|e| format!("{:#}", e))?;
        if output.success || output.stderr.contains(LABEL_EXISTS) {
            return Ok(Created::Upserted);
        }
        Err(failure_message(&output))
    }
}
