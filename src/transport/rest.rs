use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::instrument;

use crate::config::Config;
use crate::config::RepoSlug;
use crate::error::SetupError;
use crate::labels::LabelDefinition;
use crate::manifest::Record;
use crate::ops::http::HttpOps;
use crate::ops::http::HttpResponse;
use crate::sync::Created;
use crate::sync::Transport;

/// Pause between REST requests.
pub const REST_DELAY: Duration = Duration::from_secs(1);

// -----------------------------------------------------------------------------
// Types

#[derive(Debug, Serialize)]
struct CreateIssue<'a> {
    title: &'a str,
    body: &'a str,
    labels: &'a [String],
}

#[derive(Debug, Deserialize)]
struct Issue {
    number: u64,
}

#[derive(Debug, Serialize)]
struct CreateLabel<'a> {
    name: &'a str,
    color: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct UpdateLabel<'a> {
    color: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GitHubError {
    #[serde(default)]
    message: Option<String>,
}

/// Message for a failed response: the API's `message` field if the body is
/// JSON, otherwise the raw status and body.
fn error_message(response: &HttpResponse) -> String {
    match serde_json::from_str::<GitHubError>(&response.body) {
        Ok(error) => error
            .message
            .unwrap_or_else(|| "Unknown error".to_string()),
        Err(_) => format!("HTTP {}: {}", response.status, response.body),
    }
}

/// Whether a failed label creation means the label is already there.
fn is_conflict(response: &HttpResponse) -> bool {
    response.status == 422
        && (response.body.contains("already_exists")
            || error_message(response).contains("already exists"))
}

/// Shared location of a repository's REST endpoints.
struct Endpoint {
    api_base: String,
    repo: RepoSlug,
}

impl Endpoint {
    fn new(config: &Config) -> Result<Self, SetupError> {
        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            repo: config.require_repo()?.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.repo.owner, self.repo.name, path
        )
    }
}

// -----------------------------------------------------------------------------
// RestIssues

/// Creates one issue per record with `POST /repos/{owner}/{repo}/issues`.
pub struct RestIssues<H> {
    http: H,
    endpoint: Endpoint,
    results_url: Option<String>,
}

impl<H: HttpOps> RestIssues<H> {
    pub fn new(http: H, config: &Config) -> Result<Self, SetupError> {
        Ok(Self {
            http,
            endpoint: Endpoint::new(config)?,
            results_url: config.web_url("issues"),
        })
    }
}

impl<H: HttpOps> Transport for RestIssues<H> {
    type Item = Record;

    fn noun(&self) -> &'static str {
        "issue"
    }

    fn default_delay(&self) -> Duration {
        REST_DELAY
    }

    fn results_url(&self) -> Option<String> {
        self.results_url.clone()
    }

    #[instrument(skip_all)]
    async fn create(&self, record: &Record) -> Result<Created, String> {
        let payload = CreateIssue {
            title: record.title(),
            body: record.body(),
            labels: &record.labels,
        };
        let json_data = serde_json::to_string(&payload).map_err(|e| e.to_string())?;

        let response = self
            .http
            .post(&self.endpoint.url("issues"), &json_data)
            .await
            .map_err(|e| format!("{:#}", e))?;
        if !response.is_success() {
            return Err(error_message(&response));
        }

        let issue: Issue = serde_json::from_str(&response.body)
            .map_err(|e| format!("Unexpected response from GitHub: {}", e))?;
        Ok(Created::Number(issue.number))
    }
}

// -----------------------------------------------------------------------------
// RestLabels

/// Upserts labels: `POST .../labels`, then `PATCH .../labels/{name}` when the
/// label already exists.
pub struct RestLabels<H> {
    http: H,
    endpoint: Endpoint,
    results_url: Option<String>,
}

impl<H: HttpOps> RestLabels<H> {
    pub fn new(http: H, config: &Config) -> Result<Self, SetupError> {
        Ok(Self {
            http,
            endpoint: Endpoint::new(config)?,
            results_url: config.web_url("labels"),
        })
    }

    async fn update(&self, label: &LabelDefinition) -> Result<Created, String> {
        let payload = UpdateLabel {
            color: &label.color,
            description: label.description.as_deref(),
        };
        let json_data = serde_json::to_string(&payload).map_err(|e| e.to_string())?;
        let url = self
            .endpoint
            .url(&format!("labels/{}", urlencoding::encode(&label.name)));

        let response = self
            .http
            .patch(&url, &json_data)
            .await
            .map_err(|e| format!("{:#}", e))?;
        if !response.is_success() {
            return Err(error_message(&response));
        }
        Ok(Created::Upserted)
    }
}

impl<H: HttpOps> Transport for RestLabels<H> {
    type Item = LabelDefinition;

    fn noun(&self) -> &'static str {
        "label"
    }

    fn default_delay(&self) -> Duration {
        REST_DELAY
    }

    fn results_url(&self) -> Option<String> {
        self.results_url.clone()
    }

    #[instrument(skip_all)]
    async fn create(&self, label: &LabelDefinition) -> Result<Created, String> {
        let payload = CreateLabel {
            name: &label.name,
            color: &label.color,
            description: label.description.as_deref(),
        };
        let json_data = serde_json::to_string(&payload).map_err(|e| e.to_string())?;

        let response = self
            .http
            .post(&self.endpoint.url("labels"), &json_data)
            .await
            .map_err(|e| format!("{:#}", e))?;
        if response.is_success() {
            return Ok(Created::Upserted);
        }
        if is_conflict(&response) {
            debug!(label = %label.name, "Label exists, updating");
            return self.update(label).await;
        }
        Err(error_message(&response))
    }
}
