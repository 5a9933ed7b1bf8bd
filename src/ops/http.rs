#![allow(async_fn_in_trait)]

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::instrument;

// -----------------------------------------------------------------------------
// HttpOps trait

/// JSON requests against the GitHub REST API.
///
/// Only transport failures are errors; any HTTP status comes back as a
/// [`HttpResponse`] for the caller to interpret.
#[cfg_attr(test, automock)]
pub trait HttpOps {
    async fn post(&self, url: &str, json_data: &str) -> Result<HttpResponse>;
    async fn patch(&self, url: &str, json_data: &str) -> Result<HttpResponse>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// -----------------------------------------------------------------------------
// CurlHttp

/// HTTP client using curl, authenticated with a bearer token.
pub struct CurlHttp {
    token: String,
}

impl CurlHttp {
    pub fn new(token: String) -> Self {
        Self { token }
    }

    async fn send(&self, method: &str, url: &str, json_data: &str) -> Result<HttpResponse> {
        let output = Command::new("curl")
            .args([
                "-s",
                "-w",
                "\n%{http_code}",
                "-X",
                method,
                "-H",
                &format!("Authorization: Bearer {}", self.token),
                "-H",
                "Accept: application/vnd.github+json",
                "-H",
                "Content-Type: application/json",
                "-H",
                "User-Agent: ghbatch",
                "-d",
                json_data,
                url,
            ])
            .output()
            .await
            .context("Failed to execute curl command")?;

        if !output.status.success() {
            bail!(
                "curl command failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        parse_response(output.stdout)
    }
}

impl HttpOps for CurlHttp {
    #[instrument(skip_all, fields(url = %url))]
    async fn post(&self, url: &str, json_data: &str) -> Result<HttpResponse> {
        self.send("POST", url, json_data).await
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn patch(&self, url: &str, json_data: &str) -> Result<HttpResponse> {
        self.send("PATCH", url, json_data).await
    }
}

/// Split curl output into body and the status code appended by `-w`.
fn parse_response(stdout: Vec<u8>) -> Result<HttpResponse> {
    let output_str = String::from_utf8(stdout)?;
    let Some((body, status)) = output_str.rsplit_once('\n') else {
        bail!("curl output is missing the HTTP status: {}", output_str);
    };
    let status = status
        .trim()
        .parse::<u16>()
        .with_context(|| format!("Invalid HTTP status from curl: {}", status))?;

    Ok(HttpResponse {
        status,
        body: body.to_string(),
    })
}
