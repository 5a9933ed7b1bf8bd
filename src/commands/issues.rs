use anyhow::Result;
use anyhow::bail;

use crate::App;
use crate::error::SetupError;
use crate::manifest::Record;
use crate::ops::gh::RealGh;
use crate::ops::http::CurlHttp;
use crate::sync::SyncSummary;
use crate::sync::Transport;
use crate::transport::gh::GhIssues;
use crate::transport::rest::RestIssues;

impl App {
    /// Create one issue per manifest record.
    ///
    /// With a token the issues go through the REST API, otherwise through the
    /// local gh CLI session.
    pub async fn cmd_issues(
        &self,
        token: Option<&str>,
        stdout: &mut impl std::io::Write,
    ) -> Result<SyncSummary> {
        match token {
            Some(token) => {
                if token.trim().is_empty() {
                    bail!(SetupError::MissingToken);
                }
                let transport = RestIssues::new(CurlHttp::new(token.to_string()), &self.config)?;
                self.sync_issues(&transport, stdout).await
            }
            None => {
                let transport = GhIssues::new(
                    RealGh::new(self.config.repo.clone()),
                    self.config.web_url("issues"),
                );
                self.sync_issues(&transport, stdout).await
            }
        }
    }

    /// Load the manifest and submit each record through `transport`, in
    /// manifest order.
    pub async fn sync_issues<T: Transport<Item = Record>>(
        &self,
        transport: &T,
        stdout: &mut impl std::io::Write,
    ) -> Result<SyncSummary> {
        let records = self.load_records().await?;
        self.sync(transport, &records, stdout).await
    }
}
