use anyhow::Result;
use anyhow::bail;

use crate::App;
use crate::error::SetupError;
use crate::labels::LabelDefinition;
use crate::labels::derive_labels;
use crate::ops::gh::RealGh;
use crate::ops::http::CurlHttp;
use crate::sync::SyncSummary;
use crate::sync::Transport;
use crate::transport::gh::GhLabels;
use crate::transport::rest::RestLabels;

impl App {
    /// Create or update every label referenced by the manifest.
    pub async fn cmd_labels(
        &self,
        token: Option<&str>,
        stdout: &mut impl std::io::Write,
    ) -> Result<SyncSummary> {
        match token {
            Some(token) => {
                if token.trim().is_empty() {
                    bail!(SetupError::MissingToken);
                }
                let transport = RestLabels::new(CurlHttp::new(token.to_string()), &self.config)?;
                self.sync_labels(&transport, stdout).await
            }
            None => {
                let transport = GhLabels::new(
                    RealGh::new(self.config.repo.clone()),
                    self.config.web_url("labels"),
                );
                self.sync_labels(&transport, stdout).await
            }
        }
    }

    /// Load the manifest and upsert each distinct label once, sorted by name.
    pub async fn sync_labels<T: Transport<Item = LabelDefinition>>(
        &self,
        transport: &T,
        stdout: &mut impl std::io::Write,
    ) -> Result<SyncSummary> {
        let records = self.load_records().await?;
        let labels = derive_labels(&records);
        self.sync(transport, &labels, stdout).await
    }
}
