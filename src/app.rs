use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::manifest;
use crate::manifest::Record;
use crate::pacing::IntervalPacer;
use crate::sync::SyncSummary;
use crate::sync::Synchronizer;
use crate::sync::Transport;

pub struct App {
    pub config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

/// Shared helper methods for App
impl App {
    /// Load the manifest named by the config.
    pub(crate) async fn load_records(&self) -> Result<Vec<Record>> {
        let records = manifest::load(&self.config.manifest, self.config.strict).await?;
        info!(
            count = records.len(),
            manifest = %self.config.manifest.display(),
            "Loaded manifest"
        );
        Ok(records)
    }

    /// Pacer using the configured delay, or `default` if none was given.
    pub(crate) fn pacer(&self, default: Duration) -> IntervalPacer {
        IntervalPacer::new(self.config.delay.unwrap_or(default))
    }

    /// Run the transport's setup checks, then submit every item.
    pub(crate) async fn sync<T: Transport>(
        &self,
        transport: &T,
        items: &[T::Item],
        stdout: &mut impl std::io::Write,
    ) -> Result<SyncSummary> {
        transport.preflight().await?;
        Synchronizer::new(self.pacer(transport.default_delay()))
            .run(transport, items, stdout)
            .await
    }
}
