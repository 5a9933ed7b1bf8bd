#![allow(async_fn_in_trait)]

use std::fmt::Display;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use tracing::debug;
use tracing::info;
use tracing::instrument;

use crate::labels::LabelDefinition;
use crate::manifest::Record;
use crate::pacing::Pacer;

// -----------------------------------------------------------------------------
// Types

/// Something the synchronizer can submit.
pub trait SyncItem {
    /// Name shown in progress lines.
    fn name(&self) -> &str;
}

impl SyncItem for Record {
    fn name(&self) -> &str {
        self.title()
    }
}

impl SyncItem for LabelDefinition {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Identifier of a successfully created resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Created {
    /// Issue number returned by the REST API.
    Number(u64),
    /// Resource URL printed by the gh CLI.
    Url(String),
    /// Label created, updated, or already present.
    Upserted,
}

impl Display for Created {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(number) => write!(f, "Created #{number}"),
            Self::Url(url) => write!(f, "Created: {url}"),
            Self::Upserted => f.write_str("Created/updated"),
        }
    }
}

/// Submits one item to a remote resource collection.
pub trait Transport {
    type Item: SyncItem;

    /// Singular noun for the submitted resource, e.g. "issue".
    fn noun(&self) -> &'static str;

    /// Minimum pause between requests unless the config overrides it.
    fn default_delay(&self) -> Duration;

    /// Where the created resources can be viewed, if known.
    fn results_url(&self) -> Option<String> {
        None
    }

    /// Checks run once before any item is submitted. Errors abort the run.
    async fn preflight(&self) -> Result<()> {
        Ok(())
    }

    /// Submit a single item.
    ///
    /// Never fails outright: every problem is returned as a displayable
    /// message so that one bad item cannot stop the batch.
    async fn create(&self, item: &Self::Item) -> Result<Created, String>;
}

/// Result of submitting one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub name: String,
    pub result: Result<Created, String>,
}

/// Counts and per-item log of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub created: usize,
    pub failed: usize,
    pub outcomes: Vec<ItemOutcome>,
}

impl SyncSummary {
    /// Number of items processed; always `created + failed`.
    pub fn total(&self) -> usize {
        self.created + self.failed
    }

    fn record(&mut self, name: &str, result: Result<Created, String>) {
        match result {
            Ok(_) => self.created += 1,
            Err(_) => self.failed += 1,
        }
        self.outcomes.push(ItemOutcome {
            name: name.to_string(),
            result,
        });
    }
}

// -----------------------------------------------------------------------------
// Synchronizer

/// Drives a batch of items through a transport, one at a time.
pub struct Synchronizer<P> {
    pacer: P,
}

impl<P: Pacer> Synchronizer<P> {
    pub fn new(pacer: P) -> Self {
        Self { pacer }
    }

    /// Submit every item in order, reporting progress to `stdout`.
    ///
    /// Failed items are counted and skipped; the batch always runs to the end.
    /// The only errors returned are failures to write to `stdout`.
    #[instrument(skip_all)]
    pub async fn run<T: Transport>(
        &self,
        transport: &T,
        items: &[T::Item],
        stdout: &mut impl std::io::Write,
    ) -> Result<SyncSummary> {
        let noun = transport.noun();
        let total = items.len();
        info!(total, noun, "Starting batch");

        writeln!(stdout, "Creating {} GitHub {}s...", total, noun)?;
        writeln!(stdout)?;

        let mut summary = SyncSummary::default();
        for (i, item) in items.iter().enumerate() {
            self.pacer.wait().await;
            writeln!(
                stdout,
                "[{}/{}] Creating {}: {}",
                i + 1,
                total,
                noun,
                item.name()
            )?;

            let result = transport.create(item).await;
            match &result {
                Ok(created) => writeln!(stdout, "  {} {}", "✅".green(), created)?,
                Err(message) => {
                    debug!(item = item.name(), %message, "Item failed");
                    writeln!(stdout, "  {} Failed: {}", "❌".red(), message)?
                }
            }
            summary.record(item.name(), result);
        }

        writeln!(stdout)?;
        writeln!(
            stdout,
            "Done! Created {} {}s, {} failed.",
            summary.created, noun, summary.failed
        )?;
        if let Some(url) = transport.results_url() {
            writeln!(stdout, "View them at: {}", url)?;
        }
        info!(created = summary.created, failed = summary.failed, "Batch finished");

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use tokio::time::Instant;

    use super::*;
    use crate::pacing::IntervalPacer;

    /// Fails every item whose name starts with "bad".
    struct FakeTransport {
        calls: RefCell<Vec<String>>,
    }

    impl FakeTransport {
        fn new() -> Self {
            Self {
                calls: RefCell::new(vec![]),
            }
        }
    }

    impl Transport for FakeTransport {
        type Item = Record;

        fn noun(&self) -> &'static str {
            "issue"
        }

        fn default_delay(&self) -> Duration {
            Duration::ZERO
        }

        async fn create(&self, item: &Record) -> Result<Created, String> {
            self.calls.borrow_mut().push(item.title().to_string());
            if item.title().starts_with("bad") {
                Err(format!("rejected {}", item.title()))
            } else {
                Ok(Created::Number(self.calls.borrow().len() as u64))
            }
        }
    }

    fn synchronizer() -> Synchronizer<IntervalPacer> {
        Synchronizer::new(IntervalPacer::new(Duration::ZERO))
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_batch() {
        let records = vec![
            Record::new("bad one", "", &[]),
            Record::new("good", "", &[]),
            Record::new("bad two", "", &[]),
            Record::new("also good", "", &[]),
        ];
        let transport = FakeTransport::new();
        let mut out = Vec::new();
        let summary = synchronizer()
            .run(&transport, &records, &mut out)
            .await
            .unwrap();

        assert_eq!(
            *transport.calls.borrow(),
            vec!["bad one", "good", "bad two", "also good"]
        );
        assert_eq!(summary.created, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.total(), records.len());
        assert_eq!(summary.outcomes[1].name, "good");
        assert_eq!(summary.outcomes[1].result, Ok(Created::Number(2)));
        assert_eq!(
            summary.outcomes[2].result,
            Err("rejected bad two".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let transport = FakeTransport::new();
        let mut out = Vec::new();
        let summary = synchronizer().run(&transport, &[], &mut out).await.unwrap();

        assert_eq!(summary, SyncSummary::default());
        assert!(transport.calls.borrow().is_empty());
        let out = String::from_utf8(out).unwrap();
        assert!(out.ends_with("Done! Created 0 issues, 0 failed.\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_items_are_paced() {
        let records = vec![
            Record::new("A", "", &[]),
            Record::new("B", "", &[]),
            Record::new("C", "", &[]),
        ];
        let transport = FakeTransport::new();
        let mut out = Vec::new();
        let start = Instant::now();
        let summary = Synchronizer::new(IntervalPacer::new(Duration::from_secs(1)))
            .run(&transport, &records, &mut out)
            .await
            .unwrap();

        assert_eq!(summary.created, 3);
        // No pause before the first item or after the last
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn test_created_display() {
        assert_eq!(Created::Number(7).to_string(), "Created #7");
        assert_eq!(
            Created::Url("https://github.com/o/r/issues/7".to_string()).to_string(),
            "Created: https://github.com/o/r/issues/7"
        );
        assert_eq!(Created::Upserted.to_string(), "Created/updated");
    }
}
