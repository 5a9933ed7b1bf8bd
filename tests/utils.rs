#![allow(dead_code)]

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::path::PathBuf;

use ghbatch::labels::LabelDefinition;
use ghbatch::manifest::Record;
use ghbatch::ops::gh::CommandOutput;
use ghbatch::ops::gh::GhOps;
use ghbatch::ops::http::HttpOps;
use ghbatch::ops::http::HttpResponse;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// The two-record manifest used throughout the tests.
pub const EXAMPLE_MANIFEST: &str = r#"[
    {"title": "A", "body": "x", "labels": ["bug"]},
    {"title": "B", "body": "y", "labels": ["bug", "cli"]}
]"#;

/// Writes a manifest file into the given directory and returns its path.
pub fn write_manifest(dir: &Path, contents: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join("github-issues.json");
    std::fs::write(&path, contents)?;
    Ok(path)
}

pub fn setup_logging() -> anyhow::Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .with_test_writer()
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).init();
    Ok(())
}

pub enum TestDir {
    Temp(tempfile::TempDir),
    Kept(PathBuf),
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;

        if std::env::var("DEBUG_TESTS").is_ok() {
            let path = temp_dir.keep();
            eprintln!("Test directory kept at: {}", path.display());
            Ok(TestDir::Kept(path))
        } else {
            Ok(TestDir::Temp(temp_dir))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            TestDir::Temp(t) => t.path(),
            TestDir::Kept(p) => p.as_path(),
        }
    }
}

// -----------------------------------------------------------------------------
// FakeHttp

/// Records every request and answers from a queue of canned responses.
#[derive(Default)]
pub struct FakeHttp {
    pub requests: RefCell<Vec<(String, String, serde_json::Value)>>,
    responses: RefCell<VecDeque<HttpResponse>>,
}

impl FakeHttp {
    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses.borrow_mut().push_back(HttpResponse {
            status,
            body: body.to_string(),
        });
        self
    }

    fn answer(&self, method: &str, url: &str, json_data: &str) -> anyhow::Result<HttpResponse> {
        self.requests.borrow_mut().push((
            method.to_string(),
            url.to_string(),
            serde_json::from_str(json_data)?,
        ));
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no response queued for {} {}", method, url))
    }
}

impl HttpOps for &FakeHttp {
    async fn post(&self, url: &str, json_data: &str) -> anyhow::Result<HttpResponse> {
        self.answer("POST", url, json_data)
    }

    async fn patch(&self, url: &str, json_data: &str) -> anyhow::Result<HttpResponse> {
        self.answer("PATCH", url, json_data)
    }
}

// -----------------------------------------------------------------------------
// FakeGh

/// Stands in for the gh CLI.
///
/// Labels in `existing_labels` fail with gh's "already exists" message, and
/// anything named in `failing` fails with a generic error.
pub struct FakeGh {
    pub authenticated: bool,
    pub existing_labels: Vec<&'static str>,
    pub failing: Vec<&'static str>,
    pub auth_checks: Cell<usize>,
    pub calls: RefCell<Vec<String>>,
}

impl Default for FakeGh {
    fn default() -> Self {
        Self {
            authenticated: true,
            existing_labels: vec![],
            failing: vec![],
            auth_checks: Cell::new(0),
            calls: RefCell::new(vec![]),
        }
    }
}

impl FakeGh {
    fn output(&self, name: &str, stdout: String) -> CommandOutput {
        self.calls.borrow_mut().push(name.to_string());
        if self.failing.iter().any(|f| *f == name) {
            CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: format!("failed to create {}\n", name),
            }
        } else if self.existing_labels.iter().any(|l| *l == name) {
            CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: format!("label with name \"{}\" already exists\n", name),
            }
        } else {
            CommandOutput {
                success: true,
                stdout,
                stderr: String::new(),
            }
        }
    }
}

impl GhOps for &FakeGh {
    async fn auth_status(&self) -> anyhow::Result<bool> {
        self.auth_checks.set(self.auth_checks.get() + 1);
        Ok(self.authenticated)
    }

    async fn issue_create(&self, record: &Record) -> anyhow::Result<CommandOutput> {
        let number = self.calls.borrow().len() + 1;
        let url = format!("https://github.com/test/repo/issues/{}\n", number);
        Ok(self.output(record.title(), url))
    }

    async fn label_create(&self, label: &LabelDefinition) -> anyhow::Result<CommandOutput> {
        Ok(self.output(&label.name, String::new()))
    }
}
