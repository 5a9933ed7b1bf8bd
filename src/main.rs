use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use ghbatch::App;
use ghbatch::Config;
use ghbatch::config::DEFAULT_API_BASE;
use ghbatch::config::DEFAULT_MANIFEST;
use ghbatch::config::RepoSlug;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "ghbatch")]
#[command(about = "Batch-create GitHub issues and labels from a JSON manifest", long_about = None)]
pub struct Cli {
    /// Manifest listing the issues to create
    #[arg(short, long, global = true, default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,
    /// Target repository as owner/name (defaults to git config ghbatch.repo, then the origin remote)
    #[arg(long, global = true)]
    pub repo: Option<RepoSlug>,
    /// REST API base URL
    #[arg(long, global = true, default_value = DEFAULT_API_BASE)]
    pub api_base: String,
    /// Pause between requests in milliseconds, overriding the default for the transport
    #[arg(long, global = true)]
    pub delay_ms: Option<u64>,
    /// Reject records without a title or body instead of submitting them empty
    #[arg(long, global = true)]
    pub strict: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create one issue per manifest record
    Issues {
        /// GitHub token; uses the REST API instead of the gh CLI
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Create or update every label the manifest uses
    Labels {
        /// GitHub token; uses the REST API instead of the gh CLI
        #[arg(short, long)]
        token: Option<String>,
    },
}

fn setup_logging() -> Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env()?;
    tracing_subscriber::fmt()
        .with_timer(timer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging()?;

    let mut config = Config {
        repo: cli.repo,
        api_base: cli.api_base,
        delay: cli.delay_ms.map(Duration::from_millis),
        strict: cli.strict,
        ..Config::new(cli.manifest)
    };
    if config.repo.is_none() {
        config.repo = config.detect_repo();
    }
    let app = App::new(config);

    // Per-record failures are reported in the summary and never change the exit code
    match cli.command {
        Commands::Issues { token } => {
            app.cmd_issues(token.as_deref(), &mut std::io::stdout())
                .await?
        }
        Commands::Labels { token } => {
            app.cmd_labels(token.as_deref(), &mut std::io::stdout())
                .await?
        }
    };

    Ok(())
}
