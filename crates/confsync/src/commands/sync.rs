//! `confsync sync` command implementation.

use std::path::PathBuf;

use clap::Args;
use confsync_config::{Config, ConfigError, SyncSettings};
use confsync_confluence::{ConfluenceClient, PageSynchronizer, SyncOutcome};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;
use crate::output::Output;
use crate::site;

/// Arguments for the sync command.
#[derive(Args)]
pub(crate) struct SyncArgs {
    /// Directory containing markdown sources.
    #[arg(default_value = "docs")]
    source_dir: PathBuf,

    /// Path to configuration file (default: auto-discover confsync.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging regardless of configuration.
    #[arg(short, long)]
    verbose: bool,
}

/// Per-run outcome tally.
#[derive(Debug, Default)]
struct Summary {
    created: usize,
    updated: usize,
    skipped: usize,
    failed: usize,
}

impl SyncArgs {
    /// Execute the sync command.
    ///
    /// Configuration gaps disable the sync (logged, exit success); a missing
    /// parent page or an I/O failure while discovering documents is fatal.
    /// Everything else is per-document: failures are reported and the run
    /// continues.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref())?;

        let settings = match config.resolve() {
            Ok(settings) => settings,
            Err(err @ ConfigError::Missing(_)) => {
                output.warning(&err.to_string());
                output.warning("confluence sync disabled because of configuration issues");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        init_tracing(self.verbose || settings.debug);

        let documents = site::discover(&self.source_dir)?;
        if documents.is_empty() {
            output.info(&format!(
                "No eligible documents under {}.",
                self.source_dir.display()
            ));
            return Ok(());
        }

        let summary = run_sync(&settings, &documents, output)?;

        let line = format!(
            "Synced {} document(s): {} created, {} updated, {} unchanged, {} failed",
            documents.len(),
            summary.created,
            summary.updated,
            summary.skipped,
            summary.failed
        );
        if summary.failed > 0 {
            output.warning(&line);
        } else {
            output.success(&line);
        }
        Ok(())
    }
}

fn run_sync(
    settings: &SyncSettings,
    documents: &[confsync_confluence::Document],
    output: &Output,
) -> Result<Summary, CliError> {
    let client = ConfluenceClient::new(&settings.url, &settings.token);
    let synchronizer = PageSynchronizer::new(
        &client,
        settings.space.as_str(),
        settings.parent_page.as_deref(),
    )?;

    let mut summary = Summary::default();
    for document in documents {
        match synchronizer.sync(document) {
            Ok(SyncOutcome::Created { .. }) => summary.created += 1,
            Ok(SyncOutcome::Updated { .. }) => summary.updated += 1,
            Ok(SyncOutcome::Skipped { .. }) => summary.skipped += 1,
            Err(err) => {
                summary.failed += 1;
                output.warning(&format!("{}: {err}", document.source_path.display()));
            }
        }
    }
    Ok(summary)
}

/// Initialize tracing once the effective verbosity is known.
///
/// `RUST_LOG` takes precedence; otherwise the level comes from `--verbose`
/// or the config `debug` flag.
fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
