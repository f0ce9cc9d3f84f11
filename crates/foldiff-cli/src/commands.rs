use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use foldiff_diff::LineDiffProvider;
use foldiff_session::{DiffSession, SessionConfig};
use foldiff_text::InMemoryDocument;
use tracing::{debug, warn};

use crate::cli::{Cli, OutputFormat};
use crate::report::Report;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let original = read_file(&cli.original)?;
    let modified = read_file(&cli.modified)?;

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let mut report = runtime.block_on(compare(&original, &modified, config, &cli.reveal_modified))?;
    report.original_path = cli.original.display().to_string();
    report.modified_path = cli.modified.display().to_string();

    match cli.format {
        OutputFormat::Text => print!("{}", report.render_text(&original, &modified)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

/// Config file values, then flag overrides. A one-shot run never debounces.
fn load_config(cli: &Cli) -> anyhow::Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let source = read_file(path)?;
            SessionConfig::from_toml_str(&source)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SessionConfig::default(),
    };
    if let Some(ignore) = cli.ignore_trim_whitespace {
        config.diff.ignore_trim_whitespace = ignore;
    }
    if let Some(ms) = cli.max_computation_time_ms {
        config.diff.max_computation_time = Duration::from_millis(ms);
    }
    Ok(config.with_debounce(Duration::ZERO))
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Diff two texts through a session and apply the requested reveals.
async fn compare(
    original: &str,
    modified: &str,
    config: SessionConfig,
    reveal_modified: &[usize],
) -> anyhow::Result<Report> {
    let session = DiffSession::new(
        Arc::new(InMemoryDocument::from_text(original)),
        Arc::new(InMemoryDocument::from_text(modified)),
        Arc::new(LineDiffProvider::new()),
        config,
    );
    session.start()?;
    session.wait_until_up_to_date().await?;

    session.transaction(|tx| {
        for &line in reveal_modified {
            if tx.reveal_line_in_modified(line) {
                debug!(line, "revealed modified line");
            } else {
                warn!(line, "modified line is not folded");
            }
        }
    });

    let state = session.snapshot();
    session.dispose();

    let diff = state.diff.clone().unwrap_or_default();
    Ok(Report {
        original_path: String::new(),
        modified_path: String::new(),
        identical: diff.identical,
        quit_early: diff.quit_early,
        changes: diff.changes,
        regions: state.regions().to_vec(),
    })
}
