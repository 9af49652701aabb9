mod config;
mod sink;

use crate::config::Config;
use crate::sink::JsonLinesSink;
use anyhow::{Context, Result};
use dotenv::dotenv;
use oddsmatch_core::{CanonicalMatch, Ingestor, ResolutionSnapshot, ScrapedEvent, TeamAlias};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Store export consumed once per run.
#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    aliases: Vec<TeamAlias>,
    #[serde(default)]
    matches: Vec<CanonicalMatch>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Log subscriber writing to `make_writer`. Stdout is reserved for rows.
fn log_subscriber<W>(make_writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(make_writer)
        .finish()
}

fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    log_subscriber(io::stderr).init();

    info!("Starting odds ingest...");

    let config = Config::from_env()?;

    let snapshot_file: SnapshotFile = read_json(&config.snapshot_path)?;
    let events: Vec<ScrapedEvent> = read_json(&config.events_path)?;
    let snapshot = ResolutionSnapshot::new(&snapshot_file.aliases, snapshot_file.matches);
    info!(
        "Loaded {} aliases, {} candidate matches, {} scraped events",
        snapshot_file.aliases.len(),
        snapshot.candidate_count(),
        events.len()
    );
    if snapshot.aliases().overwrites() > 0 {
        warn!(
            "{} alias collisions in snapshot; later entries won",
            snapshot.aliases().overwrites()
        );
    }

    let ingestor = Ingestor::new(config.ingest.clone()).context("Failed to set up ingestor")?;

    let report = match &config.output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut sink = JsonLinesSink::new(BufWriter::new(file));
            let report = ingestor.ingest(&events, &snapshot, &mut sink)?;
            info!("Wrote {} rows to {}", sink.written(), path.display());
            sink.into_inner().flush()?;
            report
        }
        None => {
            let stdout = io::stdout();
            let mut sink = JsonLinesSink::new(stdout.lock());
            ingestor.ingest(&events, &snapshot, &mut sink)?
        }
    };

    if let Some(path) = &config.report_path {
        let mut out = BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        );
        serde_json::to_writer_pretty(&mut out, &report)?;
        out.flush()?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
