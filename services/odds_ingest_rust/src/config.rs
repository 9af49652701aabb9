use anyhow::{Context, Result};
use oddsmatch_core::IngestConfig;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// JSON document with `aliases` and `matches`
    pub snapshot_path: PathBuf,
    /// JSON array of scraped events
    pub events_path: PathBuf,
    /// JSON-lines output for canonical rows; stdout when unset
    pub output_path: Option<PathBuf>,
    /// Where to write the run report; only logged when unset
    pub report_path: Option<PathBuf>,
    pub ingest: IngestConfig,
}

fn optional_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let snapshot_path = env::var("INGEST_SNAPSHOT_PATH")
            .map(PathBuf::from)
            .context("INGEST_SNAPSHOT_PATH must be set (alias table + candidate matches JSON)")?;
        let events_path = env::var("INGEST_EVENTS_PATH")
            .map(PathBuf::from)
            .context("INGEST_EVENTS_PATH must be set (scraped events JSON array)")?;

        Ok(Self {
            snapshot_path,
            events_path,
            output_path: optional_path("INGEST_OUTPUT_PATH"),
            report_path: optional_path("INGEST_REPORT_PATH"),
            ingest: IngestConfig::from_env(),
        })
    }
}
