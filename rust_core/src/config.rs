//! Resolver and ingestion configuration.
//!
//! Defaults are tuned on the Flashscore/Sofascore pair; every value can be
//! overridden from the environment without failing on bad input.

use chrono::{FixedOffset, Offset, Utc};
use std::env;
use std::str::FromStr;

/// Default fuzzy acceptance threshold (combined home + away edit distance,
/// exclusive upper bound).
pub const DEFAULT_FUZZY_THRESHOLD: usize = 12;

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_flag(key: &str) -> Option<bool> {
    let value = env::var(key).ok()?;
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Event matcher configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    /// Fuzzy matches are accepted only when the combined distance is strictly below this
    pub fuzzy_threshold: usize,
    /// Disable to resolve through aliases only
    pub fuzzy_enabled: bool,
    /// Offset applied to canonical kickoffs before taking their calendar day
    pub kickoff_utc_offset_hours: i32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            fuzzy_enabled: true,
            kickoff_utc_offset_hours: 0,
        }
    }
}

impl ResolverConfig {
    /// Create config from environment variables with fallback to provided defaults
    pub fn from_env_with_defaults(defaults: Self) -> Self {
        Self {
            fuzzy_threshold: env_parse("FUZZY_MATCH_THRESHOLD").unwrap_or(defaults.fuzzy_threshold),
            fuzzy_enabled: env_flag("FUZZY_MATCH_ENABLED").unwrap_or(defaults.fuzzy_enabled),
            kickoff_utc_offset_hours: env_parse("KICKOFF_UTC_OFFSET_HOURS")
                .unwrap_or(defaults.kickoff_utc_offset_hours),
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_with_defaults(Self::default())
    }

    /// Offset used for the date gate; out-of-range hours fall back to UTC.
    pub fn kickoff_offset(&self) -> FixedOffset {
        self.kickoff_utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

/// Ingestion coordinator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    pub resolver: ResolverConfig,
    /// Dedicated worker pool size; `None` uses rayon's global pool (one per core)
    pub worker_threads: Option<usize>,
    /// Process repeated (source, event id) pairs in a batch only once
    pub dedupe_events: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            worker_threads: None,
            dedupe_events: true,
        }
    }
}

impl IngestConfig {
    pub fn from_env_with_defaults(defaults: Self) -> Self {
        Self {
            resolver: ResolverConfig::from_env_with_defaults(defaults.resolver),
            worker_threads: env_parse::<usize>("INGEST_WORKER_THREADS")
                .filter(|n| *n > 0)
                .or(defaults.worker_threads),
            dedupe_events: env_flag("INGEST_DEDUPE_EVENTS").unwrap_or(defaults.dedupe_events),
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_with_defaults(Self::default())
    }
}
