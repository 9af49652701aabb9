//! Ingestion coordinator.
//!
//! This module provides:
//! - Batch de-duplication of scraped events
//! - Parallel resolution and translation over a shared snapshot
//! - Append-only hand-off of canonical rows to a [`MarketSink`]
//! - The per-run [`IngestReport`]
//!
//! Workers only read the snapshot and the taxonomy. Rows and report entries
//! are collected in input order, so output does not depend on thread count.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt::Display;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::market_taxonomy::MarketTaxonomy;
use crate::markets::{DropReason, MarketTranslator, Translation};
use crate::matching::{resolve, MatchMethod, MatchResolution, ResolutionSnapshot, UnresolvedReason};
use crate::models::{CanonicalMarket, MatchId, ScrapedEvent};
use crate::utils::matching::normalize;

/// Persistence collaborator receiving canonical rows.
///
/// Rows are always appended; history is never rewritten.
pub trait MarketSink {
    type Error: Display;

    fn append(&mut self, rows: &[CanonicalMarket]) -> Result<(), Self::Error>;
}

impl MarketSink for Vec<CanonicalMarket> {
    type Error = Infallible;

    fn append(&mut self, rows: &[CanonicalMarket]) -> Result<(), Self::Error> {
        self.extend_from_slice(rows);
        Ok(())
    }
}

/// An event tied to a canonical match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEvent {
    pub source: String,
    pub event_id: String,
    pub match_id: MatchId,
    pub method: MatchMethod,
    pub distance: usize,
    /// Rows produced for this event
    pub markets: usize,
}

/// An event left unresolved, kept for operator review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedEvent {
    pub source: String,
    pub event_id: String,
    pub home: String,
    pub away: String,
    pub date: String,
    pub reason: UnresolvedReason,
    pub best_distance: Option<usize>,
    pub candidates_considered: usize,
}

/// A market block that produced no row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedMarket {
    pub source: String,
    pub event_id: String,
    pub match_id: MatchId,
    pub market_type: String,
    pub reason: DropReason,
    pub rejected_outcomes: usize,
}

/// Summary of one ingestion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Events received, duplicates included
    pub total_events: usize,
    pub duplicate_events: usize,
    /// Market blocks carried over from duplicates into the kept event
    pub merged_market_blocks: usize,
    pub resolved_by_alias: usize,
    pub resolved_by_fuzzy: usize,
    pub resolved: Vec<ResolvedEvent>,
    pub unresolved: Vec<UnresolvedEvent>,
    pub markets_persisted: usize,
    pub markets_dropped: Vec<DroppedMarket>,
    /// Individual outcomes removed from otherwise persisted or dropped markets
    pub outcomes_dropped: usize,
}

impl IngestReport {
    fn new(run_id: Uuid, started_at: DateTime<Utc>, total_events: usize) -> Self {
        Self {
            run_id,
            started_at,
            total_events,
            duplicate_events: 0,
            merged_market_blocks: 0,
            resolved_by_alias: 0,
            resolved_by_fuzzy: 0,
            resolved: Vec::new(),
            unresolved: Vec::new(),
            markets_persisted: 0,
            markets_dropped: Vec::new(),
            outcomes_dropped: 0,
        }
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved_by_alias + self.resolved_by_fuzzy
    }

    pub fn unresolved_count(&self) -> usize {
        self.unresolved.len()
    }

    pub fn markets_dropped_count(&self) -> usize {
        self.markets_dropped.len()
    }

    /// Offending (home, away, date) tuples of unresolved events.
    pub fn unresolved_fixtures(&self) -> Vec<(&str, &str, &str)> {
        self.unresolved
            .iter()
            .map(|e| (e.home.as_str(), e.away.as_str(), e.date.as_str()))
            .collect()
    }

    pub fn unresolved_by_reason(&self) -> BTreeMap<UnresolvedReason, usize> {
        let mut counts = BTreeMap::new();
        for e in &self.unresolved {
            *counts.entry(e.reason).or_insert(0) += 1;
        }
        counts
    }

    pub fn dropped_by_reason(&self) -> BTreeMap<DropReason, usize> {
        let mut counts = BTreeMap::new();
        for m in &self.markets_dropped {
            *counts.entry(m.reason).or_insert(0) += 1;
        }
        counts
    }

    /// Log the run summary. Unresolved events are logged individually.
    pub fn log_summary(&self) {
        info!(
            "Ingest run {}: {} events ({} duplicates, {} market blocks merged), {} resolved ({} alias, {} fuzzy), {} unresolved, {} markets persisted, {} dropped, {} outcomes dropped",
            self.run_id,
            self.total_events,
            self.duplicate_events,
            self.merged_market_blocks,
            self.resolved_count(),
            self.resolved_by_alias,
            self.resolved_by_fuzzy,
            self.unresolved_count(),
            self.markets_persisted,
            self.markets_dropped_count(),
            self.outcomes_dropped
        );

        for (reason, count) in self.unresolved_by_reason() {
            warn!("Unresolved {:?}: {} events", reason, count);
        }

        for e in &self.unresolved {
            warn!(
                "Unresolved {} event {:?}: {} vs {} on {} ({:?}, best distance {:?})",
                e.source, e.event_id, e.home, e.away, e.date, e.reason, e.best_distance
            );
        }
    }
}

/// Rows and report produced by [`Ingestor::process`].
#[derive(Debug, Clone)]
pub struct IngestBatch {
    pub rows: Vec<CanonicalMarket>,
    pub report: IngestReport,
}

/// Result of processing one event on a worker.
enum EventOutcome {
    Resolved {
        event: ResolvedEvent,
        rows: Vec<CanonicalMarket>,
        dropped: Vec<DroppedMarket>,
        outcomes_dropped: usize,
    },
    Unresolved(UnresolvedEvent),
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum EventKey {
    SourceId(String, String),
    Fixture(String, String, String, String),
}

fn event_key(event: &ScrapedEvent) -> EventKey {
    let source = event.source.trim().to_lowercase();
    let event_id = event.event_id.trim();
    if event_id.is_empty() {
        EventKey::Fixture(
            source,
            normalize(&event.home),
            normalize(&event.away),
            event.date.trim().to_string(),
        )
    } else {
        EventKey::SourceId(source, event_id.to_string())
    }
}

/// Events left after de-duplication.
struct Deduped<'a> {
    events: Vec<Cow<'a, ScrapedEvent>>,
    duplicates: usize,
    merged_blocks: usize,
}

/// Keep the first occurrence of every event. Market blocks a duplicate adds
/// (typically another bookmaker page under the same event id) are appended to
/// the kept event; blocks it repeats verbatim are ignored.
fn dedupe(events: &[ScrapedEvent]) -> Deduped<'_> {
    let mut index: FxHashMap<EventKey, usize> = FxHashMap::default();
    let mut unique: Vec<Cow<'_, ScrapedEvent>> = Vec::with_capacity(events.len());
    let mut merged_blocks = 0;

    for event in events {
        let key = event_key(event);
        let pos = match index.get(&key).copied() {
            Some(pos) => pos,
            None => {
                index.insert(key, unique.len());
                unique.push(Cow::Borrowed(event));
                continue;
            }
        };

        let kept = &mut unique[pos];
        let new_blocks: Vec<_> = event
            .markets
            .iter()
            .filter(|block| !kept.markets.contains(block))
            .cloned()
            .collect();
        debug!(
            "Duplicate {} event {:?} ({} vs {}): {} new market blocks merged",
            event.source,
            event.event_id,
            event.home,
            event.away,
            new_blocks.len()
        );
        if !new_blocks.is_empty() {
            merged_blocks += new_blocks.len();
            kept.to_mut().markets.extend(new_blocks);
        }
    }

    Deduped {
        duplicates: events.len() - unique.len(),
        events: unique,
        merged_blocks,
    }
}

/// Drives the matcher and translator over scraped batches.
pub struct Ingestor {
    config: IngestConfig,
    translator: MarketTranslator,
    pool: Option<rayon::ThreadPool>,
}

impl Ingestor {
    /// Ingestor over the built-in market taxonomy.
    pub fn new(config: IngestConfig) -> Result<Self, IngestError> {
        Self::with_taxonomy(config, MarketTaxonomy::standard())
    }

    pub fn with_taxonomy(config: IngestConfig, taxonomy: MarketTaxonomy) -> Result<Self, IngestError> {
        let pool = match config.worker_threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("ingest-worker-{}", i))
                    .build()?,
            ),
            None => None,
        };

        Ok(Self {
            config,
            translator: MarketTranslator::new(taxonomy),
            pool,
        })
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn translator(&self) -> &MarketTranslator {
        &self.translator
    }

    /// Resolve and translate a batch without persisting anything.
    pub fn process(&self, events: &[ScrapedEvent], snapshot: &ResolutionSnapshot) -> IngestBatch {
        let started_at = Utc::now();
        let mut report = IngestReport::new(Uuid::new_v4(), started_at, events.len());

        let deduped = if self.config.dedupe_events {
            dedupe(events)
        } else {
            Deduped {
                events: events.iter().map(Cow::Borrowed).collect(),
                duplicates: 0,
                merged_blocks: 0,
            }
        };
        report.duplicate_events = deduped.duplicates;
        report.merged_market_blocks = deduped.merged_blocks;
        let unique = deduped.events;

        let outcomes = match &self.pool {
            Some(pool) => pool.install(|| self.process_all(&unique, snapshot, started_at)),
            None => self.process_all(&unique, snapshot, started_at),
        };

        let mut rows = Vec::new();
        for outcome in outcomes {
            match outcome {
                EventOutcome::Resolved {
                    event,
                    rows: event_rows,
                    dropped,
                    outcomes_dropped,
                } => {
                    match event.method {
                        MatchMethod::Alias => report.resolved_by_alias += 1,
                        MatchMethod::Fuzzy => report.resolved_by_fuzzy += 1,
                    }
                    rows.extend(event_rows);
                    report.markets_dropped.extend(dropped);
                    report.outcomes_dropped += outcomes_dropped;
                    report.resolved.push(event);
                }
                EventOutcome::Unresolved(event) => report.unresolved.push(event),
            }
        }
        report.markets_persisted = rows.len();

        IngestBatch { rows, report }
    }

    /// Process a batch and append the resulting rows to `sink`.
    ///
    /// Unresolved events and dropped markets end up in the report. Only a
    /// sink failure aborts the run.
    pub fn ingest<S: MarketSink>(
        &self,
        events: &[ScrapedEvent],
        snapshot: &ResolutionSnapshot,
        sink: &mut S,
    ) -> Result<IngestReport, IngestError> {
        let IngestBatch { rows, report } = self.process(events, snapshot);

        if !rows.is_empty() {
            sink.append(&rows)
                .map_err(|e| IngestError::Sink(e.to_string()))?;
        }

        report.log_summary();
        Ok(report)
    }

    fn process_all(
        &self,
        events: &[Cow<'_, ScrapedEvent>],
        snapshot: &ResolutionSnapshot,
        started_at: DateTime<Utc>,
    ) -> Vec<EventOutcome> {
        events
            .par_iter()
            .map(|event| self.process_event(event, snapshot, started_at))
            .collect()
    }

    fn process_event(
        &self,
        event: &ScrapedEvent,
        snapshot: &ResolutionSnapshot,
        started_at: DateTime<Utc>,
    ) -> EventOutcome {
        let (match_id, method, distance) =
            match resolve(event, snapshot, &self.config.resolver) {
                MatchResolution::Resolved {
                    match_id,
                    method,
                    distance,
                } => (match_id, method, distance),
                MatchResolution::Unresolved {
                    reason,
                    considered,
                    best_distance,
                } => {
                    debug!(
                        "No match for {} event {:?} ({} vs {} on {}): {:?}",
                        event.source, event.event_id, event.home, event.away, event.date, reason
                    );
                    return EventOutcome::Unresolved(UnresolvedEvent {
                        source: event.source.clone(),
                        event_id: event.event_id.clone(),
                        home: event.home.clone(),
                        away: event.away.clone(),
                        date: event.date.clone(),
                        reason,
                        best_distance,
                        candidates_considered: considered.len(),
                    });
                }
            };

        debug!(
            "Resolved {} event {:?} to match {} ({:?}, distance {})",
            event.source, event.event_id, match_id, method, distance
        );

        let recorded_at = event.scraped_at.unwrap_or(started_at);
        let mut rows = Vec::with_capacity(event.markets.len());
        let mut dropped = Vec::new();
        let mut outcomes_dropped = 0;

        for block in &event.markets {
            match self.translator.translate(&event.source, block) {
                Translation::Market(market) => {
                    outcomes_dropped += market.rejected_outcomes;
                    let bookmaker = block
                        .bookmaker
                        .as_deref()
                        .map(str::trim)
                        .filter(|b| !b.is_empty())
                        .unwrap_or(event.source.as_str());
                    rows.push(market.into_canonical(
                        match_id,
                        bookmaker,
                        event.source.as_str(),
                        recorded_at,
                    ));
                }
                Translation::Dropped {
                    market_type,
                    reason,
                    rejected_outcomes,
                } => {
                    outcomes_dropped += rejected_outcomes;
                    dropped.push(DroppedMarket {
                        source: event.source.clone(),
                        event_id: event.event_id.clone(),
                        match_id,
                        market_type,
                        reason,
                        rejected_outcomes,
                    });
                }
            }
        }

        EventOutcome::Resolved {
            event: ResolvedEvent {
                source: event.source.clone(),
                event_id: event.event_id.clone(),
                match_id,
                method,
                distance,
                markets: rows.len(),
            },
            rows,
            dropped,
            outcomes_dropped,
        }
    }
}
