//! Oddsmatch Core - Fixture resolution and market normalization for scraped odds.
//!
//! This module provides:
//! - Team name normalization and edit-distance matching
//! - Alias index for exact team lookups
//! - Event matcher (date gate, alias path, fuzzy fallback)
//! - Market taxonomy table with a fallback naming policy
//! - Market translator with price validation and 1X2 extraction
//! - Parallel ingestion coordinator with per-run reporting

pub mod alias_index;
pub mod config;
pub mod error;
pub mod ingest;
pub mod market_taxonomy;
pub mod markets;
pub mod matching;
pub mod models;
pub mod utils;

pub use alias_index::AliasIndex;
pub use config::{IngestConfig, ResolverConfig};
pub use error::{IngestError, ParseError};
pub use ingest::{IngestBatch, IngestReport, Ingestor, MarketSink};
pub use market_taxonomy::MarketTaxonomy;
pub use markets::{best_match_result_prices, DropReason, MarketTranslator, Translation};
pub use matching::{resolve, MatchMethod, MatchResolution, ResolutionSnapshot, UnresolvedReason};
pub use models::*;
pub use utils::matching::normalize;
