//! Market translation.
//!
//! This module provides:
//! - Translation of a source-native market block into the canonical schema
//! - Per-outcome price validation with drop accounting
//! - Named home/draw/away extraction for the 1X2 market
//! - Best-price aggregation across bookmakers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::market_taxonomy::{MarketName, MarketTaxonomy};
use crate::models::{
    CanonicalMarket, CanonicalMarketType, MatchId, MatchResultPrices, Outcome, RawMarketBlock,
};
use crate::utils::price::parse_price;

pub mod best;
pub mod outcomes;

pub use best::{best_match_result_prices, BestPrice, BestPrices};
pub use outcomes::{canonical_outcome_label, match_result_labels, Side};

/// Why a market block produced no row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The block carried no outcomes at all
    NoOutcomes,
    /// Every outcome price failed to parse as a positive number
    AllPricesInvalid,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::NoOutcomes => "no_outcomes",
            DropReason::AllPricesInvalid => "all_prices_invalid",
        }
    }
}

/// A translated market not yet attributed to a match.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedMarket {
    pub market_type: String,
    pub kind: Option<CanonicalMarketType>,
    /// In source order, invalid prices removed
    pub outcomes: Vec<Outcome>,
    pub match_result: Option<MatchResultPrices>,
    /// Outcomes removed because their price did not parse
    pub rejected_outcomes: usize,
}

impl TranslatedMarket {
    pub fn into_canonical(
        self,
        match_id: MatchId,
        bookmaker: impl Into<String>,
        source: impl Into<String>,
        recorded_at: DateTime<Utc>,
    ) -> CanonicalMarket {
        CanonicalMarket {
            match_id,
            market_type: self.market_type,
            kind: self.kind,
            bookmaker: bookmaker.into(),
            source: source.into(),
            outcomes: self.outcomes,
            match_result: self.match_result,
            recorded_at,
        }
    }
}

/// Result of translating one block.
#[derive(Debug, Clone, PartialEq)]
pub enum Translation {
    Market(TranslatedMarket),
    Dropped {
        market_type: String,
        reason: DropReason,
        rejected_outcomes: usize,
    },
}

impl Translation {
    pub fn market(self) -> Option<TranslatedMarket> {
        match self {
            Translation::Market(m) => Some(m),
            Translation::Dropped { .. } => None,
        }
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, Translation::Dropped { .. })
    }
}

/// Translates raw market blocks through a [`MarketTaxonomy`].
#[derive(Debug, Clone, Default)]
pub struct MarketTranslator {
    taxonomy: MarketTaxonomy,
}

impl MarketTranslator {
    pub fn new(taxonomy: MarketTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Translator over the built-in source mappings.
    pub fn standard() -> Self {
        Self::new(MarketTaxonomy::standard())
    }

    pub fn taxonomy(&self) -> &MarketTaxonomy {
        &self.taxonomy
    }

    /// Translate one block scraped from `source`.
    ///
    /// Unknown codes are never a reason to drop: they get a fallback name.
    /// Outcomes with unparseable prices are removed; if none survive, the
    /// block is dropped.
    pub fn translate(&self, source: &str, block: &RawMarketBlock) -> Translation {
        let MarketName {
            name: market_type,
            kind,
        } = self
            .taxonomy
            .market_name(source, block.market_code, block.qualifier.as_deref());

        if block.outcomes.is_empty() {
            return Translation::Dropped {
                market_type,
                reason: DropReason::NoOutcomes,
                rejected_outcomes: 0,
            };
        }

        let mut outcomes = Vec::with_capacity(block.outcomes.len());
        let mut rejected_outcomes = 0;
        let (mut home, mut draw, mut away) = (None, None, None);

        for raw in &block.outcomes {
            let price = match parse_price(&raw.price) {
                Ok(price) => price,
                Err(e) => {
                    rejected_outcomes += 1;
                    debug!(
                        "Dropping outcome {:?} of {} market {}: {}",
                        raw.label, source, market_type, e
                    );
                    continue;
                }
            };

            let (label, side) = canonical_outcome_label(kind, source, &raw.label);
            // First price seen for a side wins
            match side {
                Some(Side::Home) => {
                    home.get_or_insert(price);
                }
                Some(Side::Draw) => {
                    draw.get_or_insert(price);
                }
                Some(Side::Away) => {
                    away.get_or_insert(price);
                }
                None => {}
            }
            outcomes.push(Outcome { label, price });
        }

        if outcomes.is_empty() {
            return Translation::Dropped {
                market_type,
                reason: DropReason::AllPricesInvalid,
                rejected_outcomes,
            };
        }

        let match_result = match (kind, home, draw, away) {
            (Some(CanonicalMarketType::MatchResult), Some(home), Some(draw), Some(away)) => {
                Some(MatchResultPrices { home, draw, away })
            }
            _ => None,
        };

        Translation::Market(TranslatedMarket {
            market_type,
            kind,
            outcomes,
            match_result,
            rejected_outcomes,
        })
    }
}
