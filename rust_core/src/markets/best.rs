//! Best 1X2 prices across bookmakers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{CanonicalMarket, CanonicalMarketType, MatchId};
use crate::utils::price::overround_pct;

/// Highest price for one side and the bookmaker offering it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestPrice {
    pub price: f64,
    pub bookmaker: String,
}

/// Best home/draw/away prices for one match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestPrices {
    pub home: Option<BestPrice>,
    pub draw: Option<BestPrice>,
    pub away: Option<BestPrice>,
}

impl BestPrices {
    /// Combined margin of the best prices, once all three sides are known.
    /// Negative means the best prices together form an arbitrage.
    pub fn overround_pct(&self) -> Option<f64> {
        match (&self.home, &self.draw, &self.away) {
            (Some(h), Some(d), Some(a)) => Some(overround_pct(&[h.price, d.price, a.price])),
            _ => None,
        }
    }
}

fn offer(slot: &mut Option<BestPrice>, price: f64, bookmaker: &str) {
    // Ties keep the bookmaker seen first
    if slot.as_ref().map_or(true, |best| price > best.price) {
        *slot = Some(BestPrice {
            price,
            bookmaker: bookmaker.to_string(),
        });
    }
}

/// Best full-time 1X2 prices per match over a batch of rows.
///
/// Only rows carrying named home/draw/away prices take part.
pub fn best_match_result_prices(rows: &[CanonicalMarket]) -> BTreeMap<MatchId, BestPrices> {
    let mut best: BTreeMap<MatchId, BestPrices> = BTreeMap::new();

    for row in rows {
        if row.kind != Some(CanonicalMarketType::MatchResult) {
            continue;
        }
        let Some(prices) = row.match_result else {
            continue;
        };

        let entry = best.entry(row.match_id).or_default();
        offer(&mut entry.home, prices.home, &row.bookmaker);
        offer(&mut entry.draw, prices.draw, &row.bookmaker);
        offer(&mut entry.away, prices.away, &row.bookmaker);
    }

    best
}
