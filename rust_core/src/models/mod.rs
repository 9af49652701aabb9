// Shared models for fixture resolution and market normalization
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::price::{implied_probability, overround_pct};

pub mod market_type;

pub use market_type::CanonicalMarketType;

pub type TeamId = i64;
pub type MatchId = i64;

// ============================================================================
// Store-owned records (read-only to the resolver)
// ============================================================================

/// One real-world fixture already known to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMatch {
    pub id: MatchId,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub home_team_name: String,
    pub away_team_name: String,
    /// Kickoff, UTC-normalized
    pub kickoff: DateTime<Utc>,
    /// Source tag -> source-native event id
    #[serde(default)]
    pub external_ids: HashMap<String, String>,
}

impl CanonicalMatch {
    /// Calendar day of kickoff as seen from `offset`.
    pub fn kickoff_date(&self, offset: FixedOffset) -> NaiveDate {
        self.kickoff.with_timezone(&offset).date_naive()
    }
}

/// One admissible spelling of a team as seen in a source's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAlias {
    pub team_id: TeamId,
    /// As scraped, before normalization
    pub alias: String,
    #[serde(default)]
    pub source: Option<String>,
}

impl TeamAlias {
    pub fn new(team_id: TeamId, alias: impl Into<String>) -> Self {
        Self {
            team_id,
            alias: alias.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

// ============================================================================
// Scraper input (transient)
// ============================================================================

/// One outcome exactly as the source reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOutcome {
    pub label: String,
    pub price: String,
}

impl RawOutcome {
    pub fn new(label: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            price: price.into(),
        }
    }
}

/// A single market as scraped: source-native code, optional line and outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMarketBlock {
    pub market_code: u32,
    /// Selection qualifier such as a goal line ("2.5")
    #[serde(default)]
    pub qualifier: Option<String>,
    /// Bookmaker offering the prices; the event's source when absent
    #[serde(default)]
    pub bookmaker: Option<String>,
    #[serde(default)]
    pub outcomes: Vec<RawOutcome>,
}

impl RawMarketBlock {
    pub fn new(market_code: u32, outcomes: Vec<RawOutcome>) -> Self {
        Self {
            market_code,
            qualifier: None,
            bookmaker: None,
            outcomes,
        }
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    pub fn with_bookmaker(mut self, bookmaker: impl Into<String>) -> Self {
        self.bookmaker = Some(bookmaker.into());
        self
    }
}

/// One fixture as reported by one source during one scrape cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedEvent {
    pub source: String,
    #[serde(default)]
    pub event_id: String,
    pub home: String,
    pub away: String,
    /// Source-native date string, usually `DD.MM.YYYY`
    pub date: String,
    #[serde(default)]
    pub markets: Vec<RawMarketBlock>,
    #[serde(default)]
    pub scraped_at: Option<DateTime<Utc>>,
}

impl ScrapedEvent {
    pub fn new(
        source: impl Into<String>,
        event_id: impl Into<String>,
        home: impl Into<String>,
        away: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            event_id: event_id.into(),
            home: home.into(),
            away: away.into(),
            date: date.into(),
            markets: Vec::new(),
            scraped_at: None,
        }
    }

    pub fn with_market(mut self, block: RawMarketBlock) -> Self {
        self.markets.push(block);
        self
    }
}

// ============================================================================
// Normalized output
// ============================================================================

/// A priced outcome with a canonical label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub label: String,
    pub price: f64,
}

/// Home/draw/away prices of a full-time 1X2 market.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResultPrices {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl MatchResultPrices {
    /// Implied probabilities with the margin removed, so they sum to 1.
    pub fn implied_probabilities(&self) -> (f64, f64, f64) {
        let h = implied_probability(self.home);
        let d = implied_probability(self.draw);
        let a = implied_probability(self.away);
        let total = h + d + a;
        if total <= 0.0 {
            return (0.0, 0.0, 0.0);
        }
        (h / total, d / total, a / total)
    }

    /// Bookmaker margin in percent.
    pub fn overround_pct(&self) -> f64 {
        overround_pct(&[self.home, self.draw, self.away])
    }
}

/// One normalized market row, appended per bookmaker per match per scrape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMarket {
    pub match_id: MatchId,
    /// Canonical market name, parameterized when a qualifier is present
    pub market_type: String,
    /// `None` for codes missing from the taxonomy
    pub kind: Option<CanonicalMarketType>,
    pub bookmaker: String,
    pub source: String,
    pub outcomes: Vec<Outcome>,
    /// Only set for 1X2 markets where all three prices were found
    pub match_result: Option<MatchResultPrices>,
    pub recorded_at: DateTime<Utc>,
}

impl CanonicalMarket {
    pub fn home_price(&self) -> Option<f64> {
        self.match_result.map(|p| p.home)
    }

    pub fn draw_price(&self) -> Option<f64> {
        self.match_result.map(|p| p.draw)
    }

    pub fn away_price(&self) -> Option<f64> {
        self.match_result.map(|p| p.away)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_match(kickoff: DateTime<Utc>) -> CanonicalMatch {
        CanonicalMatch {
            id: 1,
            home_team_id: 17,
            away_team_id: 31,
            home_team_name: "Manchester City".to_string(),
            away_team_name: "Chelsea".to_string(),
            kickoff,
            external_ids: HashMap::new(),
        }
    }

    #[test]
    fn test_kickoff_date_respects_offset() {
        let m = sample_match(Utc.with_ymd_and_hms(2026, 1, 4, 22, 30, 0).unwrap());
        let utc = FixedOffset::east_opt(0).unwrap();
        let istanbul = FixedOffset::east_opt(3 * 3600).unwrap();

        assert_eq!(m.kickoff_date(utc), NaiveDate::from_ymd_opt(2026, 1, 4).unwrap());
        assert_eq!(
            m.kickoff_date(istanbul),
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
        );
    }

    #[test]
    fn test_match_result_probabilities_sum_to_one() {
        let prices = MatchResultPrices {
            home: 1.85,
            draw: 3.40,
            away: 4.10,
        };
        let (h, d, a) = prices.implied_probabilities();
        assert!((h + d + a - 1.0).abs() < 1e-9);
        assert!(h > d && d > a);
        assert!(prices.overround_pct() > 0.0);
    }

    #[test]
    fn test_scraped_event_deserializes_with_defaults() {
        let json = r#"{"source":"flashscore","home":"Man. City","away":"Chelsea","date":"04.01.2026"}"#;
        let event: ScrapedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_id, "");
        assert!(event.markets.is_empty());
        assert!(event.scraped_at.is_none());
    }

    #[test]
    fn test_raw_block_builder() {
        let block = RawMarketBlock::new(2, vec![RawOutcome::new("Over", "1.90")])
            .with_qualifier("2.5")
            .with_bookmaker("bet365");
        assert_eq!(block.qualifier.as_deref(), Some("2.5"));
        assert_eq!(block.bookmaker.as_deref(), Some("bet365"));
    }
}
