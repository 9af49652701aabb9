//! Market taxonomy table for supported sources.
//!
//! This module provides:
//! - Static `(source, market code)` -> canonical market mappings
//! - The fallback naming policy for codes the table has never seen
//! - Canonical market names parameterized by a selection qualifier

use rustc_hash::FxHashMap;

use crate::models::CanonicalMarketType;

/// Mapping of one source-native market code.
#[derive(Debug, Clone)]
pub struct MarketMapping {
    /// Source tag (lowercase, e.g. "flashscore")
    pub source: &'static str,
    /// Source-native numeric market code
    pub code: u32,
    pub market: CanonicalMarketType,
}

/// Static mappings for all supported sources.
pub static MARKET_MAPPINGS: &[MarketMapping] = &[
    // Flashscore odds comparison tabs
    MarketMapping {
        source: "flashscore",
        code: 1,
        market: CanonicalMarketType::MatchResult,
    },
    MarketMapping {
        source: "flashscore",
        code: 2,
        market: CanonicalMarketType::OverUnder,
    },
    MarketMapping {
        source: "flashscore",
        code: 3,
        market: CanonicalMarketType::BothTeamsToScore,
    },
    MarketMapping {
        source: "flashscore",
        code: 5,
        market: CanonicalMarketType::DoubleChance,
    },
    MarketMapping {
        source: "flashscore",
        code: 6,
        market: CanonicalMarketType::DrawNoBet,
    },
    MarketMapping {
        source: "flashscore",
        code: 7,
        market: CanonicalMarketType::AsianHandicap,
    },
    MarketMapping {
        source: "flashscore",
        code: 8,
        market: CanonicalMarketType::CorrectScore,
    },
    MarketMapping {
        source: "flashscore",
        code: 9,
        market: CanonicalMarketType::HalfTimeFullTime,
    },
    MarketMapping {
        source: "flashscore",
        code: 10,
        market: CanonicalMarketType::OddEven,
    },
    MarketMapping {
        source: "flashscore",
        code: 11,
        market: CanonicalMarketType::HalfTimeResult,
    },
    // Sofascore market ids
    MarketMapping {
        source: "sofascore",
        code: 1,
        market: CanonicalMarketType::MatchResult,
    },
    MarketMapping {
        source: "sofascore",
        code: 2,
        market: CanonicalMarketType::DoubleChance,
    },
    MarketMapping {
        source: "sofascore",
        code: 3,
        market: CanonicalMarketType::HalfTimeResult,
    },
    MarketMapping {
        source: "sofascore",
        code: 5,
        market: CanonicalMarketType::DrawNoBet,
    },
    MarketMapping {
        source: "sofascore",
        code: 9,
        market: CanonicalMarketType::OverUnder,
    },
    MarketMapping {
        source: "sofascore",
        code: 12,
        market: CanonicalMarketType::AsianHandicap,
    },
    MarketMapping {
        source: "sofascore",
        code: 17,
        market: CanonicalMarketType::BothTeamsToScore,
    },
    MarketMapping {
        source: "sofascore",
        code: 21,
        market: CanonicalMarketType::CorrectScore,
    },
    MarketMapping {
        source: "sofascore",
        code: 22,
        market: CanonicalMarketType::HalfTimeFullTime,
    },
    // Odds API feed: h2h / spreads / totals
    MarketMapping {
        source: "odds_api",
        code: 1,
        market: CanonicalMarketType::MatchResult,
    },
    MarketMapping {
        source: "odds_api",
        code: 2,
        market: CanonicalMarketType::AsianHandicap,
    },
    MarketMapping {
        source: "odds_api",
        code: 3,
        market: CanonicalMarketType::OverUnder,
    },
];

/// Canonical name for a translated market plus its kind, if the code was known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketName {
    pub name: String,
    pub kind: Option<CanonicalMarketType>,
}

/// Name used for codes missing from the table: `"<source>:<code>"`.
pub fn fallback_name(source: &str, code: u32) -> String {
    format!("{}:{}", source.trim().to_lowercase(), code)
}

/// Clean up a selection qualifier. Numeric lines written with a decimal comma
/// ("2,5") are rewritten with a point so both spellings name the same market.
pub fn canonical_qualifier(raw: &str) -> Option<String> {
    let q = raw.trim();
    if q.is_empty() {
        return None;
    }
    if q.contains(',') && !q.contains('.') {
        let dotted = q.replace(',', ".");
        if dotted.parse::<f64>().is_ok() {
            return Some(dotted);
        }
    }
    Some(q.to_string())
}

/// Lookup table from `(source, code)` to canonical market kind.
///
/// Source tags are matched case-insensitively. Built once and shared
/// read-only across ingest workers.
#[derive(Debug, Clone, Default)]
pub struct MarketTaxonomy {
    table: FxHashMap<(String, u32), CanonicalMarketType>,
}

impl MarketTaxonomy {
    /// Create an empty taxonomy; every code will take the fallback branch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Taxonomy seeded with [`MARKET_MAPPINGS`].
    pub fn standard() -> Self {
        let mut taxonomy = Self::new();
        for mapping in MARKET_MAPPINGS {
            taxonomy.insert(mapping.source, mapping.code, mapping.market);
        }
        taxonomy
    }

    /// Add or replace a mapping.
    pub fn insert(&mut self, source: &str, code: u32, market: CanonicalMarketType) {
        self.table
            .insert((source.trim().to_lowercase(), code), market);
    }

    pub fn with_mapping(mut self, source: &str, code: u32, market: CanonicalMarketType) -> Self {
        self.insert(source, code, market);
        self
    }

    pub fn lookup(&self, source: &str, code: u32) -> Option<CanonicalMarketType> {
        self.table
            .get(&(source.trim().to_lowercase(), code))
            .copied()
    }

    /// Resolve the canonical market name for a block.
    ///
    /// Known codes use the taxonomy name; unknown codes get [`fallback_name`].
    /// A qualifier, when present, is always appended so that different lines
    /// of the same market never share a name.
    pub fn market_name(&self, source: &str, code: u32, qualifier: Option<&str>) -> MarketName {
        let kind = self.lookup(source, code);
        let base = match kind {
            Some(market) => market.canonical_name().to_string(),
            None => fallback_name(source, code),
        };

        let name = match qualifier.and_then(canonical_qualifier) {
            Some(q) => format!("{} {}", base, q),
            None => base,
        };

        MarketName { name, kind }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// All sources with at least one mapping, sorted.
    pub fn sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = self.table.keys().map(|(s, _)| s.clone()).collect();
        sources.sort();
        sources.dedup();
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_has_no_duplicate_keys() {
        let taxonomy = MarketTaxonomy::standard();
        assert_eq!(taxonomy.len(), MARKET_MAPPINGS.len());
        assert_eq!(
            taxonomy.sources(),
            vec!["flashscore", "odds_api", "sofascore"]
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive_on_source() {
        let taxonomy = MarketTaxonomy::standard();
        assert_eq!(
            taxonomy.lookup("Flashscore", 1),
            Some(CanonicalMarketType::MatchResult)
        );
        assert_eq!(
            taxonomy.lookup("sofascore", 17),
            Some(CanonicalMarketType::BothTeamsToScore)
        );
        assert_eq!(taxonomy.lookup("flashscore", 4), None);
        assert_eq!(taxonomy.lookup("unknown_book", 1), None);
    }

    #[test]
    fn test_same_code_differs_per_source() {
        let taxonomy = MarketTaxonomy::standard();
        assert_eq!(
            taxonomy.lookup("flashscore", 2),
            Some(CanonicalMarketType::OverUnder)
        );
        assert_eq!(
            taxonomy.lookup("sofascore", 2),
            Some(CanonicalMarketType::DoubleChance)
        );
    }

    #[test]
    fn test_qualifier_disambiguates_lines() {
        let taxonomy = MarketTaxonomy::standard();
        let low = taxonomy.market_name("flashscore", 2, Some("2.5"));
        let high = taxonomy.market_name("flashscore", 2, Some("3.5"));
        assert_eq!(low.name, "Over/Under 2.5");
        assert_eq!(high.name, "Over/Under 3.5");
        assert_ne!(low.name, high.name);
        assert_eq!(low.kind, Some(CanonicalMarketType::OverUnder));
    }

    #[test]
    fn test_comma_qualifier_matches_dotted() {
        let taxonomy = MarketTaxonomy::standard();
        assert_eq!(
            taxonomy.market_name("flashscore", 2, Some("2,5")).name,
            "Over/Under 2.5"
        );
        assert_eq!(canonical_qualifier("  "), None);
        assert_eq!(canonical_qualifier("+1.5").as_deref(), Some("+1.5"));
        assert_eq!(canonical_qualifier("home,away").as_deref(), Some("home,away"));
    }

    #[test]
    fn test_unknown_code_falls_back() {
        let taxonomy = MarketTaxonomy::standard();
        let name = taxonomy.market_name("Flashscore", 4, Some("2.5"));
        assert_eq!(name.name, "flashscore:4 2.5");
        assert_eq!(name.kind, None);

        let bare = taxonomy.market_name("flashscore", 99, None);
        assert_eq!(bare.name, "flashscore:99");
    }

    #[test]
    fn test_custom_mapping_overrides() {
        let taxonomy = MarketTaxonomy::standard().with_mapping(
            "flashscore",
            4,
            CanonicalMarketType::EuropeanHandicap,
        );
        assert_eq!(
            taxonomy.market_name("flashscore", 4, Some("-1")).name,
            "European Handicap -1"
        );
    }
}
