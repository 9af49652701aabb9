//! Canonical market taxonomy
//!
//! The shared schema every source-specific market code is translated into.
//! Outcome labels of the source-independent markets are canonicalized here;
//! 1X2 labels vary per source and are handled by `markets::outcomes`.

use serde::{Deserialize, Serialize};

/// Canonical market kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalMarketType {
    /// Full-time home/draw/away
    MatchResult,
    /// First-half home/draw/away
    HalfTimeResult,
    DoubleChance,
    DrawNoBet,
    /// Total goals over/under a line
    OverUnder,
    BothTeamsToScore,
    AsianHandicap,
    EuropeanHandicap,
    CorrectScore,
    HalfTimeFullTime,
    OddEven,
}

impl CanonicalMarketType {
    /// Human-readable canonical name, used as the persisted market type.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Self::MatchResult => "1X2",
            Self::HalfTimeResult => "1X2 1st Half",
            Self::DoubleChance => "Double Chance",
            Self::DrawNoBet => "Draw No Bet",
            Self::OverUnder => "Over/Under",
            Self::BothTeamsToScore => "Both Teams To Score",
            Self::AsianHandicap => "Asian Handicap",
            Self::EuropeanHandicap => "European Handicap",
            Self::CorrectScore => "Correct Score",
            Self::HalfTimeFullTime => "Half Time/Full Time",
            Self::OddEven => "Odd/Even",
        }
    }

    /// Home/draw/away style markets whose labels are looked up per source.
    pub fn is_three_way(&self) -> bool {
        matches!(self, Self::MatchResult | Self::HalfTimeResult)
    }

    /// Canonical outcome label for a normalized source label, if known.
    ///
    /// Three-way markets always return `None` here.
    pub fn canonical_outcome(&self, normalized_label: &str) -> Option<&'static str> {
        let label = normalized_label.trim();
        match self {
            Self::OverUnder => match label {
                "over" | "o" | "ust" | "more" => Some("Over"),
                "under" | "u" | "alt" | "less" => Some("Under"),
                _ => None,
            },
            Self::BothTeamsToScore => match label {
                "yes" | "y" | "var" | "evet" | "gg" => Some("Yes"),
                "no" | "n" | "yok" | "hayir" | "ng" => Some("No"),
                _ => None,
            },
            Self::DoubleChance => match label {
                "1x" | "1 x" | "1 or x" | "home or draw" => Some("1X"),
                "12" | "1 2" | "1 or 2" | "home or away" => Some("12"),
                "x2" | "x 2" | "x or 2" | "draw or away" => Some("X2"),
                _ => None,
            },
            Self::DrawNoBet => match label {
                "1" | "home" => Some("1"),
                "2" | "away" => Some("2"),
                _ => None,
            },
            Self::OddEven => match label {
                "odd" | "tek" => Some("Odd"),
                "even" | "cift" => Some("Even"),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_type_serialization() {
        let kind = CanonicalMarketType::BothTeamsToScore;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, "\"both_teams_to_score\"");

        let deserialized: CanonicalMarketType = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, kind);
    }

    #[test]
    fn test_three_way_markets() {
        assert!(CanonicalMarketType::MatchResult.is_three_way());
        assert!(CanonicalMarketType::HalfTimeResult.is_three_way());
        assert!(!CanonicalMarketType::DrawNoBet.is_three_way());
        assert!(!CanonicalMarketType::OverUnder.is_three_way());
    }

    #[test]
    fn test_canonical_outcomes() {
        assert_eq!(CanonicalMarketType::OverUnder.canonical_outcome("over"), Some("Over"));
        assert_eq!(CanonicalMarketType::OverUnder.canonical_outcome("alt"), Some("Under"));
        assert_eq!(CanonicalMarketType::BothTeamsToScore.canonical_outcome("var"), Some("Yes"));
        assert_eq!(CanonicalMarketType::DoubleChance.canonical_outcome("x2"), Some("X2"));
        assert_eq!(CanonicalMarketType::OddEven.canonical_outcome("cift"), Some("Even"));
        assert_eq!(CanonicalMarketType::CorrectScore.canonical_outcome("2 1"), None);
        assert_eq!(CanonicalMarketType::MatchResult.canonical_outcome("1"), None);
    }
}
