//! Outcome label canonicalization.
//!
//! Home/draw/away labels differ per source ("1", "Home", "Ev Sahibi"), so they
//! are matched against a small per-source label table. Other markets use the
//! source-independent labels on [`CanonicalMarketType::canonical_outcome`].

use crate::models::CanonicalMarketType;
use crate::utils::matching::normalize;

/// Side of a home/draw/away market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Home,
    Draw,
    Away,
}

impl Side {
    pub fn canonical_label(&self) -> &'static str {
        match self {
            Side::Home => "1",
            Side::Draw => "X",
            Side::Away => "2",
        }
    }
}

/// Known home/draw/away label variants for one source, already normalized.
#[derive(Debug, Clone)]
pub struct MatchResultLabels {
    pub source: &'static str,
    pub home: &'static [&'static str],
    pub draw: &'static [&'static str],
    pub away: &'static [&'static str],
}

impl MatchResultLabels {
    /// Side for an already-normalized label.
    pub fn side(&self, normalized: &str) -> Option<Side> {
        if self.home.contains(&normalized) {
            Some(Side::Home)
        } else if self.draw.contains(&normalized) {
            Some(Side::Draw)
        } else if self.away.contains(&normalized) {
            Some(Side::Away)
        } else {
            None
        }
    }
}

pub static MATCH_RESULT_LABELS: &[MatchResultLabels] = &[
    MatchResultLabels {
        source: "flashscore",
        home: &["1"],
        draw: &["x"],
        away: &["2"],
    },
    MatchResultLabels {
        source: "sofascore",
        home: &["1", "home"],
        draw: &["x", "draw"],
        away: &["2", "away"],
    },
    MatchResultLabels {
        source: "odds_api",
        home: &["home", "home team"],
        draw: &["draw"],
        away: &["away", "away team"],
    },
];

/// Used for sources without their own entry.
pub static DEFAULT_MATCH_RESULT_LABELS: MatchResultLabels = MatchResultLabels {
    source: "*",
    home: &["1", "home", "home team", "h", "ev sahibi"],
    draw: &["x", "draw", "d", "tie", "beraberlik"],
    away: &["2", "away", "away team", "a", "deplasman"],
};

/// Label table for a source (case-insensitive), falling back to the default set.
pub fn match_result_labels(source: &str) -> &'static MatchResultLabels {
    let source = source.trim().to_lowercase();
    MATCH_RESULT_LABELS
        .iter()
        .find(|labels| labels.source == source)
        .unwrap_or(&DEFAULT_MATCH_RESULT_LABELS)
}

/// Canonical label for one raw outcome plus its home/draw/away side, if any.
///
/// Unrecognized labels are kept as reported, trimmed.
pub fn canonical_outcome_label(
    kind: Option<CanonicalMarketType>,
    source: &str,
    raw_label: &str,
) -> (String, Option<Side>) {
    let Some(kind) = kind else {
        return (raw_label.trim().to_string(), None);
    };

    let key = normalize(raw_label);
    if kind.is_three_way() {
        if let Some(side) = match_result_labels(source).side(&key) {
            return (side.canonical_label().to_string(), Some(side));
        }
    } else if let Some(label) = kind.canonical_outcome(&key) {
        return (label.to_string(), None);
    }

    (raw_label.trim().to_string(), None)
}
