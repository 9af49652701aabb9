//! Fixture matching
//!
//! Decides whether a scraped "home vs away on date D" record is a fixture the
//! store already knows. Resolution runs against an immutable
//! [`ResolutionSnapshot`] so any number of workers can share it.

use serde::{Deserialize, Serialize};

use crate::alias_index::AliasIndex;
use crate::models::{CanonicalMatch, MatchId, TeamAlias};
use crate::utils::matching::normalize;

pub mod fixture;

pub use fixture::resolve;

/// How an event was tied to its canonical match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Both names resolved through the alias index to the exact team pair
    Alias,
    /// Lowest combined edit distance under the threshold
    Fuzzy,
}

/// Why an event could not be tied to a canonical match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// The source date string could not be parsed
    InvalidDate,
    /// A team name normalized to nothing
    EmptyTeamName,
    /// Home and away normalize to the same name
    SameTeam,
    /// No canonical match kicks off on the event's calendar day
    NoCandidatesOnDate,
    /// Alias path missed and fuzzy matching is switched off
    FuzzyDisabled,
    /// Best combined distance was not below the threshold
    NoCloseCandidate,
}

/// Outcome of resolving one scraped event.
///
/// `Unresolved` is an expected result, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchResolution {
    Resolved {
        match_id: MatchId,
        method: MatchMethod,
        distance: usize,
    },
    Unresolved {
        reason: UnresolvedReason,
        /// Same-day candidates that were considered, in snapshot order
        considered: Vec<MatchId>,
        best_distance: Option<usize>,
    },
}

impl MatchResolution {
    pub fn unresolved(reason: UnresolvedReason) -> Self {
        Self::Unresolved {
            reason,
            considered: Vec::new(),
            best_distance: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    pub fn match_id(&self) -> Option<MatchId> {
        match self {
            Self::Resolved { match_id, .. } => Some(*match_id),
            Self::Unresolved { .. } => None,
        }
    }

    pub fn method(&self) -> Option<MatchMethod> {
        match self {
            Self::Resolved { method, .. } => Some(*method),
            Self::Unresolved { .. } => None,
        }
    }
}

/// A canonical match with its team names pre-normalized.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub fixture: CanonicalMatch,
    pub home_key: String,
    pub away_key: String,
}

impl Candidate {
    fn new(fixture: CanonicalMatch) -> Self {
        let home_key = normalize(&fixture.home_team_name);
        let away_key = normalize(&fixture.away_team_name);
        Self {
            fixture,
            home_key,
            away_key,
        }
    }
}

/// Read-only inputs for one resolution run: the alias index and the
/// candidate matches in the scrape window.
///
/// Candidates are kept in `(kickoff, id)` order; ties in the fuzzy path are
/// broken by this order, so repeated runs pick the same match.
#[derive(Debug, Clone, Default)]
pub struct ResolutionSnapshot {
    aliases: AliasIndex,
    candidates: Vec<Candidate>,
}

impl ResolutionSnapshot {
    /// Build from the raw alias table and candidate rows.
    pub fn new(aliases: &[TeamAlias], candidates: Vec<CanonicalMatch>) -> Self {
        Self::from_parts(AliasIndex::build(aliases), candidates)
    }

    pub fn from_parts(aliases: AliasIndex, candidates: Vec<CanonicalMatch>) -> Self {
        let mut candidates: Vec<Candidate> = candidates.into_iter().map(Candidate::new).collect();
        candidates.sort_by(|a, b| {
            a.fixture
                .kickoff
                .cmp(&b.fixture.kickoff)
                .then(a.fixture.id.cmp(&b.fixture.id))
        });
        Self {
            aliases,
            candidates,
        }
    }

    pub fn aliases(&self) -> &AliasIndex {
        &self.aliases
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn fixture(id: MatchId, hour: u32) -> CanonicalMatch {
        CanonicalMatch {
            id,
            home_team_id: 1,
            away_team_id: 2,
            home_team_name: "Göztepe".to_string(),
            away_team_name: "Kasımpaşa".to_string(),
            kickoff: Utc.with_ymd_and_hms(2026, 1, 4, hour, 0, 0).unwrap(),
            external_ids: HashMap::new(),
        }
    }

    #[test]
    fn test_snapshot_orders_candidates() {
        let snapshot =
            ResolutionSnapshot::new(&[], vec![fixture(9, 18), fixture(4, 20), fixture(2, 18)]);
        let ids: Vec<MatchId> = snapshot
            .candidates()
            .iter()
            .map(|c| c.fixture.id)
            .collect();
        assert_eq!(ids, vec![2, 9, 4]);
    }

    #[test]
    fn test_candidate_keys_are_normalized() {
        let snapshot = ResolutionSnapshot::new(&[], vec![fixture(1, 18)]);
        let c = &snapshot.candidates()[0];
        assert_eq!(c.home_key, "goztepe");
        assert_eq!(c.away_key, "kasimpasa");
    }

    #[test]
    fn test_resolution_serialization() {
        let resolved = MatchResolution::Resolved {
            match_id: 7,
            method: MatchMethod::Fuzzy,
            distance: 3,
        };
        let json = serde_json::to_string(&resolved).unwrap();
        assert!(json.contains("\"status\":\"resolved\""));
        assert!(json.contains("\"method\":\"fuzzy\""));

        let unresolved = MatchResolution::unresolved(UnresolvedReason::InvalidDate);
        assert!(!unresolved.is_resolved());
        assert_eq!(unresolved.match_id(), None);
        let json = serde_json::to_string(&unresolved).unwrap();
        assert!(json.contains("\"reason\":\"invalid_date\""));
    }
}
