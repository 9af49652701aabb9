//! Fixture resolver
//!
//! Date gate first, then an exact alias lookup, then edit-distance fuzzy
//! matching over the same-day candidates.

use tracing::debug;

use super::{Candidate, MatchMethod, MatchResolution, ResolutionSnapshot, UnresolvedReason};
use crate::config::ResolverConfig;
use crate::models::ScrapedEvent;
use crate::utils::dates::parse_event_date;
use crate::utils::matching::{normalize, pairing_distance};

/// Resolve one scraped event against the snapshot.
///
/// 1. Only candidates kicking off on the event's calendar day are considered.
///    There is no cross-date fallback.
/// 2. If both names are aliased and a same-day candidate has exactly that
///    team pair, it wins with distance 0.
/// 3. Otherwise the same-day candidate with the lowest combined home + away
///    edit distance is accepted if that distance is below the threshold.
///    Ties go to the first candidate in snapshot order.
pub fn resolve(
    event: &ScrapedEvent,
    snapshot: &ResolutionSnapshot,
    config: &ResolverConfig,
) -> MatchResolution {
    let date = match parse_event_date(&event.date) {
        Ok(date) => date,
        Err(e) => {
            debug!(
                "Unparseable date for {} event {:?}: {}",
                event.source, event.event_id, e
            );
            return MatchResolution::unresolved(UnresolvedReason::InvalidDate);
        }
    };

    let home_key = normalize(&event.home);
    let away_key = normalize(&event.away);
    if home_key.is_empty() || away_key.is_empty() {
        return MatchResolution::unresolved(UnresolvedReason::EmptyTeamName);
    }
    if home_key == away_key {
        return MatchResolution::unresolved(UnresolvedReason::SameTeam);
    }

    // Date gate
    let offset = config.kickoff_offset();
    let same_day: Vec<&Candidate> = snapshot
        .candidates()
        .iter()
        .filter(|c| c.fixture.kickoff_date(offset) == date)
        .collect();

    if same_day.is_empty() {
        return MatchResolution::unresolved(UnresolvedReason::NoCandidatesOnDate);
    }

    // Alias path
    let aliases = snapshot.aliases();
    if let (Some(home_id), Some(away_id)) = (aliases.get(&home_key), aliases.get(&away_key)) {
        if let Some(c) = same_day
            .iter()
            .find(|c| c.fixture.home_team_id == home_id && c.fixture.away_team_id == away_id)
        {
            return MatchResolution::Resolved {
                match_id: c.fixture.id,
                method: MatchMethod::Alias,
                distance: 0,
            };
        }
    }

    let considered = same_day.iter().map(|c| c.fixture.id).collect();

    if !config.fuzzy_enabled {
        return MatchResolution::Unresolved {
            reason: UnresolvedReason::FuzzyDisabled,
            considered,
            best_distance: None,
        };
    }

    // Fuzzy path. Strict `<` keeps the first candidate on ties.
    let mut best: Option<(&Candidate, usize)> = None;
    for &c in &same_day {
        let distance = pairing_distance(&home_key, &away_key, &c.home_key, &c.away_key);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((c, distance));
        }
    }

    match best {
        Some((c, distance)) if distance < config.fuzzy_threshold => MatchResolution::Resolved {
            match_id: c.fixture.id,
            method: MatchMethod::Fuzzy,
            distance,
        },
        _ => MatchResolution::Unresolved {
            reason: UnresolvedReason::NoCloseCandidate,
            considered,
            best_distance: best.map(|(_, d)| d),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CanonicalMatch, MatchId, TeamAlias, TeamId};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn fixture(
        id: MatchId,
        home: (TeamId, &str),
        away: (TeamId, &str),
        (y, m, d, h): (i32, u32, u32, u32),
    ) -> CanonicalMatch {
        CanonicalMatch {
            id,
            home_team_id: home.0,
            away_team_id: away.0,
            home_team_name: home.1.to_string(),
            away_team_name: away.1.to_string(),
            kickoff: Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(),
            external_ids: HashMap::new(),
        }
    }

    fn event(home: &str, away: &str, date: &str) -> ScrapedEvent {
        ScrapedEvent::new("flashscore", "ev-1", home, away, date)
    }

    fn city_chelsea(id: MatchId, day: u32) -> CanonicalMatch {
        fixture(
            id,
            (17, "Manchester City"),
            (31, "Chelsea"),
            (2026, 1, day, 17),
        )
    }

    #[test]
    fn test_alias_path_resolves_with_zero_distance() {
        let snapshot = ResolutionSnapshot::new(
            &[TeamAlias::new(17, "man city"), TeamAlias::new(31, "chelsea")],
            vec![city_chelsea(100, 4)],
        );
        let result = resolve(
            &event("Man. City", "Chelsea", "04.01.2026"),
            &snapshot,
            &ResolverConfig::default(),
        );
        assert_eq!(
            result,
            MatchResolution::Resolved {
                match_id: 100,
                method: MatchMethod::Alias,
                distance: 0
            }
        );
    }

    #[test]
    fn test_alias_pair_must_match_orientation() {
        // Aliases resolve but only the reversed fixture exists; fuzzy gets a go
        // and fails on distance.
        let snapshot = ResolutionSnapshot::new(
            &[TeamAlias::new(17, "man city"), TeamAlias::new(31, "chelsea")],
            vec![fixture(
                5,
                (31, "Chelsea"),
                (17, "Manchester City"),
                (2026, 1, 4, 17),
            )],
        );
        let result = resolve(
            &event("Man City", "Chelsea", "04.01.2026"),
            &snapshot,
            &ResolverConfig::default(),
        );
        assert!(!result.is_resolved());
    }

    #[test]
    fn test_fuzzy_path_without_alias() {
        let snapshot = ResolutionSnapshot::new(
            &[TeamAlias::new(31, "chelsea")],
            vec![city_chelsea(100, 4)],
        );
        let result = resolve(
            &event("Man. City", "Chelsea", "04.01.2026"),
            &snapshot,
            &ResolverConfig::default(),
        );
        assert_eq!(
            result,
            MatchResolution::Resolved {
                match_id: 100,
                method: MatchMethod::Fuzzy,
                distance: 7
            }
        );
    }

    #[test]
    fn test_date_gate_is_hard() {
        let snapshot = ResolutionSnapshot::new(
            &[TeamAlias::new(17, "man city"), TeamAlias::new(31, "chelsea")],
            vec![city_chelsea(100, 4), city_chelsea(101, 6)],
        );
        let result = resolve(
            &event("Manchester City", "Chelsea", "05.01.2026"),
            &snapshot,
            &ResolverConfig::default(),
        );
        assert_eq!(
            result,
            MatchResolution::unresolved(UnresolvedReason::NoCandidatesOnDate)
        );
    }

    #[test]
    fn test_invalid_date_is_unresolved() {
        let snapshot = ResolutionSnapshot::new(&[], vec![city_chelsea(100, 4)]);
        let result = resolve(
            &event("Manchester City", "Chelsea", "2026/13/45"),
            &snapshot,
            &ResolverConfig::default(),
        );
        assert_eq!(
            result,
            MatchResolution::unresolved(UnresolvedReason::InvalidDate)
        );
    }

    #[test]
    fn test_empty_names_are_unresolved() {
        let snapshot = ResolutionSnapshot::new(&[], vec![city_chelsea(100, 4)]);
        let result = resolve(
            &event("???", "Chelsea", "04.01.2026"),
            &snapshot,
            &ResolverConfig::default(),
        );
        assert_eq!(
            result,
            MatchResolution::unresolved(UnresolvedReason::EmptyTeamName)
        );
    }

    #[test]
    fn test_same_team_on_both_sides_is_unresolved() {
        // A same-day fixture with a near-identical pairing exists, but a
        // degenerate scrape must not be attached to it.
        let snapshot = ResolutionSnapshot::new(
            &[TeamAlias::new(31, "chelsea")],
            vec![fixture(101, (31, "Chelsea"), (32, "Chelsea U21"), (2026, 1, 4, 20))],
        );
        let result = resolve(
            &event("Chelsea", " CHELSEA ", "04.01.2026"),
            &snapshot,
            &ResolverConfig::default(),
        );
        assert_eq!(
            result,
            MatchResolution::unresolved(UnresolvedReason::SameTeam)
        );
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let snapshot = ResolutionSnapshot::new(&[], vec![city_chelsea(100, 4)]);
        let ev = event("Man. City", "Chelsea", "04.01.2026");

        let at_limit = ResolverConfig {
            fuzzy_threshold: 7,
            ..Default::default()
        };
        assert_eq!(
            resolve(&ev, &snapshot, &at_limit),
            MatchResolution::Unresolved {
                reason: UnresolvedReason::NoCloseCandidate,
                considered: vec![100],
                best_distance: Some(7),
            }
        );

        let above = ResolverConfig {
            fuzzy_threshold: 8,
            ..Default::default()
        };
        assert!(resolve(&ev, &snapshot, &above).is_resolved());
    }

    #[test]
    fn test_fuzzy_disabled() {
        let snapshot = ResolutionSnapshot::new(&[], vec![city_chelsea(100, 4)]);
        let config = ResolverConfig {
            fuzzy_enabled: false,
            ..Default::default()
        };
        let result = resolve(
            &event("Manchester City", "Chelsea", "04.01.2026"),
            &snapshot,
            &config,
        );
        assert!(matches!(
            result,
            MatchResolution::Unresolved {
                reason: UnresolvedReason::FuzzyDisabled,
                ..
            }
        ));
    }

    #[test]
    fn test_fuzzy_picks_closest_candidate() {
        let snapshot = ResolutionSnapshot::new(
            &[],
            vec![
                fixture(1, (1, "Manchester United"), (2, "Chelsea"), (2026, 1, 4, 12)),
                fixture(2, (3, "Manchester City"), (4, "Chelsea"), (2026, 1, 4, 14)),
            ],
        );
        let result = resolve(
            &event("Manchester City", "Chelsea", "04.01.2026"),
            &snapshot,
            &ResolverConfig::default(),
        );
        assert_eq!(result.match_id(), Some(2));
        assert_eq!(result.method(), Some(MatchMethod::Fuzzy));
    }

    #[test]
    fn test_fuzzy_tie_break_is_stable() {
        // Identical names on the same day: the earlier kickoff wins, and the
        // input order of candidates does not matter.
        let a = fixture(8, (1, "Ajax"), (2, "PSV"), (2026, 1, 4, 12));
        let b = fixture(3, (1, "Ajax"), (2, "PSV"), (2026, 1, 4, 18));

        let forward = ResolutionSnapshot::new(&[], vec![a.clone(), b.clone()]);
        let backward = ResolutionSnapshot::new(&[], vec![b, a]);
        let ev = event("Ajax", "PSV", "04.01.2026");
        let config = ResolverConfig::default();

        assert_eq!(resolve(&ev, &forward, &config).match_id(), Some(8));
        assert_eq!(resolve(&ev, &backward, &config).match_id(), Some(8));
    }

    #[test]
    fn test_kickoff_offset_moves_date_gate() {
        // 22:00 UTC on the 4th is the 5th in Istanbul
        let snapshot = ResolutionSnapshot::new(
            &[],
            vec![fixture(
                1,
                (1, "Galatasaray"),
                (2, "Fenerbahçe"),
                (2026, 1, 4, 22),
            )],
        );
        let ev = event("Galatasaray", "Fenerbahce", "05.01.2026");

        let utc = ResolverConfig::default();
        assert!(!resolve(&ev, &snapshot, &utc).is_resolved());

        let istanbul = ResolverConfig {
            kickoff_utc_offset_hours: 3,
            ..Default::default()
        };
        assert_eq!(resolve(&ev, &snapshot, &istanbul).match_id(), Some(1));
    }
}
