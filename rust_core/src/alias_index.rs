//! Alias index for team name resolution.
//!
//! This module provides:
//! - Normalized alias -> team id lookup
//! - Last-write-wins collision handling with overwrite accounting
//!
//! The index is an immutable snapshot per resolution run. Callers rebuild it
//! from the persisted alias table on their own cadence.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::models::{TeamAlias, TeamId};
use crate::utils::matching::normalize;

/// Normalized alias string -> canonical team id.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    entries: FxHashMap<String, TeamId>,
    /// Keys that were reassigned to a different team during build
    overwrites: usize,
    /// Aliases that normalized to the empty string
    skipped: usize,
}

impl AliasIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from the persisted alias table.
    ///
    /// Later entries win when two aliases normalize to the same key but point
    /// at different teams; every such overwrite is counted and logged.
    pub fn build(aliases: &[TeamAlias]) -> Self {
        let mut index = Self::new();
        for alias in aliases {
            index.insert(&alias.alias, alias.team_id);
        }

        if index.overwrites > 0 {
            warn!(
                "Alias index built with {} collisions ({} keys, {} empty aliases skipped)",
                index.overwrites,
                index.entries.len(),
                index.skipped
            );
        } else {
            debug!(
                "Alias index built: {} keys ({} empty aliases skipped)",
                index.entries.len(),
                index.skipped
            );
        }

        index
    }

    /// Insert one alias. Returns the team id previously held by the key if it
    /// pointed at a different team.
    pub fn insert(&mut self, alias: &str, team_id: TeamId) -> Option<TeamId> {
        let key = normalize(alias);
        if key.is_empty() {
            self.skipped += 1;
            return None;
        }

        match self.entries.insert(key, team_id) {
            Some(previous) if previous != team_id => {
                self.overwrites += 1;
                warn!(
                    "Alias collision: {:?} reassigned from team {} to team {}",
                    alias, previous, team_id
                );
                Some(previous)
            }
            _ => None,
        }
    }

    /// Lookup by an already-normalized key.
    #[inline]
    pub fn get(&self, normalized: &str) -> Option<TeamId> {
        self.entries.get(normalized).copied()
    }

    /// Lookup by a raw, as-scraped name.
    pub fn lookup(&self, raw: &str) -> Option<TeamId> {
        self.get(&normalize(raw))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn overwrites(&self) -> usize {
        self.overwrites
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// All normalized keys pointing at `team_id`, sorted.
    pub fn aliases_for(&self, team_id: TeamId) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, id)| **id == team_id)
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}
