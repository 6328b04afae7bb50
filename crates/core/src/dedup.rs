//! Deduplication of accepted groups against the registry and the session.

use std::collections::HashSet;

use crate::aggregate::CandidateGroup;
use crate::parser::is_valid_name;

/// Why a group was or was not let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupOutcome {
    Accepted,
    /// Name already present in the registry (or accepted earlier this session).
    InRegistry,
    /// Same `(name, author)` already emitted this session.
    SeenInSession,
    /// Name fails the normalization filter.
    InvalidName,
}

/// Tracks names known to the registry and emitted in this session.
///
/// Names are compared lowercased; no fuzzy matching is applied, so
/// "Foo" and "The Foo" are distinct.
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    registry_names: HashSet<String>,
    session_seen: HashSet<(String, String)>,
}

impl Deduplicator {
    /// Start from the registry's lowercase name set.
    pub fn new(registry_names: HashSet<String>) -> Self {
        Self {
            registry_names,
            session_seen: HashSet::new(),
        }
    }

    /// Outcome for a group without recording anything.
    pub fn check(&self, group: &CandidateGroup) -> DedupOutcome {
        if !is_valid_name(&group.display_name) {
            return DedupOutcome::InvalidName;
        }
        let name = group.display_name.to_lowercase();
        if self
            .session_seen
            .contains(&(name.clone(), group.key.author.clone()))
        {
            return DedupOutcome::SeenInSession;
        }
        if self.registry_names.contains(&name) {
            return DedupOutcome::InRegistry;
        }
        DedupOutcome::Accepted
    }

    /// Accept a group if it is new, recording its name.
    pub fn accept(&mut self, group: &CandidateGroup) -> DedupOutcome {
        let outcome = self.check(group);
        if outcome == DedupOutcome::Accepted {
            let name = group.display_name.to_lowercase();
            self.registry_names.insert(name.clone());
            self.session_seen.insert((name, group.key.author.clone()));
        }
        outcome
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.registry_names.contains(&name.trim().to_lowercase())
    }
}
