// Deduplicator
// Classifies candidate events against the keys and display names already in
// the destination. The existing set only grows during a run: inserts made by
// the run are folded back in so a repeated candidate is rejected.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::entities::SkipReason;
use crate::value_objects::NaturalKey;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingKeySet {
    keys: HashSet<NaturalKey>,
    names: HashSet<String>,
}

impl ExistingKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys(keys: impl IntoIterator<Item = NaturalKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            names: HashSet::new(),
        }
    }

    pub fn insert_key(&mut self, key: NaturalKey) -> bool {
        self.keys.insert(key)
    }

    pub fn insert_name(&mut self, name: &str) -> bool {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return false;
        }
        self.names.insert(normalized)
    }

    pub fn contains_key(&self, key: &NaturalKey) -> bool {
        self.keys.contains(key)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains(&normalize_name(name))
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn name_count(&self) -> usize {
        self.names.len()
    }
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateIdentity {
    pub key: NaturalKey,
    pub name: Option<String>,
}

impl CandidateIdentity {
    pub fn new(key: NaturalKey, name: Option<String>) -> Self {
        Self { key, name }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub fresh: BTreeSet<NaturalKey>,
    pub duplicate: BTreeMap<NaturalKey, SkipReason>,
}

/// Key match first; a display-name match also counts, guarding against key churn at the source.
pub fn duplicate_reason(candidate: &CandidateIdentity, existing: &ExistingKeySet) -> Option<SkipReason> {
    if existing.contains_key(&candidate.key) {
        return Some(SkipReason::KeyExists);
    }
    match candidate.name.as_deref() {
        Some(name) if existing.contains_name(name) => Some(SkipReason::NameExists),
        _ => None,
    }
}

pub fn classify<'a>(
    candidates: impl IntoIterator<Item = &'a CandidateIdentity>,
    existing: &ExistingKeySet,
) -> Classification {
    let mut classification = Classification::default();
    for candidate in candidates {
        match duplicate_reason(candidate, existing) {
            Some(reason) => {
                classification.duplicate.insert(candidate.key.clone(), reason);
            }
            None => {
                classification.fresh.insert(candidate.key.clone());
            }
        }
    }
    classification
}

#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    existing: ExistingKeySet,
}

impl Deduplicator {
    pub fn new(existing: ExistingKeySet) -> Self {
        Self { existing }
    }

    pub fn existing(&self) -> &ExistingKeySet {
        &self.existing
    }

    /// Fold in keys reported by the batched existence query.
    pub fn absorb_keys(&mut self, keys: impl IntoIterator<Item = NaturalKey>) -> usize {
        keys.into_iter()
            .filter(|key| self.existing.insert_key(key.clone()))
            .count()
    }

    pub fn check(&self, candidate: &CandidateIdentity) -> Option<SkipReason> {
        duplicate_reason(candidate, &self.existing)
    }

    pub fn classify<'a>(
        &self,
        candidates: impl IntoIterator<Item = &'a CandidateIdentity>,
    ) -> Classification {
        classify(candidates, &self.existing)
    }

    pub fn record_inserted(&mut self, key: &NaturalKey, name: &str) {
        self.existing.insert_key(key.clone());
        self.existing.insert_name(name);
    }
}
