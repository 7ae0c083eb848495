// Run summary entities

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::value_objects::NaturalKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    MissingKey,
    MissingDisplayName,
    KeyExists,
    NameExists,
    AlreadyProcessed,
    DetailFetchFailed(String),
    NoResults,
    InsertFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingKey => f.write_str("missing natural key"),
            SkipReason::MissingDisplayName => f.write_str("missing display name"),
            SkipReason::KeyExists => f.write_str("key already in destination"),
            SkipReason::NameExists => f.write_str("display name already in destination"),
            SkipReason::AlreadyProcessed => f.write_str("already processed this run"),
            SkipReason::DetailFetchFailed(err) => write!(f, "detail fetch failed: {err}"),
            SkipReason::NoResults => f.write_str("no result rows"),
            SkipReason::InsertFailed(err) => write!(f, "batch insert failed: {err}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCandidate {
    pub key: Option<NaturalKey>,
    pub name: Option<String>,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncSummary {
    pub run_id: Uuid,
    pub candidates_seen: usize,
    pub count_added: usize,
    pub rows_inserted: usize,
    pub skipped: Vec<SkippedCandidate>,
}

impl SyncSummary {
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            candidates_seen: 0,
            count_added: 0,
            rows_inserted: 0,
            skipped: Vec::new(),
        }
    }

    pub fn skipped_with(&self, reason: &SkipReason) -> usize {
        self.skipped.iter().filter(|item| &item.reason == reason).count()
    }
}
