// Structured sync events consumed by the observer port

use serde::Serialize;
use uuid::Uuid;

use crate::entities::SkipReason;
use crate::value_objects::NaturalKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "feed", content = "scope", rename_all = "snake_case")]
pub enum Feed {
    EventIndex(i32),
    EventResults(NaturalKey),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    RunStarted {
        run_id: Uuid,
    },
    PageFetched {
        feed: Feed,
        index: usize,
        items: usize,
    },
    FeedFailed {
        feed: Feed,
        error: String,
    },
    CandidateSkipped {
        key: Option<NaturalKey>,
        name: Option<String>,
        reason: SkipReason,
    },
    BatchInserted {
        key: NaturalKey,
        name: String,
        rows: usize,
        first_id: i64,
        last_id: i64,
    },
    RunSummary {
        run_id: Uuid,
        count_added: usize,
        rows_inserted: usize,
        skipped: usize,
    },
}

/// Summary pushed to the notification sink once a run completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunNotification {
    #[serde(skip)]
    pub run_id: Uuid,
    pub count_added: usize,
}
