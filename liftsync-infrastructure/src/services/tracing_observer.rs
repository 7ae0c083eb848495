use tracing::{debug, info, warn};

use liftsync_domain::ports::SyncObserver;
use liftsync_domain::{Feed, SkipReason, SyncEvent};

/// Renders sync events as structured tracing records.
#[derive(Default)]
pub struct TracingObserver;

impl SyncObserver for TracingObserver {
    fn observe(&self, event: &SyncEvent) {
        match event {
            SyncEvent::RunStarted { run_id } => {
                info!(%run_id, "run started");
            }
            SyncEvent::PageFetched { feed, index, items } => {
                debug!(feed = %feed_label(feed), index, items, "page fetched");
            }
            SyncEvent::FeedFailed { feed, error } => {
                warn!(feed = %feed_label(feed), error = %error, "feed incomplete");
            }
            SyncEvent::CandidateSkipped { key, name, reason } => {
                let key = key.as_ref().map(|key| key.as_str()).unwrap_or("-");
                let name = name.as_deref().unwrap_or("-");
                match reason {
                    SkipReason::DetailFetchFailed(_) | SkipReason::InsertFailed(_) => {
                        warn!(key, name, reason = %reason, "candidate skipped");
                    }
                    _ => info!(key, name, reason = %reason, "candidate skipped"),
                }
            }
            SyncEvent::BatchInserted {
                key,
                name,
                rows,
                first_id,
                last_id,
            } => {
                info!(key = %key, name = %name, rows, first_id, last_id, "event inserted");
            }
            SyncEvent::RunSummary {
                run_id,
                count_added,
                rows_inserted,
                skipped,
            } => {
                info!(%run_id, count_added, rows_inserted, skipped, "run finished");
            }
        }
    }
}

fn feed_label(feed: &Feed) -> String {
    match feed {
        Feed::EventIndex(year) => format!("event_index:{year}"),
        Feed::EventResults(key) => format!("event_results:{key}"),
    }
}
