use anyhow::Context;
use tracing::{info, warn};

use crate::AppState;
use liftsync_domain::{
    collate, flatten, Feed, PageWalker, QueryContext, Record, SyncEvent, WalkOutcome,
};

/// Every page of one year's event index, flattened in page order.
pub async fn fetch_event_index(state: &AppState, year: i32) -> anyhow::Result<Vec<Record>> {
    let context = QueryContext::for_year(year);
    let first = state
        .remote
        .fetch_event_index(&context)
        .await
        .with_context(|| format!("event index for {year}"))?;
    info!(
        year,
        total = ?first.total,
        items_per_page = ?first.items_per_page,
        current_page = ?first.current_page,
        "fetched event index first page"
    );

    let outcome = PageWalker::new(&*state.remote, context).walk(first).await;
    report_walk(state, Feed::EventIndex(year), &outcome);
    Ok(flatten(collate(outcome.pages)))
}

/// Concatenates the per-year indexes in the given year order. A year whose
/// first page cannot be fetched is logged and left out.
pub async fn build_event_index(state: &AppState, years: &[i32]) -> Vec<Record> {
    let mut records = Vec::new();
    for &year in years {
        match fetch_event_index(state, year).await {
            Ok(events) => {
                info!(year, events = events.len(), "collected event index");
                records.extend(events);
            }
            Err(err) => {
                warn!(year, error = %format!("{err:#}"), "skipping event index year");
                state.observer.observe(&SyncEvent::FeedFailed {
                    feed: Feed::EventIndex(year),
                    error: format!("{err:#}"),
                });
            }
        }
    }
    records
}

pub(crate) fn report_walk(state: &AppState, feed: Feed, outcome: &WalkOutcome) {
    for page in &outcome.pages {
        state.observer.observe(&SyncEvent::PageFetched {
            feed: feed.clone(),
            index: page.index,
            items: page.items.len(),
        });
    }
    if let Some(err) = &outcome.interrupted {
        state.observer.observe(&SyncEvent::FeedFailed {
            feed,
            error: err.clone(),
        });
    }
}
