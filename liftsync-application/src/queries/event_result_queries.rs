use anyhow::Context;

use crate::queries::event_index_queries::report_walk;
use crate::AppState;
use liftsync_domain::{collate, flatten, Feed, NaturalKey, PageWalker, QueryContext, Record};

/// All result rows of one event. Follow-up pages carry no filter context.
pub async fn fetch_event_results(state: &AppState, key: &NaturalKey) -> anyhow::Result<Vec<Record>> {
    let first = state
        .remote
        .fetch_event_results(key)
        .await
        .with_context(|| format!("results for event {key}"))?;
    let outcome = PageWalker::new(&*state.remote, QueryContext::empty())
        .walk(first)
        .await;
    report_walk(state, Feed::EventResults(key.clone()), &outcome);
    Ok(flatten(collate(outcome.pages)))
}
