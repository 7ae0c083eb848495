use async_trait::async_trait;

use crate::entities::{PagePayload, RunNotification, SyncEvent};
use crate::value_objects::{NaturalKey, QueryContext};

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Follow a cursor, resending the context the feed was opened with.
    async fn fetch_page(&self, cursor: &str, context: &QueryContext) -> anyhow::Result<PagePayload>;
}

#[async_trait]
pub trait RemoteSource: PageFetcher {
    /// First page of the event index for the given filter context.
    async fn fetch_event_index(&self, context: &QueryContext) -> anyhow::Result<PagePayload>;
    /// First page of one event's result feed.
    async fn fetch_event_results(&self, key: &NaturalKey) -> anyhow::Result<PagePayload>;
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: &RunNotification) -> anyhow::Result<()>;
}

pub trait SyncObserver: Send + Sync {
    fn observe(&self, event: &SyncEvent);
}
