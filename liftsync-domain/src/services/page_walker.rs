// Page walker
// Follows `next_page_url` cursors from a first page until the chain ends or a
// fetch fails. A failed fetch ends the walk with the pages gathered so far;
// there is no retry and no page cap.

use futures_util::future::ready;
use futures_util::stream::{self, Stream, StreamExt};
use tracing::{debug, warn};

use crate::entities::{Page, PagePayload};
use crate::ports::PageFetcher;
use crate::value_objects::QueryContext;

pub struct PageWalker<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    context: QueryContext,
}

/// Pages gathered by a walk plus the error that cut it short, if any.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub pages: Vec<Page>,
    pub interrupted: Option<String>,
}

enum WalkState {
    First(PagePayload),
    Next { cursor: String, index: usize },
    Done,
}

impl<'a, F: PageFetcher + ?Sized> PageWalker<'a, F> {
    pub fn new(fetcher: &'a F, context: QueryContext) -> Self {
        Self { fetcher, context }
    }

    /// Lazy page sequence; ends quietly on the first failed fetch.
    pub fn traverse(self, first: PagePayload) -> impl Stream<Item = Page> + Send + 'a {
        self.steps(first)
            .take_while(|step| ready(step.is_ok()))
            .filter_map(|step| ready(step.ok()))
    }

    pub async fn walk(self, first: PagePayload) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();
        let mut steps = Box::pin(self.steps(first));
        while let Some(step) = steps.next().await {
            match step {
                Ok(page) => outcome.pages.push(page),
                Err(err) => {
                    outcome.interrupted = Some(err);
                    break;
                }
            }
        }
        outcome
    }

    fn steps(self, first: PagePayload) -> impl Stream<Item = Result<Page, String>> + Send + 'a {
        stream::unfold((self, WalkState::First(first)), |(walker, state)| async move {
            let (index, payload) = match state {
                WalkState::Done => return None,
                WalkState::First(payload) => (0, payload),
                WalkState::Next { cursor, index } => {
                    debug!(index, cursor = %cursor, "fetching next page");
                    match walker.fetcher.fetch_page(&cursor, &walker.context).await {
                        Ok(payload) => (index, payload),
                        Err(err) => {
                            warn!(
                                index,
                                cursor = %cursor,
                                error = %err,
                                "next page fetch failed, keeping pages collected so far"
                            );
                            return Some((Err(format!("{err:#}")), (walker, WalkState::Done)));
                        }
                    }
                }
            };
            let page = Page::from_payload(index, payload);
            let next = match &page.cursor {
                Some(cursor) => WalkState::Next {
                    cursor: cursor.clone(),
                    index: index + 1,
                },
                None => WalkState::Done,
            };
            Some((Ok(page), (walker, next)))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::entities::Record;

    struct ChainFetcher {
        pages: HashMap<String, PagePayload>,
        seen: Mutex<Vec<(String, QueryContext)>>,
    }

    #[async_trait]
    impl PageFetcher for ChainFetcher {
        async fn fetch_page(&self, cursor: &str, context: &QueryContext) -> anyhow::Result<PagePayload> {
            self.seen
                .lock()
                .expect("seen lock")
                .push((cursor.to_string(), context.clone()));
            self.pages
                .get(cursor)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("HTTP 502 for {cursor}"))
        }
    }

    fn item(n: usize) -> Record {
        serde_json::from_value(json!({"id": n})).expect("record")
    }

    fn payload(n: usize, next: Option<String>) -> PagePayload {
        PagePayload::new(vec![item(n)], next)
    }

    /// Chain of `len` pages where page i links to "page-{i+1}"; returns the first payload.
    fn chain(len: usize) -> (PagePayload, ChainFetcher) {
        let mut pages = HashMap::new();
        for i in 1..len {
            let next = (i + 1 < len).then(|| format!("page-{}", i + 1));
            pages.insert(format!("page-{i}"), payload(i, next));
        }
        let first_next = (len > 1).then(|| "page-1".to_string());
        (
            payload(0, first_next),
            ChainFetcher {
                pages,
                seen: Mutex::new(Vec::new()),
            },
        )
    }

    #[tokio::test]
    async fn walks_every_linked_page_in_order() {
        let (first, fetcher) = chain(5);
        let pages: Vec<Page> = PageWalker::new(&fetcher, QueryContext::empty())
            .traverse(first)
            .collect()
            .await;
        assert_eq!(pages.len(), 5);
        assert_eq!(pages.iter().map(|p| p.index).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert!(pages[..4].iter().all(|p| p.has_more));
        assert!(!pages[4].has_more);
    }

    #[tokio::test]
    async fn stops_at_first_page_without_cursor() {
        let (first, mut fetcher) = chain(6);
        // page 2 ends the chain even though pages 3..5 exist
        fetcher.pages.insert("page-2".to_string(), payload(2, None));
        let outcome = PageWalker::new(&fetcher, QueryContext::empty()).walk(first).await;
        assert_eq!(outcome.pages.len(), 3);
        assert!(outcome.interrupted.is_none());
        assert_eq!(fetcher.seen.lock().expect("seen lock").len(), 2);
    }

    #[tokio::test]
    async fn single_page_without_cursor_makes_no_requests() {
        let (first, fetcher) = chain(1);
        let outcome = PageWalker::new(&fetcher, QueryContext::empty()).walk(first).await;
        assert_eq!(outcome.pages.len(), 1);
        assert!(fetcher.seen.lock().expect("seen lock").is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_keeps_partial_result() {
        let (first, mut fetcher) = chain(4);
        fetcher.pages.remove("page-2");
        let outcome = PageWalker::new(&fetcher, QueryContext::empty()).walk(first).await;
        assert_eq!(outcome.pages.len(), 2);
        assert!(outcome
            .interrupted
            .as_deref()
            .is_some_and(|err| err.contains("page-2")));
    }

    #[tokio::test]
    async fn every_follow_up_request_carries_the_original_context() {
        let (first, fetcher) = chain(3);
        let context = QueryContext::for_year(2023);
        let _ = PageWalker::new(&fetcher, context.clone()).walk(first).await;
        let seen = fetcher.seen.lock().expect("seen lock");
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|(_, sent)| sent == &context));
    }

    #[tokio::test]
    async fn blank_cursor_ends_the_chain() {
        let (_, fetcher) = chain(2);
        let first = payload(0, Some("   ".to_string()));
        let outcome = PageWalker::new(&fetcher, QueryContext::empty()).walk(first).await;
        assert_eq!(outcome.pages.len(), 1);
        assert!(!outcome.pages[0].has_more);
    }
}
