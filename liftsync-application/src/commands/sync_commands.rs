// Sync orchestration
//
// LOAD_EXISTING -> FETCH_CANDIDATES -> SORT_AND_TRUNCATE -> FILTER_NEW ->
// per new candidate (FETCH_DETAIL -> FORMAT_ROWS -> ALLOCATE_IDS -> BATCH_INSERT) -> DONE
//
// Strictly sequential. Only the dedup baseline (existing snapshot, max id,
// batched existence check) is fatal; every per-candidate failure is recorded
// as a skip and the run moves on.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::queries::event_index_queries::build_event_index;
use crate::queries::event_result_queries::fetch_event_results;
use crate::{AppError, AppState};
use liftsync_domain::{
    extract_display_name, extract_key, format_rows, resolve_date, storable_date, CandidateIdentity,
    Deduplicator, EventContext, IdAllocator, NaturalKey, Record, RunNotification, SkipReason,
    SkippedCandidate, SyncEvent, SyncSummary,
};

/// An index record with its resolved date, in sorted position.
#[derive(Debug, Clone)]
struct DatedEvent {
    record: Record,
    date: NaiveDate,
}

/// A dated event whose key and display name could be extracted, with the
/// verdict against the destination baseline.
#[derive(Debug, Clone)]
struct Candidate {
    identity: CandidateIdentity,
    name: String,
    date: NaiveDate,
    duplicate: Option<SkipReason>,
}

pub async fn run_sync(state: &AppState) -> Result<SyncSummary, AppError> {
    state.settings.validate()?;

    let run_id = Uuid::new_v4();
    state.observer.observe(&SyncEvent::RunStarted { run_id });
    info!(%run_id, years = ?state.settings.years, "starting sync run");

    let mut run = load_existing(state, run_id).await?;

    let records = build_event_index(state, &state.settings.years).await;
    let events = sort_and_truncate(records, state.settings.max_candidates);
    run.summary.candidates_seen = events.len();
    info!(%run_id, candidates = events.len(), "candidate events selected");

    let candidates = run.filter_new(events).await?;
    for candidate in candidates {
        run.process_candidate(candidate).await;
    }

    Ok(run.finish().await)
}

/// Newest first; `sort_by` is stable so equal dates keep fetch order.
fn sort_and_truncate(records: Vec<Record>, limit: Option<usize>) -> Vec<DatedEvent> {
    let mut events = records
        .into_iter()
        .map(|record| DatedEvent {
            date: resolve_date(&record),
            record,
        })
        .collect::<Vec<_>>();
    events.sort_by(|a, b| b.date.cmp(&a.date));
    if let Some(limit) = limit {
        events.truncate(limit);
    }
    events
}

async fn load_existing(state: &AppState, run_id: Uuid) -> Result<SyncRun<'_>, AppError> {
    let existing = state
        .store
        .load_existing()
        .await
        .map_err(AppError::fetch("loading existing events"))?;
    let max_id = state
        .store
        .fetch_max_id()
        .await
        .map_err(AppError::fetch("max id lookup"))?
        .unwrap_or(0);
    info!(
        %run_id,
        keys = existing.key_count(),
        names = existing.name_count(),
        max_id,
        next_id = max_id + 1,
        "loaded destination state"
    );

    Ok(SyncRun {
        state,
        dedup: Deduplicator::new(existing),
        inserted: Deduplicator::default(),
        allocator: IdAllocator::seed(max_id),
        summary: SyncSummary::new(run_id),
    })
}

struct SyncRun<'a> {
    state: &'a AppState,
    dedup: Deduplicator,
    /// Keys and names written by this run.
    inserted: Deduplicator,
    allocator: IdAllocator,
    summary: SyncSummary,
}

impl SyncRun<'_> {
    async fn filter_new(&mut self, events: Vec<DatedEvent>) -> Result<Vec<Candidate>, AppError> {
        let mut candidates = Vec::with_capacity(events.len());
        let mut seen = HashSet::new();
        for event in events {
            let key = match extract_key(&event.record) {
                Ok(key) => key,
                Err(_) => {
                    let name = extract_display_name(&event.record).ok();
                    self.skip(None, name, SkipReason::MissingKey);
                    continue;
                }
            };
            let Ok(name) = extract_display_name(&event.record) else {
                self.skip(Some(key), None, SkipReason::MissingDisplayName);
                continue;
            };
            if !seen.insert(key.clone()) {
                self.skip(Some(key), Some(name), SkipReason::AlreadyProcessed);
                continue;
            }
            candidates.push(Candidate {
                identity: CandidateIdentity::new(key, Some(name.clone())),
                name,
                date: event.date,
                duplicate: None,
            });
        }

        let mut keys = seen.into_iter().collect::<Vec<_>>();
        keys.sort();
        if !keys.is_empty() {
            let found = self
                .state
                .store
                .find_existing_keys(&keys)
                .await
                .map_err(AppError::fetch("existence check"))?;
            let absorbed = self.dedup.absorb_keys(found);
            if absorbed > 0 {
                info!(absorbed, "existence check found keys missing from snapshot");
            }
        }

        let mut classification = self
            .dedup
            .classify(candidates.iter().map(|candidate| &candidate.identity));
        info!(
            fresh = classification.fresh.len(),
            duplicate = classification.duplicate.len(),
            "classified candidates"
        );
        for candidate in &mut candidates {
            candidate.duplicate = classification.duplicate.remove(&candidate.identity.key);
        }
        Ok(candidates)
    }

    async fn process_candidate(&mut self, candidate: Candidate) {
        let key = candidate.identity.key.clone();
        let duplicate = candidate
            .duplicate
            .or_else(|| self.inserted.check(&candidate.identity));
        if let Some(reason) = duplicate {
            self.skip(Some(key), Some(candidate.name), reason);
            return;
        }

        info!(key = %key, name = %candidate.name, "processing new event");
        let results = match fetch_event_results(self.state, &key).await {
            Ok(results) => results,
            Err(err) => {
                let reason = SkipReason::DetailFetchFailed(format!("{err:#}"));
                self.skip(Some(key), Some(candidate.name), reason);
                return;
            }
        };

        let event = EventContext {
            key: &key,
            name: &candidate.name,
            date: storable_date(candidate.date),
        };
        let rows = format_rows(&results, event, &mut self.allocator);
        let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
            self.skip(Some(key), Some(candidate.name), SkipReason::NoResults);
            return;
        };
        let (first_id, last_id) = (first.allocated_id, last.allocated_id);

        match self
            .state
            .store
            .insert_rows(&rows, self.state.settings.insert_ack)
            .await
        {
            Ok(receipt) => {
                self.inserted.record_inserted(&key, &candidate.name);
                self.summary.count_added += 1;
                self.summary.rows_inserted += rows.len();
                if let Some(returned) = &receipt.returned {
                    info!(key = %key, returned = returned.len(), "store returned inserted rows");
                }
                self.state.observer.observe(&SyncEvent::BatchInserted {
                    key,
                    name: candidate.name,
                    rows: rows.len(),
                    first_id,
                    last_id,
                });
            }
            Err(err) => {
                error!(key = %key, error = %format!("{err:#}"), "batch insert failed");
                let reason = SkipReason::InsertFailed(format!("{err:#}"));
                self.skip(Some(key), Some(candidate.name), reason);
            }
        }
    }

    fn skip(&mut self, key: Option<NaturalKey>, name: Option<String>, reason: SkipReason) {
        self.state.observer.observe(&SyncEvent::CandidateSkipped {
            key: key.clone(),
            name: name.clone(),
            reason: reason.clone(),
        });
        self.summary.skipped.push(SkippedCandidate { key, name, reason });
    }

    async fn finish(self) -> SyncSummary {
        let summary = self.summary;
        self.state.observer.observe(&SyncEvent::RunSummary {
            run_id: summary.run_id,
            count_added: summary.count_added,
            rows_inserted: summary.rows_inserted,
            skipped: summary.skipped.len(),
        });

        let notification = RunNotification {
            run_id: summary.run_id,
            count_added: summary.count_added,
        };
        if let Err(err) = self.state.notifier.notify(&notification).await {
            warn!(error = %format!("{err:#}"), "run notification failed");
        }
        summary
    }
}
