// Result row formatter
// Maps detail records onto destination rows. Ids are drawn from the allocator
// one per emitted row, so an empty batch consumes none.

use chrono::NaiveDate;

use crate::entities::{Record, ResultRow};
use crate::services::IdAllocator;
use crate::value_objects::{
    NaturalKey, AGE_CATEGORY, BEST_CLEAN_JERK, BEST_SNATCH, BODY_WEIGHT, CLEAN_JERK_1,
    CLEAN_JERK_2, CLEAN_JERK_3, LIFTER_NAME, SNATCH_1, SNATCH_2, SNATCH_3, TOTAL,
};

/// Event-level values copied onto every row of the event.
#[derive(Debug, Clone, Copy)]
pub struct EventContext<'a> {
    pub key: &'a NaturalKey,
    pub name: &'a str,
    pub date: Option<NaiveDate>,
}

pub fn format_rows(
    records: &[Record],
    event: EventContext<'_>,
    allocator: &mut IdAllocator,
) -> Vec<ResultRow> {
    records
        .iter()
        .map(|record| format_row(record, event, allocator.allocate()))
        .collect()
}

pub fn format_row(record: &Record, event: EventContext<'_>, allocated_id: i64) -> ResultRow {
    ResultRow {
        allocated_id,
        event_key: event.key.clone(),
        event_name: event.name.to_string(),
        date: event.date,
        name: record.lookup_text(&LIFTER_NAME),
        age: record.lookup(&AGE_CATEGORY).cloned(),
        body_weight: record.lookup(&BODY_WEIGHT).cloned(),
        snatch1: record.lookup(&SNATCH_1).cloned(),
        snatch2: record.lookup(&SNATCH_2).cloned(),
        snatch3: record.lookup(&SNATCH_3).cloned(),
        snatch_best: record.lookup(&BEST_SNATCH).cloned(),
        cj1: record.lookup(&CLEAN_JERK_1).cloned(),
        cj2: record.lookup(&CLEAN_JERK_2).cloned(),
        cj3: record.lookup(&CLEAN_JERK_3).cloned(),
        cj_best: record.lookup(&BEST_CLEAN_JERK).cloned(),
        total: record.lookup(&TOTAL).cloned(),
    }
}
