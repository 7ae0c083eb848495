// Result row entity
// A flattened result ready for the destination table. `id` is allocated once
// per emitted row and never changes afterwards.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::value_objects::NaturalKey;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    #[serde(rename = "id")]
    pub allocated_id: i64,
    #[serde(rename = "event_id")]
    pub event_key: NaturalKey,
    #[serde(rename = "meet")]
    pub event_name: String,
    pub date: Option<NaiveDate>,
    pub name: Option<String>,
    pub age: Option<Value>,
    pub body_weight: Option<Value>,
    pub snatch1: Option<Value>,
    pub snatch2: Option<Value>,
    pub snatch3: Option<Value>,
    pub snatch_best: Option<Value>,
    pub cj1: Option<Value>,
    pub cj2: Option<Value>,
    pub cj3: Option<Value>,
    pub cj_best: Option<Value>,
    pub total: Option<Value>,
}

impl ResultRow {
    /// Destination columns the lifter fields always serialize under. The
    /// configurable id, key and name columns must stay clear of these.
    pub const FIXED_COLUMNS: [&'static str; 13] = [
        "date",
        "name",
        "age",
        "body_weight",
        "snatch1",
        "snatch2",
        "snatch3",
        "snatch_best",
        "cj1",
        "cj2",
        "cj3",
        "cj_best",
        "total",
    ];
}
