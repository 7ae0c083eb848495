// Query context value object
// The filter body a paginated feed was opened with; the remote endpoint keeps
// no filter state, so every follow-up page request must resend it.

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QueryContext(Option<Value>);

impl QueryContext {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn date_range(start: &str, end: &str) -> Self {
        Self(Some(json!({
            "date_range_start": start,
            "date_range_end": end,
        })))
    }

    pub fn for_year(year: i32) -> Self {
        Self::date_range(&format!("{year}-01-01"), &format!("{year}-12-31"))
    }

    pub fn body(&self) -> Option<&Value> {
        self.0.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Value> for QueryContext {
    fn from(value: Value) -> Self {
        Self(Some(value))
    }
}
