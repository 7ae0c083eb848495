// Record entity
// An opaque field map for either an event or a result row, in either the
// structured or the table-derived shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value_objects::{FieldPath, LogicalField};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Value at one path, if present and usable (not null, not a blank string).
    pub fn resolve(&self, path: FieldPath) -> Option<&Value> {
        let value = match path {
            FieldPath::Key(key) => self.0.get(key),
            FieldPath::Column(label) => self
                .0
                .get("columns")
                .and_then(|columns| columns.get(label))
                .and_then(|cell| cell.get("value")),
        }?;
        is_usable(value).then_some(value)
    }

    /// First usable value along the field's synonym list.
    pub fn lookup(&self, field: &LogicalField) -> Option<&Value> {
        field.paths.iter().find_map(|path| self.resolve(*path))
    }

    pub fn lookup_text(&self, field: &LogicalField) -> Option<String> {
        field
            .paths
            .iter()
            .find_map(|path| self.resolve(*path).and_then(value_to_text))
    }

    /// `action[0].route`, the path the structured shape links its detail feed by.
    pub fn action_route(&self) -> Option<&str> {
        self.0
            .get("action")
            .and_then(Value::as_array)
            .and_then(|actions| actions.first())
            .and_then(|action| action.get("route"))
            .and_then(Value::as_str)
    }
}

fn is_usable(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        _ => true,
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
