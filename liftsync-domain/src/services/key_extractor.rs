// Natural key and display name extraction

use crate::entities::Record;
use crate::error::ExtractionError;
use crate::value_objects::{NaturalKey, EVENT_FALLBACK_ID, EVENT_NAME};

/// Last segment of `action[0].route`, else the record's `id`.
pub fn extract_key(record: &Record) -> Result<NaturalKey, ExtractionError> {
    if let Some(key) = record.action_route().and_then(key_from_route) {
        return Ok(key);
    }
    record
        .lookup_text(&EVENT_FALLBACK_ID)
        .and_then(|id| NaturalKey::parse(&id))
        .ok_or(ExtractionError::MissingKey)
}

pub fn extract_display_name(record: &Record) -> Result<String, ExtractionError> {
    record
        .lookup_text(&EVENT_NAME)
        .ok_or(ExtractionError::MissingDisplayName)
}

fn key_from_route(route: &str) -> Option<NaturalKey> {
    route.rsplit('/').next().and_then(NaturalKey::parse)
}
