// Page entities
// `PagePayload` is the wire shape of one paginated response, `Page` is the
// same payload after the walker has assigned its traversal index.

use serde::{Deserialize, Serialize};

use crate::entities::Record;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagePayload {
    #[serde(default)]
    pub data: Vec<Record>,
    #[serde(default)]
    pub next_page_url: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub items_per_page: Option<u64>,
    #[serde(default)]
    pub current_page: Option<u64>,
}

impl PagePayload {
    pub fn new(data: Vec<Record>, next_page_url: Option<String>) -> Self {
        Self {
            data,
            next_page_url,
            ..Self::default()
        }
    }

    /// The follow-up cursor, ignoring blank urls.
    pub fn cursor(&self) -> Option<&str> {
        self.next_page_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub index: usize,
    pub cursor: Option<String>,
    pub items: Vec<Record>,
    pub has_more: bool,
}

impl Page {
    pub fn from_payload(index: usize, payload: PagePayload) -> Self {
        let cursor = payload.cursor().map(ToString::to_string);
        Self {
            index,
            has_more: cursor.is_some(),
            cursor,
            items: payload.data,
        }
    }
}
