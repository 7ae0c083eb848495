use std::time::Duration;

/// Where and how to reach the remote results site.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub domain: String,
    pub index_page_path: String,
    pub event_index_path: String,
    /// Contains `{event_id}`, replaced by the natural key.
    pub event_results_path: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub key: String,
    pub table: String,
    pub key_column: String,
    pub name_column: String,
    pub id_column: String,
    pub request_timeout: Duration,
    pub insert_timeout: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct NotifierConfig {
    pub url: Option<String>,
    pub template: Option<String>,
    pub request_timeout: Duration,
}
