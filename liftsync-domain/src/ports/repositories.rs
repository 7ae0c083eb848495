use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::ResultRow;
use crate::services::ExistingKeySet;
use crate::value_objects::NaturalKey;

/// What the store should send back after a batch write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertAck {
    #[default]
    Minimal,
    Representation,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertReceipt {
    pub rows_written: usize,
    pub returned: Option<Vec<Value>>,
}

#[async_trait]
pub trait DestinationStore: Send + Sync {
    /// Snapshot of stored keys and lower-cased display names.
    async fn load_existing(&self) -> anyhow::Result<ExistingKeySet>;
    /// One query with an IN predicate over every candidate key; returns the keys already stored.
    async fn find_existing_keys(&self, keys: &[NaturalKey]) -> anyhow::Result<Vec<NaturalKey>>;
    /// Highest row id, `None` for an empty table.
    async fn fetch_max_id(&self) -> anyhow::Result<Option<i64>>;
    async fn insert_rows(&self, rows: &[ResultRow], ack: InsertAck) -> anyhow::Result<InsertReceipt>;
}
