// Sync settings entity
// The slice of configuration the orchestrator itself consumes.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::ports::InsertAck;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Event index years, fetched in this order.
    pub years: Vec<i32>,
    /// Keep only the N most recent candidates after sorting.
    pub max_candidates: Option<usize>,
    pub insert_ack: InsertAck,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            years: Vec::new(),
            max_candidates: Some(30),
            insert_ack: InsertAck::Minimal,
        }
    }
}

impl SyncSettings {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.years.is_empty() {
            return Err(ConfigurationError::new("at least one event year is required"));
        }
        if self.max_candidates == Some(0) {
            return Err(ConfigurationError::new("max_candidates must be greater than 0"));
        }
        Ok(())
    }
}
