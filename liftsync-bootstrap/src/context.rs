use std::sync::Arc;

use anyhow::Result;

use liftsync_application::AppState;
use liftsync_infrastructure::{
    build_notifier, AppConfig, Sport80Client, SupabaseStore, TracingObserver,
};

pub struct SyncContext {
    pub state: AppState,
}

impl SyncContext {
    /// Builds every adapter from an already validated config.
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let store = Arc::new(SupabaseStore::new(config.to_store_config()?)?);
        let notifier = build_notifier(&config.to_notifier_config())?;
        let remote = Arc::new(Sport80Client::connect(config.to_source_config()).await?);

        let state = AppState {
            settings: config.to_sync_settings(),
            remote,
            store,
            notifier,
            observer: Arc::new(TracingObserver),
        };
        Ok(Self { state })
    }
}
