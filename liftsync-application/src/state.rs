use std::sync::Arc;

use liftsync_domain::ports::{DestinationStore, NotificationSink, RemoteSource, SyncObserver};
use liftsync_domain::SyncSettings;

#[derive(Clone)]
pub struct AppState {
    pub settings: SyncSettings,
    pub remote: Arc<dyn RemoteSource>,
    pub store: Arc<dyn DestinationStore>,
    pub notifier: Arc<dyn NotificationSink>,
    pub observer: Arc<dyn SyncObserver>,
}
