pub mod notification_service;
pub mod tracing_observer;

pub use notification_service::*;
pub use tracing_observer::*;
