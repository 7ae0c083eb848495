// Sync Application Layer

pub mod commands;
pub mod error;
pub mod queries;
pub mod state;

pub use error::AppError;
pub use state::AppState;
