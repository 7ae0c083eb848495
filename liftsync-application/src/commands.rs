pub mod sync_commands;

pub use sync_commands::run_sync;
