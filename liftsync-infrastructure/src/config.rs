pub mod adapter_config;
pub mod app_config;
pub mod validation;

pub use adapter_config::*;
pub use app_config::*;
pub use validation::*;
