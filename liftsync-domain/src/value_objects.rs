// Domain value objects
pub mod fields;
pub mod natural_key;
pub mod query_context;

pub use fields::*;
pub use natural_key::*;
pub use query_context::*;
