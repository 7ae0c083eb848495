pub mod sport80_client;

pub use sport80_client::*;
