// Domain entities

pub mod events;
pub mod page;
pub mod record;
pub mod result_row;
pub mod settings;
pub mod summary;

pub use events::*;
pub use page::*;
pub use record::*;
pub use result_row::*;
pub use settings::*;
pub use summary::*;
