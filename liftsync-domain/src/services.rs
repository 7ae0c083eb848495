// Core sync services

pub mod collator;
pub mod date_resolver;
pub mod deduplicator;
pub mod id_allocator;
pub mod key_extractor;
pub mod page_walker;
pub mod row_formatter;

pub use collator::*;
pub use date_resolver::*;
pub use deduplicator::*;
pub use id_allocator::*;
pub use key_extractor::*;
pub use page_walker::*;
pub use row_formatter::*;
