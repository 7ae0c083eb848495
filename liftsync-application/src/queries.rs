pub mod event_index_queries;
pub mod event_result_queries;
