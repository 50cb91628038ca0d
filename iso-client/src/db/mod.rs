pub mod generation_queries;
pub mod range_metadata_queries;
