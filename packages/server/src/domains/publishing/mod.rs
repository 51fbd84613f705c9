pub mod executor;
pub mod pipeline;

pub use executor::execute_due_post;
pub use pipeline::{run_pipeline, KeywordAnalysis, PublishedArticle};
