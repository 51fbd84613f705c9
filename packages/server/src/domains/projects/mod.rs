pub mod models;

pub use models::{Article, Keyword, Project};
