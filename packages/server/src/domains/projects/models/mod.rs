mod article;
mod keyword;
mod project;

pub use article::Article;
pub use keyword::Keyword;
pub use project::Project;
