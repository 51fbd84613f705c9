//! Kernel module - infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

/// Model used for keyword analysis and SEO metadata (JSON-mode completions).
pub const GPT_4_TURBO: &str = "gpt-4-turbo-preview";

/// Model used for article body generation.
pub const GPT_4: &str = "gpt-4";

/// Image model for featured images.
pub const DALL_E_3: &str = "dall-e-3";

pub use ai::OpenAIClient;
pub use deps::{ServerDeps, WordPressAdapter};
pub use test_dependencies::{MockAI, MockWordPress};
pub use traits::*;
