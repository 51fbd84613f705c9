pub mod models;
pub mod planner;

pub use models::{is_eligible, PostStatus, ScheduledPost, MAX_RETRIES};
pub use planner::plan_daily_posts;
