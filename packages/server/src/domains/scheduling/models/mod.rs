mod scheduled_post;

pub use scheduled_post::{is_eligible, PostStatus, ScheduledPost, MAX_RETRIES};
