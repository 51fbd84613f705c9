pub mod cron;
pub mod health;

pub use cron::{trigger_execute, trigger_plan};
pub use health::health_handler;
