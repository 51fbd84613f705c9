// ContentFlow - automated WordPress publishing backend
//
// Plans AI-generated posts from per-project keyword pools (daily Planner) and
// drives due posts through a generate/publish pipeline (Executor). The two only
// coordinate through the scheduled_posts table.
//
// Architecture follows domain-driven design: infrastructure in kernel/,
// business logic in domains/, HTTP surface in server/.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
