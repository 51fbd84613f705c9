pub mod projects;
pub mod publishing;
pub mod scheduling;
