pub mod analyses;
pub mod analyze;
pub mod chat;
pub mod classify;
pub mod dispatch;
pub mod prune;
pub mod schema;
pub mod shared;
