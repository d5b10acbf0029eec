pub mod error;
pub mod models;
pub mod schedule;
pub mod timeline;
