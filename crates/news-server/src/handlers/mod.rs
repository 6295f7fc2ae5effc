//! HTTP handlers

pub mod health;
pub mod index;
pub mod news;

pub use health::db_health;
pub use index::index;
