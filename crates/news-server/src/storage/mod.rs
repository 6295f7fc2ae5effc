//! Storage layer
//!
//! PostgreSQL (`db`) for durable storage, a mutex-guarded list (`memory`)
//! for throwaway runs. Both implement `news_core::NewsStore`.

pub mod db;
pub mod memory;
pub mod retry;

pub use db::Database;
pub use memory::MemoryStore;
pub use retry::RetryPolicy;
