//! News Core Library
//!
//! Domain types, errors, and the storage port shared by every news backend.

pub mod error;
pub mod ports;
pub mod types;

pub use error::{NewsError, Result};
pub use ports::NewsStore;
pub use types::{NewsItem, NewsUpdate};
