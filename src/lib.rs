//! # halpub
//!
//! Fetches bibliographic records from the HAL open archive
//! (<https://hal.archives-ouvertes.fr>), classifies each record into a fixed
//! publication taxonomy, and renders them into categorized lists.
//!
//! ## Architecture
//!
//! - [`models`]: the category taxonomy and the typed HAL record schema
//! - [`query`]: structured search query construction
//! - [`client`]: HTTP fetching and the category/comment-override merge
//! - [`classify`]: the priority-ordered classification decision tree
//! - [`render`]: HTML and terminal presentation of grouped records
//! - [`config`]: configuration management

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod render;

// Re-export commonly used types
pub use classify::{classify, group_by_category, GroupedRecords};
pub use client::HalClient;
pub use error::Error;
pub use models::{Category, Record};
pub use query::SearchQuery;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
