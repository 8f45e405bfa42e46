//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod categories;
pub mod health;
pub mod insights;
pub mod summary;
pub mod transactions;

// Re-export all handlers for use in router
pub use categories::*;
pub use health::*;
pub use insights::*;
pub use summary::*;
pub use transactions::*;
