//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Change batches and their atomic application
//! - Line and blank-line helpers
//! - Error types and result types

pub mod changes;
pub mod error;
pub mod lines;

// Re-export commonly used items
pub use changes::{ChangeSet, ChangeSpec, Range};
pub use error::{TableError, TableResult};
pub use lines::Direction;
