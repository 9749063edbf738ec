//! Dupe Sweeper - duplicate and oversized file finder with a recoverable trash
//!
//! This crate provides functionality for:
//! - Walking a directory tree into file records
//! - Grouping files by identical size, optionally confirmed by content
//! - Flagging statistically large files
//! - Breaking down space by extension and category
//! - Moving files to a trash directory, recovering them and expiring old entries

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod disk;
pub mod error;
pub mod scanner;
pub mod trash;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SweeperError};
