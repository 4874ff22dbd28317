//! Data models for statements and configuration.

pub mod config;
pub mod transaction;

pub use config::*;
pub use transaction::*;
