//! Filedrop Core Library
//!
//! This crate provides the domain models, validators, retry policy,
//! configuration, and error types shared across all Filedrop components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod retry;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, LogLevel};
pub use retry::RetryPolicy;
pub use storage_types::StorageBackend;
