//! Filedrop API Library
//!
//! This crate provides the HTTP API handlers and application setup.

// Module declarations
pub mod constants;
mod handlers;
mod telemetry;
mod utils;

// Public modules
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
