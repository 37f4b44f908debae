//! Filedrop Storage Library
//!
//! This crate provides the storage abstraction and implementations for
//! Filedrop, plus the retrying object writer that the upload pipeline uses.
//!
//! # Storage key format
//!
//! Objects are addressed as `{bucket}/{uuid}` where the bucket is either the
//! configured default or an explicit per-request override, and the uuid is
//! freshly generated for every write. Keys must not contain `..` or a
//! leading `/`. Key generation is centralized in the `keys` module so all
//! backends stay consistent.

pub mod factory;
pub mod keys;
pub mod local;
pub mod s3;
pub mod traits;
pub mod writer;

// Re-export commonly used types
pub use factory::create_storage;
pub use filedrop_core::StorageBackend;
pub use local::LocalStorage;
pub use s3::S3Storage;
pub use traits::{ObjectInfo, ObjectOptions, Storage, StorageError, StorageResult};
pub use writer::ObjectWriter;
