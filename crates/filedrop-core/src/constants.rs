//! Default limits and policies for the upload pipeline.

/// Minimum accepted file size in bytes. Rejects empty parts.
pub const UPLOAD_MIN_FILE_SIZE: u64 = 1;

/// Maximum accepted file size in bytes (1 MiB).
pub const UPLOAD_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Accepted content-type pattern. Images only by default.
pub const UPLOAD_ACCEPT_FILE_TYPES: &str = "image/(gif|p?jpeg|jpg|(x-)?png|tiff)";

/// Maximum size of a whole request body (32 MiB). Bounds memory per request;
/// per-file size policy is enforced by the validators, not this cap.
pub const MAX_REQUEST_BODY_SIZE: u64 = 32 * 1024 * 1024;

/// Length of the generated fallback object name when no filename was declared.
pub const DEFAULT_NAME_LEN: usize = 20;

/// Default bucket objects are written to when no override is supplied.
pub const DEFAULT_BUCKET: &str = "uploads";

// Retry policy defaults for storage writes.
pub const RETRY_INITIAL_DELAY_MS: u64 = 200;
pub const RETRY_BACKOFF_FACTOR: f64 = 2.0;
pub const RETRY_MAX_DELAY_MS: u64 = 5_000;
pub const RETRY_MAX_PERIOD_MS: u64 = 15_000;

// CORS defaults.
pub const CORS_ORIGINS: &str = "*";
pub const CORS_METHODS: &str = "OPTIONS,HEAD,GET,POST,PUT";
pub const CORS_HEADERS: &str = "Accept,Content-Type,Origin,X-Requested-With";
