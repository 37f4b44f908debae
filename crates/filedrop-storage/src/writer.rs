//! Retrying object writer.
//!
//! The writer is the single point of interaction with the storage backend
//! for uploads. Every call generates a fresh identifier, resolves the target
//! bucket, attaches filename metadata, and retries the whole put with
//! exponential backoff until the retry period is exhausted.

use std::sync::Arc;

use bytes::Bytes;
use filedrop_core::constants::DEFAULT_NAME_LEN;
use filedrop_core::RetryPolicy;
use rand::Rng;
use tokio::time::Instant;
use uuid::Uuid;

use crate::keys;
use crate::traits::{ObjectOptions, Storage, StorageResult};

/// Writes upload payloads to the storage backend under freshly generated
/// identifiers.
#[derive(Clone)]
pub struct ObjectWriter {
    storage: Arc<dyn Storage>,
    default_bucket: String,
    retry: RetryPolicy,
}

impl ObjectWriter {
    pub fn new(storage: Arc<dyn Storage>, default_bucket: impl Into<String>) -> Self {
        ObjectWriter {
            storage,
            default_bucket: default_bucket.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the default retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    pub fn storage(&self) -> Arc<dyn Storage> {
        self.storage.clone()
    }

    /// The bucket a write lands in: the explicit override when supplied,
    /// else the configured default.
    pub fn resolve_bucket<'a>(&'a self, bucket_override: Option<&'a str>) -> &'a str {
        bucket_override.unwrap_or(&self.default_bucket)
    }

    /// Write `data` under a fresh identifier and return it.
    ///
    /// The open/write/close sequence is retried as a unit per the retry
    /// policy. Identifiers are never reused and identical content is never
    /// deduplicated. When `name` is absent a random one is generated.
    pub async fn write(
        &self,
        data: Bytes,
        content_type: &str,
        name: Option<&str>,
        bucket_override: Option<&str>,
        force_download: bool,
    ) -> StorageResult<Uuid> {
        let bucket = self.resolve_bucket(bucket_override);
        keys::validate_bucket(bucket)?;

        let id = Uuid::new_v4();
        let key = keys::object_key(bucket, id);

        // Non-ASCII filename bytes are replaced rather than rejected; the
        // metadata value must survive any backend's header encoding.
        let name = match name {
            Some(n) if !n.is_empty() => sanitize_ascii(n),
            _ => random_name(),
        };

        let opts = ObjectOptions {
            content_type: content_type.to_string(),
            filename: Some(name.clone()),
            content_disposition: force_download
                .then(|| format!("attachment; filename={}", name)),
        };

        let start = Instant::now();
        let deadline = start + self.retry.max_retry_period;
        let mut delay = self.retry.initial_delay;
        let mut attempt: u32 = 1;

        loop {
            match self.storage.put(&key, data.clone(), &opts).await {
                Ok(()) => {
                    tracing::info!(
                        key = %key,
                        name = %name,
                        size_bytes = data.len(),
                        attempts = attempt,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "Object written"
                    );
                    return Ok(id);
                }
                Err(e) if e.is_retryable() && Instant::now() < deadline => {
                    tracing::warn!(
                        error = %e,
                        key = %key,
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Storage write failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = self.retry.next_delay(delay);
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        key = %key,
                        attempts = attempt,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "Storage write failed, giving up"
                    );
                    return Err(e);
                }
            }
        }
    }
}

/// Replace non-ASCII characters so the name survives header encoding.
fn sanitize_ascii(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect()
}

/// Fallback object name when the client declared none.
fn random_name() -> String {
    const ASCII_LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::rng();
    (0..DEFAULT_NAME_LEN)
        .map(|_| ASCII_LETTERS[rng.random_range(0..ASCII_LETTERS.len())] as char)
        .collect()
}
