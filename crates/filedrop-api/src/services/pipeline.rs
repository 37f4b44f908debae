//! Upload pipeline: validation followed by a retried storage write, folded
//! into one immutable result per posted file.
//!
//! The pipeline never fails the batch. Each file is judged on its own and the
//! response always carries one entry per file, in request order.

use filedrop_core::models::{PendingUpload, UploadRejection, UploadResult, UploadResultSet};
use filedrop_core::validation::{check_all, Validator};
use filedrop_storage::ObjectWriter;

/// Per-request options applied to every file in the batch.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Target bucket, when the request overrides the configured default.
    pub bucket_override: Option<String>,
    /// Serve the object as an attachment on later downloads.
    pub force_download: bool,
}

/// Runs every posted file through the validator chain and, when it passes,
/// hands it to the retrying writer.
#[derive(Clone)]
pub struct UploadPipeline {
    validators: Vec<Validator>,
    writer: ObjectWriter,
}

impl UploadPipeline {
    pub fn new(validators: Vec<Validator>, writer: ObjectWriter) -> Self {
        UploadPipeline { validators, writer }
    }

    /// Process a batch of pending uploads.
    ///
    /// Validators run in order and the first failure becomes the file's
    /// rejection reason; a file that passes validation but whose storage
    /// write ultimately fails is reported as `write_failed`. A failure never
    /// affects the other files in the batch.
    pub async fn process(
        &self,
        uploads: Vec<PendingUpload>,
        options: &UploadOptions,
    ) -> UploadResultSet {
        let mut results = UploadResultSet::with_capacity(uploads.len());

        for upload in &uploads {
            if let Err(reason) = check_all(&self.validators, upload) {
                tracing::debug!(
                    file = %upload.file_name,
                    content_type = %upload.content_type,
                    size_bytes = upload.size(),
                    reason = %reason,
                    "Upload rejected by validation"
                );
                results.push(UploadResult::rejected(upload, reason));
                continue;
            }

            match self
                .writer
                .write(
                    upload.data.clone(),
                    &upload.content_type,
                    Some(&upload.file_name),
                    options.bucket_override.as_deref(),
                    options.force_download,
                )
                .await
            {
                Ok(id) => {
                    results.push(UploadResult::success(upload, id));
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        file = %upload.file_name,
                        "Storage write failed for upload"
                    );
                    results.push(UploadResult::rejected(upload, UploadRejection::WriteFailed));
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use filedrop_core::validation::default_validators;
    use filedrop_core::{RetryPolicy, StorageBackend};
    use filedrop_storage::{ObjectInfo, ObjectOptions, Storage, StorageError, StorageResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingStorage {
        fail_always: bool,
        // 1-based index of the single put that should fail, 0 for none.
        fail_nth: usize,
        puts: AtomicUsize,
    }

    impl CountingStorage {
        fn new(fail_always: bool) -> Self {
            CountingStorage {
                fail_always,
                fail_nth: 0,
                puts: AtomicUsize::new(0),
            }
        }

        fn failing_nth(n: usize) -> Self {
            CountingStorage {
                fail_always: false,
                fail_nth: n,
                puts: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Storage for CountingStorage {
        async fn put(&self, _key: &str, _data: Bytes, _opts: &ObjectOptions) -> StorageResult<()> {
            let attempt = self.puts.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_always || attempt == self.fail_nth {
                Err(StorageError::UploadFailed("down".to_string()))
            } else {
                Ok(())
            }
        }

        async fn stat(&self, key: &str) -> StorageResult<ObjectInfo> {
            Err(StorageError::NotFound(key.to_string()))
        }

        async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
            Err(StorageError::NotFound(key.to_string()))
        }

        async fn delete(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }

        async fn exists(&self, _key: &str) -> StorageResult<bool> {
            Ok(false)
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Local
        }
    }

    fn pipeline(storage: Arc<CountingStorage>) -> UploadPipeline {
        let writer =
            ObjectWriter::new(storage, "uploads").with_retry_policy(RetryPolicy::no_retry());
        UploadPipeline::new(default_validators(), writer)
    }

    fn part(name: &str, content_type: &str, data: &'static [u8]) -> PendingUpload {
        PendingUpload {
            field_name: "files".to_string(),
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            data: Bytes::from_static(data),
        }
    }

    #[tokio::test]
    async fn batch_mixes_successes_and_rejections_in_order() {
        let storage = Arc::new(CountingStorage::new(false));
        let pipeline = pipeline(storage.clone());

        let results = pipeline
            .process(
                vec![
                    part("ok.png", "image/png", b"data"),
                    part("empty.png", "image/png", b""),
                    part("ok2.png", "image/png", b"more"),
                ],
                &UploadOptions::default(),
            )
            .await;

        assert_eq!(results.len(), 3);
        let results: Vec<_> = results.into_iter().collect();
        assert!(results[0].successful);
        assert!(!results[1].successful);
        assert_eq!(results[1].error_msg, "min_file_size");
        assert!(results[2].successful);
        // The rejected part never reached storage.
        assert_eq!(storage.puts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn rejected_parts_skip_storage_entirely() {
        let storage = Arc::new(CountingStorage::new(false));
        let pipeline = pipeline(storage.clone());

        let results = pipeline
            .process(
                vec![part("empty.png", "image/png", b"")],
                &UploadOptions::default(),
            )
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn write_failure_is_reported_per_file_not_per_batch() {
        let storage = Arc::new(CountingStorage::new(true));
        let pipeline = pipeline(storage);

        let results = pipeline
            .process(
                vec![part("a.png", "image/png", b"data")],
                &UploadOptions::default(),
            )
            .await;

        let results: Vec<_> = results.into_iter().collect();
        assert!(!results[0].successful);
        assert_eq!(results[0].error_msg, "write_failed");
        assert!(results[0].uuid.is_none());
    }

    #[tokio::test]
    async fn backend_fault_on_one_file_leaves_siblings_intact() {
        let storage = Arc::new(CountingStorage::failing_nth(2));
        let pipeline = pipeline(storage);

        let results = pipeline
            .process(
                vec![
                    part("a.png", "image/png", b"a"),
                    part("b.png", "image/png", b"b"),
                    part("c.png", "image/png", b"c"),
                ],
                &UploadOptions::default(),
            )
            .await;

        let results: Vec<_> = results.into_iter().collect();
        assert!(results[0].successful);
        assert!(!results[1].successful);
        assert_eq!(results[1].error_msg, "write_failed");
        assert!(results[2].successful);
    }

    #[tokio::test]
    async fn empty_batch_yields_empty_result_set() {
        let storage = Arc::new(CountingStorage::new(false));
        let pipeline = pipeline(storage);

        let results = pipeline.process(vec![], &UploadOptions::default()).await;
        assert!(results.is_empty());
    }
}
