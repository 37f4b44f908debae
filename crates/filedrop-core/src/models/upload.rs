//! Per-file upload records: the transient pending upload, the immutable
//! per-file result, and the ordered result set returned to the client.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

/// One file part extracted from a multipart request, held in memory while it
/// moves through the pipeline and discarded afterwards.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    /// Multipart field the file arrived under.
    pub field_name: String,
    /// Client-supplied filename with any path-like prefix stripped.
    pub file_name: String,
    /// Client-declared content type. Untrusted.
    pub content_type: String,
    /// Full body, read into memory once.
    pub data: Bytes,
}

impl PendingUpload {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Why a file was not stored. Wire strings follow the public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRejection {
    BelowMinSize,
    AboveMaxSize,
    DisallowedType,
    WriteFailed,
}

impl UploadRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadRejection::BelowMinSize => "min_file_size",
            UploadRejection::AboveMaxSize => "max_file_size",
            UploadRejection::DisallowedType => "accept_file_types",
            UploadRejection::WriteFailed => "write_failed",
        }
    }
}

impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for a single file part. Built once by the pipeline and never
/// mutated afterwards; the constructors are the only way to obtain one, so
/// `successful` is true exactly when `uuid` is set and `error_msg` is empty.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    pub successful: bool,
    /// Rejection reason, empty on success.
    pub error_msg: String,
    /// Storage identifier assigned to the object, absent on failure.
    pub uuid: Option<Uuid>,
    /// Sanitized declared filename, for reporting.
    pub name: String,
    /// Declared content type, for reporting.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Size of the posted body in bytes.
    pub size: u64,
}

impl UploadResult {
    /// Result for a file that was written to storage.
    pub fn success(upload: &PendingUpload, id: Uuid) -> Self {
        UploadResult {
            successful: true,
            error_msg: String::new(),
            uuid: Some(id),
            name: upload.file_name.clone(),
            content_type: upload.content_type.clone(),
            size: upload.size(),
        }
    }

    /// Result for a file that was rejected by a validator or whose write
    /// failed.
    pub fn rejected(upload: &PendingUpload, reason: UploadRejection) -> Self {
        UploadResult {
            successful: false,
            error_msg: reason.as_str().to_string(),
            uuid: None,
            name: upload.file_name.clone(),
            content_type: upload.content_type.clone(),
            size: upload.size(),
        }
    }
}

/// Ordered collection of upload results, one per posted file part. Order
/// matches the enumeration order of the parts in the request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct UploadResultSet(Vec<UploadResult>);

impl UploadResultSet {
    pub fn new() -> Self {
        UploadResultSet(Vec::new())
    }

    pub fn with_capacity(n: usize) -> Self {
        UploadResultSet(Vec::with_capacity(n))
    }

    pub fn push(&mut self, result: UploadResult) {
        self.0.push(result);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UploadResult> {
        self.0.iter()
    }
}

impl IntoIterator for UploadResultSet {
    type Item = UploadResult;
    type IntoIter = std::vec::IntoIter<UploadResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a UploadResultSet {
    type Item = &'a UploadResult;
    type IntoIter = std::slice::Iter<'a, UploadResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(name: &str, content_type: &str, data: &[u8]) -> PendingUpload {
        PendingUpload {
            field_name: "file".to_string(),
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            data: Bytes::copy_from_slice(data),
        }
    }

    #[test]
    fn success_result_carries_identifier_and_empty_error() {
        let id = Uuid::new_v4();
        let result = UploadResult::success(&pending("a.png", "image/png", b"abc"), id);
        assert!(result.successful);
        assert_eq!(result.uuid, Some(id));
        assert!(result.error_msg.is_empty());
        assert_eq!(result.size, 3);
    }

    #[test]
    fn rejected_result_has_reason_and_no_identifier() {
        let result = UploadResult::rejected(
            &pending("a.png", "image/png", b""),
            UploadRejection::BelowMinSize,
        );
        assert!(!result.successful);
        assert_eq!(result.error_msg, "min_file_size");
        assert!(result.uuid.is_none());
    }

    #[test]
    fn result_serializes_to_public_contract() {
        let id = Uuid::new_v4();
        let result = UploadResult::success(&pending("a.png", "image/png", b"abc"), id);
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["successful"], serde_json::json!(true));
        assert_eq!(json["error_msg"], serde_json::json!(""));
        assert_eq!(json["uuid"], serde_json::json!(id.to_string()));
        assert_eq!(json["name"], serde_json::json!("a.png"));
        assert_eq!(json["type"], serde_json::json!("image/png"));
        assert_eq!(json["size"], serde_json::json!(3));
    }

    #[test]
    fn failed_result_serializes_uuid_as_null() {
        let result = UploadResult::rejected(
            &pending("a.png", "text/plain", b"abc"),
            UploadRejection::DisallowedType,
        );
        let json = serde_json::to_value(&result).expect("serialize");
        assert!(json["uuid"].is_null());
        assert_eq!(json["error_msg"], serde_json::json!("accept_file_types"));
    }

    #[test]
    fn result_set_serializes_as_array_in_order(){
        let mut set = UploadResultSet::new();
        set.push(UploadResult::success(
            &pending("a.png", "image/png", b"a"),
            Uuid::new_v4(),
        ));
        set.push(UploadResult::rejected(
            &pending("b.png", "image/png", b""),
            UploadRejection::BelowMinSize,
        ));
        let json = serde_json::to_value(&set).expect("serialize");
        let items = json.as_array().expect("array");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["name"], serde_json::json!("a.png"));
        assert_eq!(items[1]["name"], serde_json::json!("b.png"));
    }
}
