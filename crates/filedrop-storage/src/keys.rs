//! Shared key generation for storage backends.
//!
//! Key format: `{bucket}/{uuid}`. All backends use this format so objects
//! written through one backend stay addressable if the deployment changes.

use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

/// Generate the storage key for an object identifier in the given bucket.
pub fn object_key(bucket: &str, id: Uuid) -> String {
    format!("{}/{}", bucket, id)
}

/// Reject bucket names that would break the key layout or escape the
/// storage root.
pub fn validate_bucket(bucket: &str) -> StorageResult<()> {
    if bucket.is_empty()
        || bucket.contains('/')
        || bucket.contains('\\')
        || bucket.contains("..")
        || bucket.starts_with('.')
    {
        return Err(StorageError::InvalidKey(format!(
            "Invalid bucket name '{}'",
            bucket
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_bucket_slash_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(object_key("uploads", id), format!("uploads/{}", id));
    }

    #[test]
    fn traversal_bucket_names_are_rejected() {
        assert!(validate_bucket("uploads").is_ok());
        assert!(validate_bucket("").is_err());
        assert!(validate_bucket("a/b").is_err());
        assert!(validate_bucket("..").is_err());
        assert!(validate_bucket(".hidden").is_err());
    }
}
