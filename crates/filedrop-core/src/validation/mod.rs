//! Upload validators.
//!
//! Each validator is a pure check over a [`PendingUpload`] returning a tagged
//! outcome. Validators never mutate the record they inspect; the pipeline
//! folds the first failure into the immutable upload result.

use regex::Regex;

use crate::constants::{UPLOAD_ACCEPT_FILE_TYPES, UPLOAD_MAX_FILE_SIZE, UPLOAD_MIN_FILE_SIZE};
use crate::models::{PendingUpload, UploadRejection};

/// A single upload validator. Validators run in the order supplied; the
/// first failing validator's reason is the one reported for the file.
#[derive(Debug, Clone)]
pub enum Validator {
    /// Fails with `min_file_size` when the body is smaller than the bound.
    MinSize(u64),
    /// Fails with `max_file_size` when the body is larger than the bound.
    MaxSize(u64),
    /// Fails with `accept_file_types` when the declared content type does
    /// not match the pattern.
    ContentType(Regex),
}

impl Validator {
    /// Validator for the default minimum size (1 byte, rejects empty parts).
    pub fn min_size_default() -> Self {
        Validator::MinSize(UPLOAD_MIN_FILE_SIZE)
    }

    /// Validator for the default maximum size (1 MiB).
    pub fn max_size_default() -> Self {
        Validator::MaxSize(UPLOAD_MAX_FILE_SIZE)
    }

    /// Validator for the default accepted content types (images).
    pub fn content_type_default() -> Self {
        // The default pattern is a compile-time constant and always valid.
        Validator::ContentType(
            Regex::new(UPLOAD_ACCEPT_FILE_TYPES).expect("default content type pattern is valid"),
        )
    }

    /// Check one pending upload.
    pub fn check(&self, upload: &PendingUpload) -> Result<(), UploadRejection> {
        match self {
            Validator::MinSize(min) => {
                if upload.size() < *min {
                    Err(UploadRejection::BelowMinSize)
                } else {
                    Ok(())
                }
            }
            Validator::MaxSize(max) => {
                if upload.size() > *max {
                    Err(UploadRejection::AboveMaxSize)
                } else {
                    Ok(())
                }
            }
            Validator::ContentType(pattern) => {
                if pattern.is_match(&upload.content_type) {
                    Ok(())
                } else {
                    Err(UploadRejection::DisallowedType)
                }
            }
        }
    }
}

/// The validator set used when the caller supplies none: minimum size only.
pub fn default_validators() -> Vec<Validator> {
    vec![Validator::min_size_default()]
}

/// Run validators in order and report the first failure, if any.
pub fn check_all(validators: &[Validator], upload: &PendingUpload) -> Result<(), UploadRejection> {
    for validator in validators {
        validator.check(upload)?;
    }
    Ok(())
}
