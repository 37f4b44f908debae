//! Domain models

pub mod upload;

pub use upload::{PendingUpload, UploadRejection, UploadResult, UploadResultSet};
