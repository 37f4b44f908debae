pub mod pipeline;

pub use pipeline::{UploadOptions, UploadPipeline};
