use filedrop_core::Config;
use filedrop_storage::Storage;
use std::sync::Arc;

use crate::services::UploadPipeline;

/// Shared application state available to all handlers.
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub pipeline: UploadPipeline,
}
