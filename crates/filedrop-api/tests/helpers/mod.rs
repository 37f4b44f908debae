//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p filedrop-api`.

use axum_test::TestServer;
use filedrop_api::constants;
use filedrop_api::services::UploadPipeline;
use filedrop_api::setup::routes;
use filedrop_api::state::AppState;
use filedrop_core::{constants as core_constants, Config, RetryPolicy, StorageBackend};
use filedrop_storage::{LocalStorage, ObjectWriter, Storage};
use std::sync::Arc;
use tempfile::TempDir;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Upload policy used by the test app: small maximum so oversized uploads
/// are cheap to construct.
pub const TEST_MAX_FILE_SIZE: u64 = 1024;

fn test_config(storage_path: &str) -> Config {
    Config {
        server_port: 0,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        cors_methods: core_constants::CORS_METHODS
            .split(',')
            .map(str::to_string)
            .collect(),
        cors_headers: core_constants::CORS_HEADERS
            .split(',')
            .map(str::to_string)
            .collect(),
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        local_storage_path: Some(storage_path.to_string()),
        default_bucket: core_constants::DEFAULT_BUCKET.to_string(),
        min_file_size: core_constants::UPLOAD_MIN_FILE_SIZE,
        max_file_size: TEST_MAX_FILE_SIZE,
        accept_file_types: core_constants::UPLOAD_ACCEPT_FILE_TYPES.to_string(),
        max_request_body_size: 1024 * 1024,
        retry_initial_delay_ms: 1,
        retry_backoff_factor: 2.0,
        retry_max_delay_ms: 5,
        retry_max_period_ms: 20,
    }
}

/// Setup test app with isolated local storage.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = test_config(temp_dir.path().to_str().expect("utf-8 temp path"));

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(temp_dir.path())
            .await
            .expect("Failed to create local storage"),
    );

    let validators = config.validators().expect("valid upload policy");
    let writer = ObjectWriter::new(storage.clone(), config.default_bucket.clone())
        .with_retry_policy(RetryPolicy::no_retry());
    let pipeline = UploadPipeline::new(validators, writer);

    let state = Arc::new(AppState {
        config: config.clone(),
        storage,
        pipeline,
    });

    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        _temp_dir: temp_dir,
    }
}

pub const BOUNDARY: &str = "test-file-boundary";

/// Content type header for bodies built with [`multipart_body`].
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// Hand-rolled multipart/form-data body: one (field, filename, content type,
/// data) tuple per file part.
pub fn multipart_body(parts: &[(&str, &str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, content_type, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
