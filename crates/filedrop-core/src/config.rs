//! Configuration module
//!
//! Configuration is loaded from the environment (a `.env` file is honored in
//! development), validated at startup, and passed explicitly to the pipeline
//! at call time rather than read from globals.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use regex::Regex;

use crate::constants;
use crate::retry::RetryPolicy;
use crate::storage_types::StorageBackend;
use crate::validation::Validator;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    // CORS
    pub cors_origins: Vec<String>,
    pub cors_methods: Vec<String>,
    pub cors_headers: Vec<String>,
    // Storage
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers
    pub local_storage_path: Option<String>,
    /// Default bucket objects land in when the request carries no override.
    pub default_bucket: String,
    // Upload policy
    pub min_file_size: u64,
    pub max_file_size: u64,
    pub accept_file_types: String,
    /// Whole-request body cap. Oversized individual files must still fit so
    /// they reach the validators and get a per-file rejection.
    pub max_request_body_size: u64,
    // Retry policy for storage writes
    pub retry_initial_delay_ms: u64,
    pub retry_backoff_factor: f64,
    pub retry_max_delay_ms: u64,
    pub retry_max_period_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        // Best effort: a missing .env file is fine outside development.
        let _ = dotenvy::dotenv();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => StorageBackend::from_str(&value).map_err(anyhow::Error::msg)?,
            Err(_) => StorageBackend::Local,
        };

        Ok(Config {
            server_port: env_parse("SERVER_PORT", 3000)?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            cors_origins: env_list("CORS_ORIGINS", constants::CORS_ORIGINS),
            cors_methods: env_list("CORS_METHODS", constants::CORS_METHODS),
            cors_headers: env_list("CORS_HEADERS", constants::CORS_HEADERS),
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok().or_else(|| env::var("AWS_REGION").ok()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            default_bucket: env::var("DEFAULT_BUCKET")
                .unwrap_or_else(|_| constants::DEFAULT_BUCKET.to_string()),
            min_file_size: env_parse("UPLOAD_MIN_FILE_SIZE", constants::UPLOAD_MIN_FILE_SIZE)?,
            max_file_size: env_parse("UPLOAD_MAX_FILE_SIZE", constants::UPLOAD_MAX_FILE_SIZE)?,
            accept_file_types: env::var("UPLOAD_ACCEPT_FILE_TYPES")
                .unwrap_or_else(|_| constants::UPLOAD_ACCEPT_FILE_TYPES.to_string()),
            max_request_body_size: env_parse(
                "MAX_REQUEST_BODY_SIZE",
                constants::MAX_REQUEST_BODY_SIZE,
            )?,
            retry_initial_delay_ms: env_parse(
                "RETRY_INITIAL_DELAY_MS",
                constants::RETRY_INITIAL_DELAY_MS,
            )?,
            retry_backoff_factor: env_parse(
                "RETRY_BACKOFF_FACTOR",
                constants::RETRY_BACKOFF_FACTOR,
            )?,
            retry_max_delay_ms: env_parse("RETRY_MAX_DELAY_MS", constants::RETRY_MAX_DELAY_MS)?,
            retry_max_period_ms: env_parse("RETRY_MAX_PERIOD_MS", constants::RETRY_MAX_PERIOD_MS)?,
        })
    }

    /// Fail fast on misconfiguration.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.min_file_size > self.max_file_size {
            anyhow::bail!(
                "UPLOAD_MIN_FILE_SIZE ({}) exceeds UPLOAD_MAX_FILE_SIZE ({})",
                self.min_file_size,
                self.max_file_size
            );
        }
        if self.max_request_body_size < self.max_file_size {
            anyhow::bail!(
                "MAX_REQUEST_BODY_SIZE ({}) is below UPLOAD_MAX_FILE_SIZE ({}); oversized files \
                 would be cut off before validation",
                self.max_request_body_size,
                self.max_file_size
            );
        }
        Regex::new(&self.accept_file_types).map_err(|e| {
            anyhow::anyhow!("UPLOAD_ACCEPT_FILE_TYPES is not a valid pattern: {}", e)
        })?;
        if self.default_bucket.is_empty()
            || self.default_bucket.contains('/')
            || self.default_bucket.contains("..")
        {
            anyhow::bail!("DEFAULT_BUCKET '{}' is not a valid bucket name", self.default_bucket);
        }
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    anyhow::bail!("S3_BUCKET must be set when STORAGE_BACKEND=s3");
                }
                if self.s3_region.is_none() {
                    anyhow::bail!("S3_REGION or AWS_REGION must be set when STORAGE_BACKEND=s3");
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    anyhow::bail!("LOCAL_STORAGE_PATH must be set when STORAGE_BACKEND=local");
                }
            }
        }
        if self.retry_backoff_factor < 1.0 {
            anyhow::bail!("RETRY_BACKOFF_FACTOR must be >= 1.0");
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Retry policy for storage writes, built from the configured parameters.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_millis(self.retry_initial_delay_ms),
            backoff_factor: self.retry_backoff_factor,
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
            max_retry_period: Duration::from_millis(self.retry_max_period_ms),
        }
    }

    /// The validator set the service runs for every file part: minimum size,
    /// maximum size, and accepted content types, in that order.
    pub fn validators(&self) -> Result<Vec<Validator>, anyhow::Error> {
        let pattern = Regex::new(&self.accept_file_types).map_err(|e| {
            anyhow::anyhow!("UPLOAD_ACCEPT_FILE_TYPES is not a valid pattern: {}", e)
        })?;
        Ok(vec![
            Validator::MinSize(self.min_file_size),
            Validator::MaxSize(self.max_file_size),
            Validator::ContentType(pattern),
        ])
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

fn env_list(key: &str, default: &str) -> Vec<String> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
