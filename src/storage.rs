use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::primitives::ByteStream;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// StorageError
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object key is empty after sanitizing")]
    InvalidKey,
    #[error("object store rejected the upload: {0}")]
    Backend(String),
}

// 1. StorageService Contract
/// StorageService
///
/// Defines the abstract contract for all interactions with the object storage layer.
/// Handlers only ever see this trait, so the S3 client and the in-memory mock are
/// interchangeable.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Ensures the configured bucket exists. Used in the `Env::Local` setup to
    /// provision the bucket in MinIO.
    async fn ensure_bucket_exists(&self);

    /// Stores `body` under `key` and returns the public URL of the object.
    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<String, StorageError>;
}

// 2. The Real Implementation (S3/MinIO)
/// S3StorageClient
///
/// The concrete implementation using the AWS SDK for S3. Path-style addressing
/// (`http://endpoint/bucket/key`) keeps it compatible with MinIO and other
/// S3-compatible gateways.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    bucket_name: String,
    public_base_url: String,
}

impl S3StorageClient {
    /// new
    ///
    /// Constructs the S3 client from the storage settings of `AppConfig`.
    /// Returned URLs start with `public_url` when given, and with
    /// `{endpoint}/{bucket}` otherwise.
    pub async fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
        public_url: Option<&str>,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            .force_path_style(true)
            .build();

        let client = s3::Client::from_conf(config);

        let public_base_url = match public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
        };

        Self {
            client,
            bucket_name: bucket.to_string(),
            public_base_url,
        }
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    /// ensure_bucket_exists
    ///
    /// CreateBucket is idempotent for our purposes: an "already owned" error is
    /// logged and ignored, so this is safe to call at every startup.
    async fn ensure_bucket_exists(&self) {
        if let Err(e) = self.client.create_bucket().bucket(&self.bucket_name).send().await {
            tracing::debug!("create_bucket for {} returned: {:?}", self.bucket_name, e);
        }
    }

    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<String, StorageError> {
        let key = sanitize_key(key);
        if key.is_empty() {
            return Err(StorageError::InvalidKey);
        }

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("put_object error: {:?}", e);
                StorageError::Backend(e.to_string())
            })?;

        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

/// sanitize_key
///
/// Removes empty and directory navigation segments (`..`, `.`) from an object key.
pub fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// StoredObject
///
/// What `MockStorageService` remembers about an upload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub key: String,
    pub content_type: String,
    pub size: usize,
}

// 3. The Mock Implementation (For Tests)
/// MockStorageService
///
/// An in-memory `StorageService` for tests and for running the API without an
/// object store. Uploads are recorded so assertions can inspect them.
#[derive(Clone, Default)]
pub struct MockStorageService {
    /// When true, all uploads return a simulated failure.
    pub should_fail: bool,
    uploads: Arc<Mutex<Vec<StoredObject>>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Every successful upload so far, oldest first.
    pub fn uploads(&self) -> Vec<StoredObject> {
        self.uploads.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {
        // No-op in mock environment.
    }

    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<String, StorageError> {
        if self.should_fail {
            return Err(StorageError::Backend(
                "Mock Storage Error: Simulation requested".to_string(),
            ));
        }

        let key = sanitize_key(key);
        if key.is_empty() {
            return Err(StorageError::InvalidKey);
        }

        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push(StoredObject {
                key: key.clone(),
                content_type: content_type.to_string(),
                size: body.len(),
            });
        }

        // Deterministic, local-style URL for assertions.
        Ok(format!("http://localhost:9000/mock-bucket/{}", key))
    }
}

/// StorageState
///
/// The concrete type used to share the storage service access across the application state.
pub type StorageState = Arc<dyn StorageService>;
