//! Amazon S3 object store
//!
//! Production backend for rotated log files. Credentials come from the
//! default provider chain (AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY, profile,
//! or IAM role); only bucket, folder, region and endpoint live in the config.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

use super::{ObjectStore, StoreError, StoreResult};

/// S3-backed object store
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Create a new S3 store using default credentials from the environment
    pub async fn new(region: Option<&str>) -> Self {
        let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = region {
            config_loader = config_loader.region(aws_config::Region::new(region.to_string()));
        }

        let config = config_loader.load().await;

        Self {
            client: Client::new(&config),
        }
    }

    /// Create with custom endpoint (for S3-compatible services like MinIO)
    pub async fn with_endpoint(endpoint: &str, region: Option<&str>) -> Self {
        let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = region {
            config_loader = config_loader.region(aws_config::Region::new(region.to_string()));
        }

        let config = config_loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .endpoint_url(endpoint)
            .force_path_style(true) // Required for MinIO and most S3-compatible services
            .build();

        Self {
            client: Client::from_conf(s3_config),
        }
    }

    /// Create with explicit client (for testing)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> StoreResult<()> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StoreError::PutFailed(e.to_string()))?;

        debug!("uploaded s3://{bucket}/{key} ({size} bytes)");
        Ok(())
    }
}
