/// S3-backed media object storage for vidstream services
///
/// Wraps the AWS S3 client behind a small upload/delete surface so services
/// never talk to the SDK directly.
use std::sync::Arc;

use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::Client;

pub mod config;
pub mod operations;

pub use config::MediaStoreConfig;
pub use operations::StoredObject;

#[derive(Debug, thiserror::Error)]
pub enum MediaStoreError {
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("delete failed: {0}")]
    Delete(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shared media store handle, cheap to clone
#[derive(Clone)]
pub struct MediaStore {
    client: Arc<Client>,
    config: MediaStoreConfig,
}

impl MediaStore {
    /// Build a store from explicit configuration. Constructed once at process
    /// start and injected into request handlers.
    pub async fn new(config: MediaStoreConfig) -> Result<Self, MediaStoreError> {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "media-store",
        );

        let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint) = &config.endpoint {
            if !endpoint.trim().is_empty() {
                builder = builder.endpoint_url(endpoint);
            }
        }

        Ok(Self {
            client: Arc::new(Client::from_conf(builder.build())),
            config,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &MediaStoreConfig {
        &self.config
    }

    /// Health check for bucket connectivity
    pub async fn health_check(&self) -> Result<(), MediaStoreError> {
        self.client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
            .map_err(|e| MediaStoreError::Config(e.to_string()))?;

        Ok(())
    }
}
