/// Media store configuration shared across services
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaStoreConfig {
    /// S3 bucket name
    pub bucket: String,
    /// AWS region
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO in development)
    pub endpoint: Option<String>,
    /// Access credentials
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Base URL under which uploaded objects are publicly reachable
    pub public_base_url: String,
}

impl MediaStoreConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, std::env::VarError> {
        Ok(Self {
            bucket: std::env::var("MEDIA_S3_BUCKET")
                .unwrap_or_else(|_| "vidstream-media".to_string()),
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            endpoint: std::env::var("MEDIA_S3_ENDPOINT").ok(),
            access_key_id: std::env::var("AWS_ACCESS_KEY_ID")?,
            secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY")?,
            public_base_url: std::env::var("MEDIA_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "https://media.vidstream.dev".to_string()),
        })
    }

    /// Public URL for an object key
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }

    /// Derive the object key back from a stored public URL. Returns `None`
    /// when the URL was not issued by this store.
    pub fn key_for(&self, url: &str) -> Option<String> {
        let base = self.public_base_url.trim_end_matches('/');
        url.strip_prefix(base)
            .map(|rest| rest.trim_start_matches('/').to_string())
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MediaStoreConfig {
        MediaStoreConfig {
            bucket: "test-bucket".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
            access_key_id: "key".to_string(),
            secret_access_key: "secret".to_string(),
            public_base_url: "https://media.example.com".to_string(),
        }
    }

    #[test]
    fn test_object_url() {
        let url = config().object_url("avatars/abc.png");
        assert_eq!(url, "https://media.example.com/avatars/abc.png");
    }

    #[test]
    fn test_key_round_trip() {
        let cfg = config();
        let url = cfg.object_url("covers/xyz.jpg");
        assert_eq!(cfg.key_for(&url).as_deref(), Some("covers/xyz.jpg"));
    }

    #[test]
    fn test_key_for_foreign_url() {
        assert_eq!(config().key_for("https://elsewhere.example.com/a.png"), None);
    }
}
