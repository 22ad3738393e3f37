/// Upload and delete operations against the backing bucket
use aws_sdk_s3::primitives::ByteStream;
use serde::Serialize;
use uuid::Uuid;

use crate::{MediaStore, MediaStoreError};

/// Result of a successful upload: the public URL plus the object key the
/// store needs to delete the object again later.
#[derive(Debug, Clone, Serialize)]
pub struct StoredObject {
    pub url: String,
    pub key: String,
}

impl MediaStore {
    /// Upload a media object under a prefix ("avatars", "covers"), keyed by
    /// a fresh UUID so repeated uploads of the same filename never collide.
    pub async fn upload(
        &self,
        prefix: &str,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, MediaStoreError> {
        let key = object_key(prefix, file_name);

        self.client()
            .put_object()
            .bucket(&self.config().bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| MediaStoreError::Upload(e.to_string()))?;

        let url = self.config().object_url(&key);
        tracing::info!(%key, %url, "media object uploaded");

        Ok(StoredObject { url, key })
    }

    /// Delete an object by key.
    pub async fn delete(&self, key: &str) -> Result<(), MediaStoreError> {
        self.client()
            .delete_object()
            .bucket(&self.config().bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| MediaStoreError::Delete(e.to_string()))?;

        tracing::info!(%key, "media object deleted");
        Ok(())
    }

    /// Delete the object behind a previously stored public URL. Unknown URLs
    /// are a no-op so stale rows pointing elsewhere never fail a request.
    pub async fn delete_by_url(&self, url: &str) -> Result<(), MediaStoreError> {
        match self.config().key_for(url) {
            Some(key) => self.delete(&key).await,
            None => {
                tracing::debug!(%url, "skipping delete for URL outside this store");
                Ok(())
            }
        }
    }
}

fn object_key(prefix: &str, file_name: &str) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.len() <= 8)
        .map(|ext| ext.to_lowercase());

    match ext {
        Some(ext) => format!("{}/{}.{}", prefix, Uuid::new_v4(), ext),
        None => format!("{}/{}", prefix, Uuid::new_v4()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_keeps_extension() {
        let key = object_key("avatars", "me.PNG");
        assert!(key.starts_with("avatars/"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn test_object_key_without_extension() {
        let key = object_key("covers", "rawfile");
        assert!(key.starts_with("covers/"));
        assert!(!key.contains('.'));
    }
}
