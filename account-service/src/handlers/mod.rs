use actix_multipart::form::tempfile::TempFile;

use crate::error::{AppError, Result};
use crate::services::MediaUpload;

pub mod auth;
pub mod channels;
pub mod health;
pub mod users;

pub use auth::{change_password, login, logout, refresh_token, register};
pub use channels::{channel_profile, record_watch, subscribe, unsubscribe, watch_history};
pub use health::health_check;
pub use users::{current_user, update_account, update_avatar, update_cover_image};

/// Pull an uploaded temp file into memory for the media gateway. The
/// boundary has already enforced per-field size limits.
pub(crate) async fn read_upload(file: TempFile) -> Result<MediaUpload> {
    let content_type = file
        .content_type
        .as_ref()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.essence_str().to_string());

    let file_name = file
        .file_name
        .clone()
        .unwrap_or_else(|| "upload".to_string());

    let bytes = tokio::fs::read(file.file.path())
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read uploaded file: {}", e)))?;

    Ok(MediaUpload {
        file_name,
        content_type,
        bytes,
    })
}
