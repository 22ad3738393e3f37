/// Account workflows: registration, login, session renewal and profile
/// mutations. Each workflow orchestrates the user repository, the session
/// service and the media store under the validation rules of the API, and
/// fails fast on the first violated precondition.
use media_store::MediaStore;
use sqlx::PgPool;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::models::PublicUser;
use crate::security::password;
use crate::services::sessions::{SessionService, TokenPair};

/// An uploaded file handed over by the multipart boundary.
#[derive(Debug)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Text fields of a registration request.
#[derive(Debug)]
pub struct RegistrationInput {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
}

#[derive(Clone)]
pub struct AccountService {
    db: PgPool,
    media: MediaStore,
    sessions: SessionService,
}

impl AccountService {
    pub fn new(db: PgPool, media: MediaStore, sessions: SessionService) -> Self {
        Self {
            db,
            media,
            sessions,
        }
    }

    /// Register a new account. The avatar is mandatory and is uploaded
    /// before the row is created; if creation then fails the uploaded object
    /// is left behind (logged, no compensating delete).
    pub async fn register(
        &self,
        input: RegistrationInput,
        avatar: MediaUpload,
        cover_image: Option<MediaUpload>,
    ) -> Result<PublicUser> {
        let username = input.username.trim();
        let email = input.email.trim();
        let full_name = input.full_name.trim();
        let password = input.password.trim();

        if username.is_empty() || email.is_empty() || full_name.is_empty() || password.is_empty() {
            return Err(AppError::Validation("All fields are required".to_string()));
        }

        if !email.validate_email() {
            return Err(AppError::Validation("Invalid email address".to_string()));
        }

        // Fast-path duplicate check; the unique index remains authoritative
        // when two registrations race on the same handle or email.
        if user_repo::exists_with_username_or_email(&self.db, username, email).await? {
            return Err(AppError::Conflict(
                "User with email or username already exists".to_string(),
            ));
        }

        if avatar.is_empty() {
            return Err(AppError::Validation("Avatar file is required".to_string()));
        }

        let avatar_object = self
            .media
            .upload(
                "avatars",
                &avatar.file_name,
                avatar.bytes,
                &avatar.content_type,
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "avatar upload failed during registration");
                AppError::Upload("Avatar upload failed".to_string())
            })?;

        // A failed cover upload degrades to "no cover", like a request that
        // never carried one.
        let cover_url = match cover_image.filter(|c| !c.is_empty()) {
            Some(cover) => match self
                .media
                .upload("covers", &cover.file_name, cover.bytes, &cover.content_type)
                .await
            {
                Ok(object) => Some(object.url),
                Err(e) => {
                    tracing::warn!(error = %e, "cover image upload failed, continuing without");
                    None
                }
            },
            None => None,
        };

        let password_hash = password::hash_password(password)?;

        let user = user_repo::create_user(
            &self.db,
            username,
            email,
            full_name,
            &password_hash,
            &avatar_object.url,
            cover_url.as_deref(),
        )
        .await
        .map_err(|e| {
            tracing::warn!(
                avatar_key = %avatar_object.key,
                "user creation failed after avatar upload, object orphaned"
            );
            e
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user.into())
    }

    /// Verify credentials and open a session.
    pub async fn login(&self, email: &str, secret: &str) -> Result<(PublicUser, TokenPair)> {
        if email.trim().is_empty() || secret.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let user = user_repo::find_by_email(&self.db, email)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        if !password::verify_password(secret, &user.password_hash)? {
            return Err(AppError::Unauthorized(
                "Invalid user credentials".to_string(),
            ));
        }

        let tokens = self.sessions.issue_pair(&user).await?;

        tracing::info!(user_id = %user.id, "user logged in");
        Ok((user.into(), tokens))
    }

    /// End the session for the authenticated user.
    pub async fn logout(&self, user_id: Uuid) -> Result<()> {
        self.sessions.revoke(user_id).await?;
        tracing::info!(%user_id, "user logged out");
        Ok(())
    }

    /// Exchange a presented refresh token for a fresh pair. The old token is
    /// invalidated by the rotation itself.
    pub async fn refresh_session(&self, presented: Option<String>) -> Result<TokenPair> {
        let presented = presented
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::Unauthorized("Unauthorized request".to_string()))?;

        let user = self.sessions.validate_refresh(&presented).await?;
        let tokens = self.sessions.rotate(user.id).await?;

        tracing::info!(user_id = %user.id, "session refreshed");
        Ok(tokens)
    }

    /// Replace the secret after verifying the old one. Only the secret
    /// changes on this path, so the usual profile-field validation is
    /// skipped; the new secret is re-hashed explicitly before persisting.
    pub async fn change_password(&self, user_id: Uuid, old: &str, new: &str) -> Result<()> {
        let user = user_repo::find_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !password::verify_password(old, &user.password_hash)? {
            return Err(AppError::Unauthorized("Invalid old password".to_string()));
        }

        let password_hash = password::hash_password(new)?;
        user_repo::update_password(&self.db, user_id, &password_hash)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to update password".to_string()))?;

        tracing::info!(%user_id, "password changed");
        Ok(())
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<PublicUser> {
        let user = user_repo::find_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    /// Update display name and email; both are required.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        full_name: Option<String>,
        email: Option<String>,
    ) -> Result<PublicUser> {
        let full_name = non_blank(full_name)
            .ok_or_else(|| AppError::Validation("All fields are required".to_string()))?;
        let email = non_blank(email)
            .ok_or_else(|| AppError::Validation("All fields are required".to_string()))?;

        if !email.validate_email() {
            return Err(AppError::Validation("Invalid email address".to_string()));
        }

        let user = user_repo::update_profile(&self.db, user_id, &full_name, &email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!(%user_id, "profile updated");
        Ok(user.into())
    }

    /// Swap the avatar: upload the replacement, persist its URL, then delete
    /// the previous object best-effort.
    pub async fn update_avatar(&self, user_id: Uuid, upload: MediaUpload) -> Result<PublicUser> {
        if upload.is_empty() {
            return Err(AppError::Validation("Avatar file is missing".to_string()));
        }

        let stored = self
            .media
            .upload(
                "avatars",
                &upload.file_name,
                upload.bytes,
                &upload.content_type,
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "avatar upload failed");
                AppError::Upload("Error while uploading avatar".to_string())
            })?;

        let current = user_repo::find_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        let previous_url = current.avatar_url;

        let user = user_repo::set_avatar_url(&self.db, user_id, &stored.url)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to update avatar".to_string()))?;

        // The swap already persisted; losing the old object is not a request
        // failure, only an orphan worth noticing.
        if let Err(e) = self.media.delete_by_url(&previous_url).await {
            tracing::warn!(%previous_url, error = %e, "failed to delete previous avatar object");
        }

        tracing::info!(%user_id, "avatar updated");
        Ok(user.into())
    }

    /// Swap the cover image; same shape as the avatar swap, but there may be
    /// no previous object to delete.
    pub async fn update_cover_image(
        &self,
        user_id: Uuid,
        upload: MediaUpload,
    ) -> Result<PublicUser> {
        if upload.is_empty() {
            return Err(AppError::Validation(
                "Cover image file is missing".to_string(),
            ));
        }

        let stored = self
            .media
            .upload(
                "covers",
                &upload.file_name,
                upload.bytes,
                &upload.content_type,
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "cover image upload failed");
                AppError::Upload("Error while uploading cover image".to_string())
            })?;

        let current = user_repo::find_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        let previous_url = current.cover_image_url;

        let user = user_repo::set_cover_image_url(&self.db, user_id, &stored.url)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to update cover image".to_string()))?;

        if let Some(previous_url) = previous_url {
            if let Err(e) = self.media.delete_by_url(&previous_url).await {
                tracing::warn!(%previous_url, error = %e, "failed to delete previous cover object");
            }
        }

        tracing::info!(%user_id, "cover image updated");
        Ok(user.into())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  alice  ".into())), Some("alice".to_string()));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_media_upload_emptiness() {
        let upload = MediaUpload {
            file_name: "a.png".into(),
            content_type: "image/png".into(),
            bytes: Vec::new(),
        };
        assert!(upload.is_empty());
    }
}
