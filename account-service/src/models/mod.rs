use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Full account row. Deliberately not `Serialize`: the hashed secret and the
/// mirrored refresh token must never reach a response body, so every read
/// path goes through [`PublicUser`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the presented refresh token is the one currently on record.
    pub fn holds_refresh_token(&self, presented: &str) -> bool {
        self.refresh_token.as_deref() == Some(presented)
    }
}

/// Public projection of an account, safe for any success response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
            cover_image_url: user.cover_image_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// PATCH /update-account body; both fields are required, checked in the
/// workflow so a missing field maps to the standard validation envelope.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            full_name: "Alice".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            avatar_url: "https://media.example.com/avatars/a.png".to_string(),
            cover_image_url: None,
            refresh_token: Some("token".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_projection_has_no_secret_fields() {
        let json = serde_json::to_value(PublicUser::from(user())).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();

        assert!(!keys.contains(&"password_hash"));
        assert!(!keys.contains(&"refresh_token"));
        assert!(keys.contains(&"username"));
        assert!(keys.contains(&"avatar_url"));
    }

    #[test]
    fn test_holds_refresh_token() {
        let u = user();
        assert!(u.holds_refresh_token("token"));
        assert!(!u.holds_refresh_token("rotated-away"));

        let mut cleared = u;
        cleared.refresh_token = None;
        assert!(!cleared.holds_refresh_token("token"));
    }
}
