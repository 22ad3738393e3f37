/// Session lifecycle: issuing, rotating and validating the access/refresh
/// token pair.
///
/// The currently valid refresh token is mirrored onto the user row, so
/// overwriting it (rotate) or clearing it (logout) invalidates every token
/// issued earlier without a separate revocation list.
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::security::jwt;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct SessionService {
    db: PgPool,
    jwt: JwtConfig,
}

impl SessionService {
    pub fn new(db: PgPool, jwt: JwtConfig) -> Self {
        Self { db, jwt }
    }

    pub fn issue_access_token(&self, user: &User) -> Result<String> {
        jwt::sign_access_token(&self.jwt.secret, self.jwt.access_token_ttl, user)
    }

    /// Sign a refresh token and persist it onto the user row, overwriting
    /// any prior value.
    pub async fn issue_refresh_token(&self, user: &User) -> Result<String> {
        let token = jwt::sign_refresh_token(&self.jwt.secret, self.jwt.refresh_token_ttl, user.id)?;

        let updated = user_repo::set_refresh_token(&self.db, user.id, Some(&token)).await?;
        if !updated {
            return Err(AppError::Internal(format!(
                "Refresh token could not be persisted for user {}",
                user.id
            )));
        }

        Ok(token)
    }

    pub async fn issue_pair(&self, user: &User) -> Result<TokenPair> {
        let access_token = self.issue_access_token(user)?;
        let refresh_token = self.issue_refresh_token(user).await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Issue a fresh pair for an already-validated subject. Callers only see
    /// an internal failure here; the lower-level cause is logged, not leaked.
    pub async fn rotate(&self, user_id: Uuid) -> Result<TokenPair> {
        let user = match user_repo::find_by_id(&self.db, user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::error!(%user_id, "token rotation requested for missing user");
                return Err(AppError::Internal(
                    "Failed to rotate session tokens".to_string(),
                ));
            }
            Err(e) => {
                tracing::error!(%user_id, error = %e, "token rotation lookup failed");
                return Err(AppError::Internal(
                    "Failed to rotate session tokens".to_string(),
                ));
            }
        };

        self.issue_pair(&user).await.map_err(|e| {
            tracing::error!(%user_id, error = %e, "token rotation failed");
            AppError::Internal("Failed to rotate session tokens".to_string())
        })
    }

    /// Validate a presented refresh token: signature, expiry, subject
    /// resolution, and equality with the stored mirror value. A mismatch
    /// means the token was rotated away or the session was logged out.
    pub async fn validate_refresh(&self, presented: &str) -> Result<User> {
        let claims = jwt::decode_refresh_token(&self.jwt.secret, presented)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

        let user = user_repo::find_by_id(&self.db, user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !user.holds_refresh_token(presented) {
            return Err(AppError::TokenExpired(
                "Refresh token is expired or has already been used".to_string(),
            ));
        }

        Ok(user)
    }

    /// Clear the stored refresh token, ending the session.
    pub async fn revoke(&self, user_id: Uuid) -> Result<()> {
        user_repo::set_refresh_token(&self.db, user_id, None).await?;
        Ok(())
    }
}
