/// JWT signing and validation (HS256, shared secret).
///
/// Access tokens carry the identity claims the frontend renders from;
/// refresh tokens carry only the subject. Both embed a `token_type`
/// discriminator so one kind can never be presented as the other.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::User;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// Claims on a short-lived access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// Subject (user id)
    pub sub: String,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub iat: i64,
    pub exp: i64,
    pub token_type: String,
}

/// Claims on a long-lived refresh token: subject only
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub token_type: String,
}

pub fn sign_access_token(secret: &str, ttl_secs: i64, user: &User) -> Result<String> {
    let now = Utc::now();
    let claims = AccessClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        username: user.username.clone(),
        full_name: user.full_name.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        token_type: TOKEN_TYPE_ACCESS.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign access token: {}", e)))
}

pub fn sign_refresh_token(secret: &str, ttl_secs: i64, user_id: Uuid) -> Result<String> {
    let now = Utc::now();
    let claims = RefreshClaims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        token_type: TOKEN_TYPE_REFRESH.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign refresh token: {}", e)))
}

/// Decode and validate an access token (signature + expiry + type)
pub fn decode_access_token(secret: &str, token: &str) -> Result<AccessClaims> {
    let data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    if data.claims.token_type != TOKEN_TYPE_ACCESS {
        return Err(AppError::InvalidToken);
    }

    Ok(data.claims)
}

/// Decode and validate a refresh token (signature + expiry + type)
pub fn decode_refresh_token(secret: &str, token: &str) -> Result<RefreshClaims> {
    let data = decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    if data.claims.token_type != TOKEN_TYPE_REFRESH {
        return Err(AppError::InvalidToken);
    }

    Ok(data.claims)
}

/// Subject extraction used by the auth middleware
pub fn user_id_from_access_token(secret: &str, token: &str) -> Result<Uuid> {
    let claims = decode_access_token(secret, token)?;
    Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const SECRET: &str = "test-secret";

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            full_name: "Test User".to_string(),
            password_hash: "hash".to_string(),
            avatar_url: "https://media.example.com/avatars/t.png".to_string(),
            cover_image_url: None,
            refresh_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let u = user();
        let token = sign_access_token(SECRET, 900, &u).expect("sign access token");
        // JWT tokens have 3 parts separated by dots
        assert_eq!(token.matches('.').count(), 2);

        let claims = decode_access_token(SECRET, &token).expect("decode access token");
        assert_eq!(claims.sub, u.id.to_string());
        assert_eq!(claims.email, u.email);
        assert_eq!(claims.username, u.username);
        assert_eq!(claims.full_name, u.full_name);
        assert_eq!(claims.token_type, TOKEN_TYPE_ACCESS);
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let id = Uuid::new_v4();
        let token = sign_refresh_token(SECRET, 604800, id).expect("sign refresh token");

        let claims = decode_refresh_token(SECRET, &token).expect("decode refresh token");
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.token_type, TOKEN_TYPE_REFRESH);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let token = sign_refresh_token(SECRET, 604800, Uuid::new_v4()).expect("sign");
        let result = decode_access_token(SECRET, &token);
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        let token = sign_access_token(SECRET, 900, &user()).expect("sign");
        let result = decode_refresh_token(SECRET, &token);
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign_access_token(SECRET, 900, &user()).expect("sign");
        assert!(decode_access_token("other-secret", &token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = sign_access_token(SECRET, -120, &user()).expect("sign");
        let result = decode_access_token(SECRET, &token);
        assert!(matches!(result, Err(AppError::TokenExpired(_))));
    }

    #[test]
    fn test_refresh_expiry_later_than_access() {
        let u = user();
        let access = sign_access_token(SECRET, 900, &u).expect("sign access");
        let refresh = sign_refresh_token(SECRET, 604800, u.id).expect("sign refresh");

        let access_claims = decode_access_token(SECRET, &access).expect("decode");
        let refresh_claims = decode_refresh_token(SECRET, &refresh).expect("decode");
        assert!(refresh_claims.exp > access_claims.exp);
    }

    #[test]
    fn test_user_id_extraction() {
        let u = user();
        let token = sign_access_token(SECRET, 900, &u).expect("sign");
        assert_eq!(user_id_from_access_token(SECRET, &token).expect("extract"), u.id);
    }
}
