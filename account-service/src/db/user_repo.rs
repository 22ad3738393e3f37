/// User repository - all database operations for account records.
///
/// Handles and emails are normalized to lowercase before storage and lookup.
/// Secrets arrive here already hashed; hashing lives in `security::password`
/// and every mutation path calls it explicitly.
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::User;

const USER_COLUMNS: &str = "id, username, email, full_name, password_hash, avatar_url, cover_image_url, refresh_token, created_at, updated_at";

/// Create a new user. The unique indexes on username/email are the
/// authoritative conflict check; a duplicate-key rejection from the store
/// maps to `Conflict` even when the pre-check raced.
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    full_name: &str,
    password_hash: &str,
    avatar_url: &str,
    cover_image_url: Option<&str>,
) -> Result<User> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, username, email, full_name, password_hash, avatar_url, cover_image_url, refresh_token, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NULL, $8, $8)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(username.to_lowercase())
    .bind(email.to_lowercase())
    .bind(full_name)
    .bind(password_hash)
    .bind(avatar_url)
    .bind(cover_image_url)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| unique_violation(e, "User with email or username already exists"))
}

/// Find a user by id
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Find a user by handle (case-insensitive via lowercase storage)
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username.to_lowercase())
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Find a user by email
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email.to_lowercase())
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Fast-path duplicate check for registration. Friendlier error only; the
/// unique constraint remains the actual guarantee.
pub async fn exists_with_username_or_email(
    pool: &PgPool,
    username: &str,
    email: &str,
) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
    )
    .bind(username.to_lowercase())
    .bind(email.to_lowercase())
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Update display name and email
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    full_name: &str,
    email: &str,
) -> Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET full_name = $1, email = $2, updated_at = $3
        WHERE id = $4
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(full_name)
    .bind(email.to_lowercase())
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| unique_violation(e, "Email already in use"))
}

/// Replace the stored secret hash
pub async fn update_password(pool: &PgPool, id: Uuid, password_hash: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET password_hash = $1, updated_at = $2
        WHERE id = $3
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(password_hash)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Replace the avatar reference
pub async fn set_avatar_url(pool: &PgPool, id: Uuid, avatar_url: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET avatar_url = $1, updated_at = $2
        WHERE id = $3
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(avatar_url)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Replace the cover image reference
pub async fn set_cover_image_url(
    pool: &PgPool,
    id: Uuid,
    cover_image_url: &str,
) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET cover_image_url = $1, updated_at = $2
        WHERE id = $3
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(cover_image_url)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Overwrite the mirrored refresh-token value. `None` clears it (logout);
/// overwriting is the sole mechanism that invalidates earlier tokens.
/// Returns whether a row was actually updated.
pub async fn set_refresh_token(
    pool: &PgPool,
    id: Uuid,
    refresh_token: Option<&str>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET refresh_token = $1, updated_at = $2
        WHERE id = $3
        "#,
    )
    .bind(refresh_token)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

fn unique_violation(e: sqlx::Error, message: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(e),
    }
}
