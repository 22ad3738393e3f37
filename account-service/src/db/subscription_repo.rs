/// Subscription edge repository (subscriber -> channel follows)
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Create a subscription edge. Duplicate edges are rejected by the composite
/// primary key; re-subscribing is an idempotent no-op.
pub async fn subscribe(pool: &PgPool, subscriber_id: Uuid, channel_id: Uuid) -> Result<()> {
    if subscriber_id == channel_id {
        return Err(AppError::Validation(
            "You cannot subscribe to your own channel".to_string(),
        ));
    }

    let result = sqlx::query(
        "INSERT INTO subscriptions (subscriber_id, channel_id, created_at)
         VALUES ($1, $2, NOW())
         ON CONFLICT (subscriber_id, channel_id) DO NOTHING",
    )
    .bind(subscriber_id)
    .bind(channel_id)
    .execute(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::NotFound("Channel does not exist".to_string())
        }
        _ => AppError::Database(e),
    })?;

    if result.rows_affected() == 0 {
        tracing::debug!(%subscriber_id, %channel_id, "subscription already exists");
    }

    Ok(())
}

/// Remove a subscription edge
pub async fn unsubscribe(pool: &PgPool, subscriber_id: Uuid, channel_id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2")
        .bind(subscriber_id)
        .bind(channel_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Number of subscribers a channel has (edges where channel = user)
pub async fn subscriber_count(pool: &PgPool, channel_id: Uuid) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) FROM subscriptions WHERE channel_id = $1")
        .bind(channel_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>(0))
}

/// Number of channels a user subscribes to (edges where subscriber = user)
pub async fn subscribed_to_count(pool: &PgPool, subscriber_id: Uuid) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) FROM subscriptions WHERE subscriber_id = $1")
        .bind(subscriber_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>(0))
}

/// Whether `subscriber_id` currently follows `channel_id`
pub async fn is_subscribed(pool: &PgPool, subscriber_id: Uuid, channel_id: Uuid) -> Result<bool> {
    let row = sqlx::query(
        "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2)",
    )
    .bind(subscriber_id)
    .bind(channel_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<bool, _>(0))
}
