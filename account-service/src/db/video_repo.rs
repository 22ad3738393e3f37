/// Watch-history repository: playback log plus the denormalizing join the
/// history view is built from.
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// One watch-history entry joined against the video and its owner. The
/// owner's single-row join is collapsed into three flat columns here and
/// nested back into an owner object by the view layer.
#[derive(Debug, Clone, FromRow)]
pub struct WatchedVideoRow {
    pub id: Uuid,
    pub title: String,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub duration_secs: i32,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar_url: String,
}

/// Append a video to the user's watch history. Insertion order is the view
/// order, so this is append-only with no dedup.
pub async fn record_watch(pool: &PgPool, user_id: Uuid, video_id: Uuid) -> Result<()> {
    sqlx::query("INSERT INTO watch_history (user_id, video_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(video_id)
        .execute(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::NotFound("Video does not exist".to_string())
            }
            _ => AppError::Database(e),
        })?;

    Ok(())
}

/// The user's watch history in exact insertion order, each entry enriched
/// with its video and a reduced owner projection.
pub async fn watch_history(pool: &PgPool, user_id: Uuid) -> Result<Vec<WatchedVideoRow>> {
    let rows = sqlx::query_as::<_, WatchedVideoRow>(
        r#"
        SELECT v.id, v.title, v.video_url, v.thumbnail_url, v.duration_secs,
               v.views, v.created_at,
               o.username AS owner_username,
               o.full_name AS owner_full_name,
               o.avatar_url AS owner_avatar_url
        FROM watch_history wh
        JOIN videos v ON v.id = wh.video_id
        JOIN users o ON o.id = v.owner_id
        WHERE wh.user_id = $1
        ORDER BY wh.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
