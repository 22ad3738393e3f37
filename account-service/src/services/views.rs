/// Read-only aggregated projections: channel profile with subscription
/// counts, and watch history with denormalized video owners.
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::{subscription_repo, user_repo, video_repo};
use crate::db::video_repo::WatchedVideoRow;
use crate::error::{AppError, Result};

/// Channel page projection. Counts are the literal cardinality of matching
/// subscription edges; no secret or token fields are ever included.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChannelProfile {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub subscriber_count: i64,
    pub channel_subscribed_to_count: i64,
    pub is_subscribed: bool,
}

/// Reduced owner projection nested into each watched video.
#[derive(Debug, Serialize, ToSchema)]
pub struct VideoOwner {
    pub username: String,
    pub full_name: String,
    pub avatar_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WatchedVideo {
    pub id: Uuid,
    pub title: String,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub duration_secs: i32,
    pub views: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub owner: VideoOwner,
}

impl From<WatchedVideoRow> for WatchedVideo {
    fn from(row: WatchedVideoRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            video_url: row.video_url,
            thumbnail_url: row.thumbnail_url,
            duration_secs: row.duration_secs,
            views: row.views,
            created_at: row.created_at,
            owner: VideoOwner {
                username: row.owner_username,
                full_name: row.owner_full_name,
                avatar_url: row.owner_avatar_url,
            },
        }
    }
}

/// Channel profile for a handle, with edge counts and the viewer's
/// membership among the channel's subscribers (false when anonymous).
pub async fn channel_profile(
    pool: &PgPool,
    username: &str,
    viewer: Option<Uuid>,
) -> Result<ChannelProfile> {
    let handle = username.trim();
    if handle.is_empty() {
        return Err(AppError::Validation("Username is missing".to_string()));
    }

    let user = user_repo::find_by_username(pool, handle)
        .await?
        .ok_or_else(|| AppError::NotFound("Channel does not exist".to_string()))?;

    let subscriber_count = subscription_repo::subscriber_count(pool, user.id).await?;
    let channel_subscribed_to_count =
        subscription_repo::subscribed_to_count(pool, user.id).await?;

    let is_subscribed = match viewer {
        Some(viewer_id) => subscription_repo::is_subscribed(pool, viewer_id, user.id).await?,
        None => false,
    };

    Ok(ChannelProfile {
        id: user.id,
        username: user.username,
        full_name: user.full_name,
        email: user.email,
        avatar_url: user.avatar_url,
        cover_image_url: user.cover_image_url,
        subscriber_count,
        channel_subscribed_to_count,
        is_subscribed,
    })
}

/// Watch history for a user in stored order. An empty history is an empty
/// list, not an error.
pub async fn watch_history(pool: &PgPool, user_id: Uuid) -> Result<Vec<WatchedVideo>> {
    let rows = video_repo::watch_history(pool, user_id).await?;
    Ok(rows.into_iter().map(WatchedVideo::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_owner_join_collapses_into_nested_object() {
        let row = WatchedVideoRow {
            id: Uuid::new_v4(),
            title: "First upload".to_string(),
            video_url: "https://media.example.com/videos/v.mp4".to_string(),
            thumbnail_url: None,
            duration_secs: 42,
            views: 7,
            created_at: Utc::now(),
            owner_username: "bob".to_string(),
            owner_full_name: "Bob Builder".to_string(),
            owner_avatar_url: "https://media.example.com/avatars/b.png".to_string(),
        };

        let video = WatchedVideo::from(row);
        assert_eq!(video.owner.username, "bob");
        assert_eq!(video.owner.full_name, "Bob Builder");
        assert_eq!(video.views, 7);
    }

    #[test]
    fn test_channel_profile_serializes_without_secret_fields() {
        let profile = ChannelProfile {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            full_name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            avatar_url: "https://media.example.com/avatars/a.png".to_string(),
            cover_image_url: None,
            subscriber_count: 3,
            channel_subscribed_to_count: 1,
            is_subscribed: true,
        };

        let json = serde_json::to_value(&profile).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert!(!keys.contains(&"password_hash"));
        assert!(!keys.contains(&"refresh_token"));
        assert_eq!(json["subscriber_count"], 3);
        assert_eq!(json["channel_subscribed_to_count"], 1);
    }
}
