/// Channel views, subscription actions and watch history
use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::db::{subscription_repo, video_repo};
use crate::error::Result;
use crate::middleware::{authenticated_user, UserId};
use crate::response::ApiResponse;
use crate::services::views;

/// GET /api/v1/users/channel/{userName}
///
/// Works for anonymous viewers too; a logged-in viewer additionally gets
/// their own subscription status against the channel.
#[utoipa::path(
    get,
    path = "/api/v1/users/channel/{userName}",
    tag = "Channels",
    params(("userName" = String, Path, description = "Channel handle, any case")),
    responses(
        (status = 200, description = "Channel profile with subscription counts"),
        (status = 400, description = "Blank handle"),
        (status = 404, description = "No such channel")
    )
)]
pub async fn channel_profile(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let viewer = authenticated_user(&req, &config.jwt.secret);
    let profile = views::channel_profile(pool.get_ref(), &path.into_inner(), viewer).await?;

    Ok(ApiResponse::ok(profile, "Channel profile fetched successfully"))
}

/// GET /api/v1/users/watch-history
#[utoipa::path(
    get,
    path = "/api/v1/users/watch-history",
    tag = "Channels",
    responses(
        (status = 200, description = "Watched videos in stored order, possibly empty"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn watch_history(pool: web::Data<PgPool>, user: UserId) -> Result<HttpResponse> {
    let history = views::watch_history(pool.get_ref(), user.0).await?;
    Ok(ApiResponse::ok(history, "Watch history fetched successfully"))
}

/// POST /api/v1/users/subscriptions/{channelId}
#[utoipa::path(
    post,
    path = "/api/v1/users/subscriptions/{channelId}",
    tag = "Channels",
    params(("channelId" = Uuid, Path, description = "Channel to subscribe to")),
    responses(
        (status = 200, description = "Edge created (idempotent)"),
        (status = 400, description = "Self-subscription"),
        (status = 404, description = "No such channel")
    )
)]
pub async fn subscribe(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    subscription_repo::subscribe(pool.get_ref(), user.0, path.into_inner()).await?;
    Ok(ApiResponse::ok(serde_json::json!({}), "Subscribed successfully"))
}

/// DELETE /api/v1/users/subscriptions/{channelId}
#[utoipa::path(
    delete,
    path = "/api/v1/users/subscriptions/{channelId}",
    tag = "Channels",
    params(("channelId" = Uuid, Path, description = "Channel to unsubscribe from")),
    responses((status = 200, description = "Edge removed if it existed"))
)]
pub async fn unsubscribe(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    subscription_repo::unsubscribe(pool.get_ref(), user.0, path.into_inner()).await?;
    Ok(ApiResponse::ok(serde_json::json!({}), "Unsubscribed successfully"))
}

/// POST /api/v1/users/watch-history/{videoId}
#[utoipa::path(
    post,
    path = "/api/v1/users/watch-history/{videoId}",
    tag = "Channels",
    params(("videoId" = Uuid, Path, description = "Video that was played")),
    responses(
        (status = 200, description = "Appended to history"),
        (status = 404, description = "No such video")
    )
)]
pub async fn record_watch(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    video_repo::record_watch(pool.get_ref(), user.0, path.into_inner()).await?;
    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Video added to watch history",
    ))
}
