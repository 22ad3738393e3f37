use utoipa::OpenApi;

use crate::handlers;
use crate::models::{
    ChangePasswordRequest, LoginRequest, PublicUser, RefreshTokenRequest, UpdateProfileRequest,
};
use crate::services::sessions::TokenPair;
use crate::services::views::{ChannelProfile, VideoOwner, WatchedVideo};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "vidstream account-service",
        description = "Accounts, sessions, subscriptions and channel views"
    ),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::refresh_token,
        handlers::auth::change_password,
        handlers::users::current_user,
        handlers::users::update_account,
        handlers::users::update_avatar,
        handlers::users::update_cover_image,
        handlers::channels::channel_profile,
        handlers::channels::watch_history,
        handlers::channels::subscribe,
        handlers::channels::unsubscribe,
        handlers::channels::record_watch,
    ),
    components(schemas(
        LoginRequest,
        RefreshTokenRequest,
        ChangePasswordRequest,
        UpdateProfileRequest,
        PublicUser,
        TokenPair,
        handlers::auth::LoginResponse,
        ChannelProfile,
        VideoOwner,
        WatchedVideo,
    )),
    tags(
        (name = "Accounts", description = "Registration and session lifecycle"),
        (name = "Profile", description = "Authenticated profile management"),
        (name = "Channels", description = "Channel views, subscriptions and watch history")
    )
)]
pub struct ApiDoc;
