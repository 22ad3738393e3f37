/// Registration, login and session endpoints
use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::handlers::read_upload;
use crate::middleware::UserId;
use crate::models::{ChangePasswordRequest, LoginRequest, PublicUser, RefreshTokenRequest};
use crate::response::ApiResponse;
use crate::services::{AccountService, RegistrationInput};

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Multipart body of POST /register
#[derive(Debug, MultipartForm)]
pub struct RegisterForm {
    #[multipart(rename = "fullName")]
    pub full_name: Option<Text<String>>,
    pub email: Option<Text<String>>,
    #[multipart(rename = "userName")]
    pub user_name: Option<Text<String>>,
    pub password: Option<Text<String>>,
    #[multipart(limit = "5MB")]
    pub avatar: Option<TempFile>,
    #[multipart(rename = "coverImage", limit = "10MB")]
    pub cover_image: Option<TempFile>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}

/// POST /api/v1/users/register
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "Accounts",
    responses(
        (status = 201, description = "User registered"),
        (status = 400, description = "Missing field or avatar, or upload failed"),
        (status = 409, description = "Handle or email already taken")
    )
)]
pub async fn register(
    service: web::Data<AccountService>,
    MultipartForm(form): MultipartForm<RegisterForm>,
) -> Result<HttpResponse> {
    let input = RegistrationInput {
        username: form.user_name.map(|t| t.0).unwrap_or_default(),
        email: form.email.map(|t| t.0).unwrap_or_default(),
        full_name: form.full_name.map(|t| t.0).unwrap_or_default(),
        password: form.password.map(|t| t.0).unwrap_or_default(),
    };

    let avatar = match form.avatar {
        Some(file) => read_upload(file).await?,
        None => {
            return Err(AppError::Validation("Avatar file is required".to_string()));
        }
    };

    let cover_image = match form.cover_image {
        Some(file) => Some(read_upload(file).await?),
        None => None,
    };

    let user = service.register(input, avatar, cover_image).await?;
    Ok(ApiResponse::created(user, "User registered successfully"))
}

/// POST /api/v1/users/login
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    tag = "Accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; auth cookies set"),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "No such user")
    )
)]
pub async fn login(
    service: web::Data<AccountService>,
    config: web::Data<Config>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    let (user, tokens) = service.login(&payload.email, &payload.password).await?;

    let access_cookie = auth_cookie(
        ACCESS_TOKEN_COOKIE,
        &tokens.access_token,
        config.jwt.access_token_ttl,
    );
    let refresh_cookie = auth_cookie(
        REFRESH_TOKEN_COOKIE,
        &tokens.refresh_token,
        config.jwt.refresh_token_ttl,
    );

    let body = ApiResponse::new(
        StatusCode::OK,
        LoginResponse {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        },
        "User logged in successfully",
    );

    Ok(HttpResponse::Ok()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .json(body))
}

/// POST /api/v1/users/logout
#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    tag = "Accounts",
    responses(
        (status = 200, description = "Session ended; auth cookies cleared"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(service: web::Data<AccountService>, user: UserId) -> Result<HttpResponse> {
    service.logout(user.0).await?;

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(ACCESS_TOKEN_COOKIE))
        .cookie(removal_cookie(REFRESH_TOKEN_COOKIE))
        .json(ApiResponse::new(
            StatusCode::OK,
            serde_json::json!({}),
            "User logged out successfully",
        )))
}

/// POST /api/v1/users/refresh-token
#[utoipa::path(
    post,
    path = "/api/v1/users/refresh-token",
    tag = "Accounts",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair issued; cookies reset"),
        (status = 401, description = "Missing, invalid, expired or reused refresh token")
    )
)]
pub async fn refresh_token(
    service: web::Data<AccountService>,
    config: web::Data<Config>,
    req: HttpRequest,
    payload: Option<web::Json<RefreshTokenRequest>>,
) -> Result<HttpResponse> {
    // Cookie first, body as fallback.
    let presented = req
        .cookie(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| payload.and_then(|p| p.into_inner().refresh_token));

    let tokens = service.refresh_session(presented).await?;

    let access_cookie = auth_cookie(
        ACCESS_TOKEN_COOKIE,
        &tokens.access_token,
        config.jwt.access_token_ttl,
    );
    let refresh_cookie = auth_cookie(
        REFRESH_TOKEN_COOKIE,
        &tokens.refresh_token,
        config.jwt.refresh_token_ttl,
    );

    Ok(HttpResponse::Ok()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .json(ApiResponse::new(
            StatusCode::OK,
            tokens,
            "Access token refreshed successfully",
        )))
}

/// POST /api/v1/users/change-password
#[utoipa::path(
    post,
    path = "/api/v1/users/change-password",
    tag = "Accounts",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Old password does not verify")
    )
)]
pub async fn change_password(
    service: web::Data<AccountService>,
    user: UserId,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    service
        .change_password(user.0, &payload.old_password, &payload.new_password)
        .await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Password changed successfully",
    ))
}

fn auth_cookie(name: &'static str, value: &str, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(name, value.to_string())
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(max_age_secs))
        .finish()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build(name, "")
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .finish();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_cookie_flags() {
        let cookie = auth_cookie(ACCESS_TOKEN_COOKIE, "tok", 900);
        assert_eq!(cookie.name(), "accessToken");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(CookieDuration::seconds(900)));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = removal_cookie(REFRESH_TOKEN_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }
}
