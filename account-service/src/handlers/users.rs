/// Profile endpoints for the authenticated account
use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use actix_web::{web, HttpResponse};

use crate::error::{AppError, Result};
use crate::handlers::read_upload;
use crate::middleware::UserId;
use crate::models::UpdateProfileRequest;
use crate::response::ApiResponse;
use crate::services::AccountService;

/// Multipart body of POST /update-avatar
#[derive(Debug, MultipartForm)]
pub struct AvatarForm {
    #[multipart(limit = "5MB")]
    pub avatar: Option<TempFile>,
}

/// Multipart body of POST /update-cover-image
#[derive(Debug, MultipartForm)]
pub struct CoverImageForm {
    #[multipart(rename = "coverImage", limit = "10MB")]
    pub cover_image: Option<TempFile>,
}

/// GET /api/v1/users/current-user
#[utoipa::path(
    get,
    path = "/api/v1/users/current-user",
    tag = "Profile",
    responses(
        (status = 200, description = "Current account"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn current_user(
    service: web::Data<AccountService>,
    user: UserId,
) -> Result<HttpResponse> {
    let profile = service.current_user(user.0).await?;
    Ok(ApiResponse::ok(profile, "Current user fetched successfully"))
}

/// PATCH /api/v1/users/update-account
#[utoipa::path(
    patch,
    path = "/api/v1/users/update-account",
    tag = "Profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated"),
        (status = 400, description = "Missing display name or email")
    )
)]
pub async fn update_account(
    service: web::Data<AccountService>,
    user: UserId,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    let profile = service
        .update_profile(user.0, payload.full_name, payload.email)
        .await?;

    Ok(ApiResponse::ok(profile, "Account updated successfully"))
}

/// POST /api/v1/users/update-avatar
#[utoipa::path(
    post,
    path = "/api/v1/users/update-avatar",
    tag = "Profile",
    responses(
        (status = 200, description = "Avatar replaced"),
        (status = 400, description = "File missing or upload failed")
    )
)]
pub async fn update_avatar(
    service: web::Data<AccountService>,
    user: UserId,
    MultipartForm(form): MultipartForm<AvatarForm>,
) -> Result<HttpResponse> {
    let upload = match form.avatar {
        Some(file) => read_upload(file).await?,
        None => {
            return Err(AppError::Validation("Avatar file is missing".to_string()));
        }
    };

    let profile = service.update_avatar(user.0, upload).await?;
    Ok(ApiResponse::ok(profile, "Avatar updated successfully"))
}

/// POST /api/v1/users/update-cover-image
#[utoipa::path(
    post,
    path = "/api/v1/users/update-cover-image",
    tag = "Profile",
    responses(
        (status = 200, description = "Cover image replaced"),
        (status = 400, description = "File missing or upload failed")
    )
)]
pub async fn update_cover_image(
    service: web::Data<AccountService>,
    user: UserId,
    MultipartForm(form): MultipartForm<CoverImageForm>,
) -> Result<HttpResponse> {
    let upload = match form.cover_image {
        Some(file) => read_upload(file).await?,
        None => {
            return Err(AppError::Validation(
                "Cover image file is missing".to_string(),
            ));
        }
    };

    let profile = service.update_cover_image(user.0, upload).await?;
    Ok(ApiResponse::ok(profile, "Cover image updated successfully"))
}
