//! Route configuration
//!
//! Centralized route setup; the account domain manages its own scope and
//! wraps only its secured subtree in the JWT middleware.

use actix_web::{web, HttpResponse};

use crate::config::JwtConfig;
use crate::handlers;
use crate::middleware::JwtAuth;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig, jwt: &JwtConfig) {
    cfg.route("/api/v1/openapi.json", web::get().to(openapi_handler))
        .service(
            web::scope("/api/v1")
                .route("/health", web::get().to(handlers::health_check))
                .configure(|c| routes::users::configure(c, jwt)),
        );
}

/// OpenAPI JSON endpoint
async fn openapi_handler() -> HttpResponse {
    use utoipa::OpenApi;
    HttpResponse::Ok()
        .content_type("application/json")
        .json(crate::openapi::ApiDoc::openapi())
}

// Sub-modules for each domain
mod routes {
    use super::*;

    pub mod users {
        use super::*;

        pub fn configure(cfg: &mut web::ServiceConfig, jwt: &JwtConfig) {
            cfg.service(
                web::scope("/users")
                    .route("/register", web::post().to(handlers::register))
                    .route("/login", web::post().to(handlers::login))
                    .route("/refresh-token", web::post().to(handlers::refresh_token))
                    .route(
                        "/channel/{user_name}",
                        web::get().to(handlers::channel_profile),
                    )
                    .service(
                        web::scope("")
                            .wrap(JwtAuth::new(&jwt.secret))
                            .route("/logout", web::post().to(handlers::logout))
                            .route(
                                "/change-password",
                                web::post().to(handlers::change_password),
                            )
                            .route("/current-user", web::get().to(handlers::current_user))
                            .route("/update-account", web::patch().to(handlers::update_account))
                            .route("/update-avatar", web::post().to(handlers::update_avatar))
                            .route(
                                "/update-cover-image",
                                web::post().to(handlers::update_cover_image),
                            )
                            .route("/watch-history", web::get().to(handlers::watch_history))
                            .route(
                                "/watch-history/{video_id}",
                                web::post().to(handlers::record_watch),
                            )
                            .route(
                                "/subscriptions/{channel_id}",
                                web::post().to(handlers::subscribe),
                            )
                            .route(
                                "/subscriptions/{channel_id}",
                                web::delete().to(handlers::unsubscribe),
                            ),
                    ),
            );
        }
    }
}
