/// JWT authentication middleware.
///
/// Accepts the access token either as an `accessToken` cookie or as a
/// `Authorization: Bearer` header, validates it, and inserts the subject's
/// [`UserId`] into request extensions for handlers to extract.
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::error::AppError;
use crate::security::jwt;

/// User ID extracted from a validated access token
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub Uuid);

/// Middleware factory carrying the verification secret
pub struct JwtAuth {
    secret: Rc<String>,
}

impl JwtAuth {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Rc::new(secret.to_string()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtAuthService {
            service: Rc::new(service),
            secret: self.secret.clone(),
        }))
    }
}

pub struct JwtAuthService<S> {
    service: Rc<S>,
    secret: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let secret = self.secret.clone();

        Box::pin(async move {
            // Read all immutable request data into owned values before the
            // mutable extensions borrow below.
            let token = match bearer_or_cookie_token(req.request()) {
                Some(token) => token,
                None => {
                    return Err(AppError::Unauthorized(
                        "Unauthorized request".to_string(),
                    )
                    .into());
                }
            };

            let user_id = match jwt::user_id_from_access_token(&secret, &token) {
                Ok(id) => id,
                Err(e) => {
                    tracing::debug!("access token rejected: {}", e);
                    return Err(e.into());
                }
            };

            req.extensions_mut().insert(UserId(user_id));

            let res = service.call(req).await?;
            Ok(res)
        })
    }
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<UserId>().copied() {
            Some(user_id) => ready(Ok(user_id)),
            None => ready(Err(AppError::Unauthorized(
                "Unauthorized request".to_string(),
            )
            .into())),
        }
    }
}

/// Best-effort identity for routes that serve both anonymous and logged-in
/// viewers. Never fails the request.
pub fn authenticated_user(req: &HttpRequest, secret: &str) -> Option<Uuid> {
    let token = bearer_or_cookie_token(req)?;
    jwt::user_id_from_access_token(secret, &token).ok()
}

fn bearer_or_cookie_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie("accessToken") {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_header_extraction() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_or_cookie_token(&req).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_token() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(bearer_or_cookie_token(&req), None);
    }

    #[test]
    fn test_cookie_takes_precedence() {
        let req = TestRequest::default()
            .cookie(actix_web::cookie::Cookie::new("accessToken", "cookie-token"))
            .insert_header(("Authorization", "Bearer header-token"))
            .to_http_request();
        assert_eq!(bearer_or_cookie_token(&req).as_deref(), Some("cookie-token"));
    }

    #[test]
    fn test_anonymous_viewer_is_none() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(authenticated_user(&req, "secret"), None);
    }
}
