use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

/// Success envelope shared by every endpoint:
/// `{ statusCode, data, message, success: true }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, data: T, message: &str) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
            message: message.to_string(),
            success: true,
        }
    }

    /// 200 response with the enveloped payload.
    pub fn ok(data: T, message: &str) -> HttpResponse {
        HttpResponse::Ok().json(Self::new(StatusCode::OK, data, message))
    }

    /// 201 response with the enveloped payload.
    pub fn created(data: T, message: &str) -> HttpResponse {
        HttpResponse::Created().json(Self::new(StatusCode::CREATED, data, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_field_names() {
        let body = ApiResponse::new(StatusCode::OK, serde_json::json!({"id": 1}), "done");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "done");
        assert_eq!(json["data"]["id"], 1);
    }

    #[test]
    fn test_created_status() {
        let response = ApiResponse::created(serde_json::json!(null), "made");
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
