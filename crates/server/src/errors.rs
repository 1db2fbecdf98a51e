//! Translation of domain errors into wire responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::auth::errors::AuthError;
use thiserror::Error;

/// Transport-neutral status, mirroring the RPC status codes the auth API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WireCode {
    InvalidArgument,
    AlreadyExists,
    NotFound,
    Cancelled,
    Internal,
}

impl WireCode {
    pub fn http_status(self) -> StatusCode {
        match self {
            WireCode::InvalidArgument => StatusCode::BAD_REQUEST,
            WireCode::AlreadyExists => StatusCode::CONFLICT,
            WireCode::NotFound => StatusCode::NOT_FOUND,
            WireCode::Cancelled => StatusCode::REQUEST_TIMEOUT,
            WireCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    pub code: WireCode,
    pub message: String,
}

impl ApiError {
    fn new(code: WireCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation { errors, .. } => ApiError::new(WireCode::InvalidArgument, errors.to_string()),
            AuthError::InvalidCredentials { .. } => ApiError::new(WireCode::InvalidArgument, "invalid email or password"),
            AuthError::UserExists { .. } => ApiError::new(WireCode::AlreadyExists, "user already exists"),
            AuthError::UserNotFound { .. } => ApiError::new(WireCode::NotFound, "user not found"),
            AuthError::InvalidAppId { .. } => ApiError::new(WireCode::NotFound, "app not found"),
            AuthError::Cancelled { .. } => ApiError::new(WireCode::Cancelled, "request cancelled"),
            // detail was logged where it was raised
            AuthError::Internal { .. } => ApiError::new(WireCode::Internal, "internal error"),
        }
    }
}

/// Bodies that are not JSON, or whose fields have the wrong type, are
/// invalid arguments like any other input failure. Parser detail stays in the log.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(status = %rejection.status(), error = %rejection.body_text(), "rejected request body");
        ApiError::new(WireCode::InvalidArgument, "malformed request body")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.http_status(), Json(self)).into_response()
    }
}

/// Failures that stop the server before it starts accepting requests.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::auth::validation::ValidationErrors;

    #[test]
    fn maps_every_kind() {
        let cases = [
            (AuthError::InvalidCredentials { op: "auth.login" }, WireCode::InvalidArgument, "invalid email or password"),
            (AuthError::UserExists { op: "auth.register" }, WireCode::AlreadyExists, "user already exists"),
            (AuthError::UserNotFound { op: "auth.is_admin" }, WireCode::NotFound, "user not found"),
            (AuthError::InvalidAppId { op: "auth.login" }, WireCode::NotFound, "app not found"),
            (AuthError::Cancelled { op: "auth.login" }, WireCode::Cancelled, "request cancelled"),
        ];
        for (err, code, message) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.code, code);
            assert_eq!(api.message, message);
        }
    }

    #[test]
    fn validation_messages_are_joined() {
        let err = AuthError::Validation {
            op: "auth.register",
            errors: ValidationErrors(vec!["email is required".into(), "password is required".into()]),
        };
        let api = ApiError::from(err);
        assert_eq!(api.code, WireCode::InvalidArgument);
        assert_eq!(api.message, "email is required; password is required");
    }

    #[test]
    fn internal_detail_is_suppressed() {
        let api = ApiError::from(AuthError::Internal { op: "auth.login", detail: "relation \"users\" does not exist".into() });
        assert_eq!(api.code, WireCode::Internal);
        assert_eq!(api.message, "internal error");
        assert_eq!(api.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn json_rejection_becomes_invalid_argument() {
        use axum::extract::FromRequest;

        let req = axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(r#"{"user_id":"seven"}"#))
            .unwrap();
        let rejection = Json::<service::auth::domain::IsAdminInput>::from_request(req, &()).await.unwrap_err();
        let api = ApiError::from(rejection);
        assert_eq!(api.code, WireCode::InvalidArgument);
        assert!(!api.message.contains("seven"));
        assert_eq!(api.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn wire_codes_serialize_snake_case() {
        let json = serde_json::to_value(ApiError::new(WireCode::AlreadyExists, "x")).unwrap();
        assert_eq!(json, serde_json::json!({"code": "already_exists", "message": "x"}));
    }
}
