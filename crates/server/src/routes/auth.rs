use std::sync::Arc;
use std::time::Duration;

use axum::{extract::rejection::JsonRejection, extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use service::auth::domain::{IsAdminInput, LoginInput, RegisterInput};
use service::auth::AuthService;
use service::context::RequestContext;

use crate::errors::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService>,
    pub request_timeout: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginOutput { pub token: String }

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterOutput { pub user_id: i64 }

#[derive(Debug, Serialize, Deserialize)]
pub struct IsAdminOutput { pub is_admin: bool }

/// Correlation id from `x-request-id` when it is a UUID, otherwise a fresh one.
fn request_context(headers: &HeaderMap, timeout: Duration) -> RequestContext {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .unwrap_or_else(Uuid::new_v4);
    RequestContext::new().with_request_id(request_id).with_timeout(timeout)
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Token issued", body = crate::openapi::LoginResponse), (status = 400, description = "Invalid argument or credentials", body = crate::openapi::ErrorResponse)))]
pub async fn login(State(state): State<ServerState>, headers: HeaderMap, body: Result<Json<LoginInput>, JsonRejection>) -> Result<Json<LoginOutput>, ApiError> {
    let Json(input) = body?;
    let ctx = request_context(&headers, state.request_timeout);
    let token = state.auth.login(&ctx, input).await?;
    Ok(Json(LoginOutput { token }))
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 200, description = "Registered", body = crate::openapi::RegisterResponse), (status = 400, description = "Bad Request", body = crate::openapi::ErrorResponse), (status = 409, description = "Conflict", body = crate::openapi::ErrorResponse)))]
pub async fn register(State(state): State<ServerState>, headers: HeaderMap, body: Result<Json<RegisterInput>, JsonRejection>) -> Result<Json<RegisterOutput>, ApiError> {
    let Json(input) = body?;
    let ctx = request_context(&headers, state.request_timeout);
    let user_id = state.auth.register_new_user(&ctx, input).await?;
    Ok(Json(RegisterOutput { user_id }))
}

#[utoipa::path(post, path = "/auth/is-admin", tag = "auth", request_body = crate::openapi::IsAdminRequest, responses((status = 200, description = "Admin flag", body = crate::openapi::IsAdminResponse), (status = 404, description = "Unknown user", body = crate::openapi::ErrorResponse)))]
pub async fn is_admin(State(state): State<ServerState>, headers: HeaderMap, body: Result<Json<IsAdminInput>, JsonRejection>) -> Result<Json<IsAdminOutput>, ApiError> {
    let Json(input) = body?;
    let ctx = request_context(&headers, state.request_timeout);
    let is_admin = state.auth.is_admin(&ctx, input.user_id).await?;
    Ok(Json(IsAdminOutput { is_admin }))
}
