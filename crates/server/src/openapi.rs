use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String, pub app_id: i32 }

#[derive(ToSchema)]
pub struct LoginResponse { pub token: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct RegisterResponse { pub user_id: i64 }

#[derive(ToSchema)]
pub struct IsAdminRequest { pub user_id: i64 }

#[derive(ToSchema)]
pub struct IsAdminResponse { pub is_admin: bool }

/// `code` is one of `invalid_argument`, `already_exists`, `not_found`, `cancelled`, `internal`.
#[derive(ToSchema)]
pub struct ErrorResponse { pub code: String, pub message: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::register,
        crate::routes::auth::is_admin,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            RegisterResponse,
            IsAdminRequest,
            IsAdminResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth")
    )
)]
pub struct ApiDoc;
