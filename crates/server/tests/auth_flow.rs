use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::routes::{self, auth};
use service::auth::repository::mock::{MockAppRegistry, MockCredentialStore};
use service::auth::token::verify_token;
use service::auth::{AuthConfig, AuthService};

const APP_ID: i32 = 1;
const APP_SECRET: &str = "app-one-secret";

fn build_app() -> (Router, Arc<MockCredentialStore>) {
    let users = Arc::new(MockCredentialStore::default());
    let apps = Arc::new(MockAppRegistry::default().with_app(APP_ID, "app-one", APP_SECRET));
    let auth_svc = AuthService::with_jwt(users.clone(), apps, AuthConfig { token_ttl: Duration::from_secs(3600) });
    let state = auth::ServerState { auth: Arc::new(auth_svc), request_timeout: Duration::from_secs(5) };
    let app = routes::build_router(state, tower_http::cors::CorsLayer::very_permissive());
    (app, users)
}

async fn post(app: &Router, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body)?))?;
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn register_then_login_issues_app_scoped_token() -> anyhow::Result<()> {
    let (app, _) = build_app();

    let (status, body) = post(&app, "/auth/register", json!({"email": "ann@example.com", "password": "S3curePass!"})).await?;
    assert_eq!(status, StatusCode::OK);
    let user_id = body["user_id"].as_i64().unwrap();
    assert!(user_id > 0);

    let (status, body) = post(&app, "/auth/login", json!({"email": "ann@example.com", "password": "S3curePass!", "app_id": APP_ID})).await?;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();

    let claims = verify_token(token, APP_SECRET.as_bytes())?;
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.email, "ann@example.com");
    assert_eq!(claims.app_id, APP_ID);
    assert!(verify_token(token, b"some-other-secret").is_err());
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() -> anyhow::Result<()> {
    let (app, _) = build_app();
    post(&app, "/auth/register", json!({"email": "bob@example.com", "password": "StrongPass123"})).await?;

    let wrong_pass = post(&app, "/auth/login", json!({"email": "bob@example.com", "password": "wrong", "app_id": APP_ID})).await?;
    let no_user = post(&app, "/auth/login", json!({"email": "nobody@example.com", "password": "wrong", "app_id": APP_ID})).await?;

    assert_eq!(wrong_pass.0, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_pass, no_user);
    assert_eq!(wrong_pass.1["code"], "invalid_argument");
    assert_eq!(wrong_pass.1["message"], "invalid email or password");
    Ok(())
}

#[tokio::test]
async fn unknown_app_is_reported_as_bad_credentials() -> anyhow::Result<()> {
    let (app, _) = build_app();
    post(&app, "/auth/register", json!({"email": "cid@example.com", "password": "pw"})).await?;

    let (status, body) = post(&app, "/auth/login", json!({"email": "cid@example.com", "password": "pw", "app_id": 99})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid email or password");
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_conflicts() -> anyhow::Result<()> {
    let (app, users) = build_app();
    let body = json!({"email": "dee@example.com", "password": "pw-one"});

    let (first, _) = post(&app, "/auth/register", body.clone()).await?;
    let (second, err) = post(&app, "/auth/register", body).await?;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(err["code"], "already_exists");
    assert_eq!(users.user_count(), 1);
    Ok(())
}

#[tokio::test]
async fn invalid_input_lists_every_failing_field() -> anyhow::Result<()> {
    let (app, users) = build_app();

    let (status, body) = post(&app, "/auth/login", json!({"email": "not-an-email"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_argument");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("email must be a valid email"), "{message}");
    assert!(message.contains("password is required"), "{message}");
    assert!(message.contains("app_id"), "{message}");

    let (status, body) = post(&app, "/auth/register", json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("email is required"));
    assert_eq!(users.user_count(), 0);
    Ok(())
}

#[tokio::test]
async fn wrongly_typed_field_is_an_invalid_argument() -> anyhow::Result<()> {
    let (app, _) = build_app();

    let (status, body) = post(&app, "/auth/login", json!({"email": "a@b.co", "password": "pw", "app_id": "one"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_argument");
    assert_eq!(body["message"], "malformed request body");

    let (status, body) = post(&app, "/auth/is-admin", json!({"user_id": [1]})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_argument");
    Ok(())
}

#[tokio::test]
async fn non_json_body_is_an_invalid_argument() -> anyhow::Result<()> {
    let (app, users) = build_app();

    for content_type in ["application/json", "text/plain"] {
        let req = Request::builder()
            .method("POST")
            .uri("/auth/register")
            .header("content-type", content_type)
            .body(Body::from("email=a@b.co&password=pw"))?;
        let resp = app.clone().oneshot(req).await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await?)?;
        assert_eq!(body["code"], "invalid_argument");
    }
    assert_eq!(users.user_count(), 0);
    Ok(())
}

#[tokio::test]
async fn is_admin_reflects_store_state() -> anyhow::Result<()> {
    let (app, users) = build_app();

    let (status, body) = post(&app, "/auth/is-admin", json!({"user_id": 42})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (_, reg) = post(&app, "/auth/register", json!({"email": "eve@example.com", "password": "pw"})).await?;
    let user_id = reg["user_id"].as_i64().unwrap();

    let (status, body) = post(&app, "/auth/is-admin", json!({"user_id": user_id})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_admin"], false);

    users.grant_admin(user_id);
    let (_, body) = post(&app, "/auth/is-admin", json!({"user_id": user_id})).await?;
    assert_eq!(body["is_admin"], true);

    let (status, _) = post(&app, "/auth/is-admin", json!({"user_id": 0})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn health_and_openapi_are_served() -> anyhow::Result<()> {
    let (app, _) = build_app();

    let resp = app.clone().oneshot(Request::get("/health").body(Body::empty())?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await?)?;
    assert_eq!(body["status"], "ok");

    let resp = app.clone().oneshot(Request::get("/api-docs/openapi.json").body(Body::empty())?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let doc: Value = serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await?)?;
    assert!(doc["paths"]["/auth/login"].is_object());
    assert!(doc["paths"]["/auth/is-admin"].is_object());
    Ok(())
}
