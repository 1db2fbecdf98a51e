use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, instrument, warn};

use super::domain::{App, IsAdminInput, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::password;
use super::repository::{AppRegistry, CredentialStore};
use super::token::{JwtIssuer, TokenIssuer};
use super::validation::Validator;
use crate::context::RequestContext;
use crate::errors::StorageError;

const OP_LOGIN: &str = "auth.login";
const OP_REGISTER: &str = "auth.register";
const OP_IS_ADMIN: &str = "auth.is_admin";

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token_ttl: Duration,
}

/// Auth business service independent of web framework.
///
/// Holds only immutable collaborators, so one instance is shared by every
/// in-flight request without locking.
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    apps: Arc<dyn AppRegistry>,
    tokens: Arc<dyn TokenIssuer>,
    validator: Arc<Validator>,
    cfg: AuthConfig,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        apps: Arc<dyn AppRegistry>,
        tokens: Arc<dyn TokenIssuer>,
        validator: Arc<Validator>,
        cfg: AuthConfig,
    ) -> Self {
        Self { users, apps, tokens, validator, cfg }
    }

    /// Service signing HS256 JWTs with a fresh [`Validator`].
    pub fn with_jwt(users: Arc<dyn CredentialStore>, apps: Arc<dyn AppRegistry>, cfg: AuthConfig) -> Self {
        Self::new(users, apps, Arc::new(JwtIssuer::new()), Arc::new(Validator::new()), cfg)
    }

    /// Check credentials and issue a token for `input.app_id`.
    ///
    /// Unknown email, wrong password and unknown application all fail with
    /// the same [`AuthError::InvalidCredentials`].
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthConfig, AuthService};
    /// use service::auth::domain::{LoginInput, RegisterInput};
    /// use service::auth::repository::mock::{MockAppRegistry, MockCredentialStore};
    /// use service::context::RequestContext;
    /// use std::sync::Arc;
    /// use std::time::Duration;
    /// let users = Arc::new(MockCredentialStore::default());
    /// let apps = Arc::new(MockAppRegistry::default().with_app(1, "web", "app-secret"));
    /// let svc = AuthService::with_jwt(users, apps, AuthConfig { token_ttl: Duration::from_secs(3600) });
    /// let ctx = RequestContext::new();
    /// let reg = RegisterInput { email: "u@e.com".into(), password: "Passw0rd".into() };
    /// tokio_test::block_on(svc.register_new_user(&ctx, reg)).unwrap();
    /// let login = LoginInput { email: "u@e.com".into(), password: "Passw0rd".into(), app_id: 1 };
    /// let token = tokio_test::block_on(svc.login(&ctx, login)).unwrap();
    /// assert_eq!(token.split('.').count(), 3);
    /// ```
    #[instrument(skip_all, fields(op = OP_LOGIN, request_id = %ctx.request_id, email = %input.email))]
    pub async fn login(&self, ctx: &RequestContext, input: LoginInput) -> Result<String, AuthError> {
        info!("attempting to login user");
        self.validator
            .validate(&input)
            .map_err(|errors| AuthError::Validation { op: OP_LOGIN, errors })?;

        let found = ctx
            .run(self.users.user_by_email(&input.email))
            .await
            .map_err(|_| cancelled(OP_LOGIN))?;
        let user = match found {
            Ok(user) => user,
            Err(StorageError::NotFound(_)) => {
                warn!("user not found");
                return Err(AuthError::InvalidCredentials { op: OP_LOGIN });
            }
            Err(e) => return Err(internal(OP_LOGIN, "failed to get user", e)),
        };

        let matches = password::verify_password(input.password, user.pass_hash.clone())
            .await
            .map_err(|e| internal(OP_LOGIN, "failed to verify password", e))?;
        if !matches {
            info!(user_id = user.id, "invalid password");
            return Err(AuthError::InvalidCredentials { op: OP_LOGIN });
        }

        let app = self.resolve_app(ctx, OP_LOGIN, input.app_id).await.map_err(|e| match e {
            AuthError::InvalidAppId { op } => AuthError::InvalidCredentials { op },
            other => other,
        })?;

        let token = self
            .tokens
            .issue(&user, &app, self.cfg.token_ttl)
            .map_err(|e| internal(OP_LOGIN, "failed to create token", e))?;

        info!(user_id = user.id, app_id = app.id, "user logged in");
        Ok(token)
    }

    /// Hash the password and persist a new user, returning its id.
    ///
    /// There is no existence pre-check: the store's uniqueness constraint
    /// decides, and a duplicate surfaces as [`AuthError::UserExists`].
    /// A request cancelled before the insert is issued writes nothing; once
    /// issued, the insert runs to completion.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthConfig, AuthService};
    /// use service::auth::domain::RegisterInput;
    /// use service::auth::errors::AuthErrorKind;
    /// use service::auth::repository::mock::{MockAppRegistry, MockCredentialStore};
    /// use service::context::RequestContext;
    /// use std::sync::Arc;
    /// use std::time::Duration;
    /// let svc = AuthService::with_jwt(
    ///     Arc::new(MockCredentialStore::default()),
    ///     Arc::new(MockAppRegistry::default()),
    ///     AuthConfig { token_ttl: Duration::from_secs(60) },
    /// );
    /// let ctx = RequestContext::new();
    /// let input = RegisterInput { email: "alice@example.com".into(), password: "secret123".into() };
    /// let id = tokio_test::block_on(svc.register_new_user(&ctx, input.clone())).unwrap();
    /// assert_eq!(id, 1);
    /// let again = tokio_test::block_on(svc.register_new_user(&ctx, input)).unwrap_err();
    /// assert_eq!(again.kind(), AuthErrorKind::UserExists);
    /// ```
    #[instrument(skip_all, fields(op = OP_REGISTER, request_id = %ctx.request_id, email = %input.email))]
    pub async fn register_new_user(&self, ctx: &RequestContext, input: RegisterInput) -> Result<i64, AuthError> {
        info!("registering new user");
        self.validator
            .validate(&input)
            .map_err(|errors| AuthError::Validation { op: OP_REGISTER, errors })?;

        let pass_hash = password::hash_password(input.password)
            .await
            .map_err(|e| internal(OP_REGISTER, "failed to generate password hash", e))?;

        if ctx.is_cancelled() {
            return Err(cancelled(OP_REGISTER));
        }
        match self.users.save_user(&input.email, pass_hash).await {
            Ok(user_id) => {
                info!(user_id, "new user registered");
                Ok(user_id)
            }
            Err(StorageError::Conflict(_)) => {
                warn!("user already exists");
                Err(AuthError::UserExists { op: OP_REGISTER })
            }
            Err(e) => Err(internal(OP_REGISTER, "failed to save new user", e)),
        }
    }

    /// Admin flag for `user_id`, read fresh from the store on every call.
    #[instrument(skip_all, fields(op = OP_IS_ADMIN, request_id = %ctx.request_id, user_id = user_id))]
    pub async fn is_admin(&self, ctx: &RequestContext, user_id: i64) -> Result<bool, AuthError> {
        info!("checking if user is admin");
        self.validator
            .validate(&IsAdminInput { user_id })
            .map_err(|errors| AuthError::Validation { op: OP_IS_ADMIN, errors })?;

        let flag = ctx
            .run(self.users.is_admin(user_id))
            .await
            .map_err(|_| cancelled(OP_IS_ADMIN))?;
        match flag {
            Ok(is_admin) => {
                info!(is_admin, "checked if user is admin");
                Ok(is_admin)
            }
            Err(StorageError::NotFound(_)) => {
                warn!("user not found");
                Err(AuthError::UserNotFound { op: OP_IS_ADMIN })
            }
            Err(e) => Err(internal(OP_IS_ADMIN, "failed to check if user is admin", e)),
        }
    }

    async fn resolve_app(&self, ctx: &RequestContext, op: &'static str, app_id: i32) -> Result<App, AuthError> {
        let found = ctx.run(self.apps.app(app_id)).await.map_err(|_| cancelled(op))?;
        match found {
            Ok(app) => Ok(app),
            Err(StorageError::NotFound(_)) => {
                warn!(app_id, "app not found");
                Err(AuthError::InvalidAppId { op })
            }
            Err(e) => Err(internal(op, "failed to get app", e)),
        }
    }
}

fn cancelled(op: &'static str) -> AuthError {
    let err = AuthError::Cancelled { op };
    warn!(op, code = err.code(), "request cancelled");
    err
}

fn internal(op: &'static str, what: &str, detail: impl std::fmt::Display) -> AuthError {
    let err = AuthError::Internal { op, detail: detail.to_string() };
    error!(op, code = err.code(), error = %detail, "{what}");
    err
}
