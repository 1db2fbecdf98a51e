use thiserror::Error;

use super::validation::ValidationErrors;

/// Domain error kinds, without the diagnostic payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidCredentials,
    InvalidAppId,
    UserExists,
    UserNotFound,
    ValidationFailed,
    Cancelled,
    Internal,
}

/// Business errors for auth workflows. Every variant records the operation
/// (`auth.login`, `auth.register`, `auth.is_admin`) that raised it.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{op}: invalid credentials")]
    InvalidCredentials { op: &'static str },
    #[error("{op}: invalid app id")]
    InvalidAppId { op: &'static str },
    #[error("{op}: user already exists")]
    UserExists { op: &'static str },
    #[error("{op}: user not found")]
    UserNotFound { op: &'static str },
    #[error("{op}: validation failed: {errors}")]
    Validation { op: &'static str, errors: ValidationErrors },
    #[error("{op}: cancelled")]
    Cancelled { op: &'static str },
    /// Unclassified collaborator failure. `detail` is for logs only.
    #[error("{op}: {detail}")]
    Internal { op: &'static str, detail: String },
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::InvalidCredentials { .. } => AuthErrorKind::InvalidCredentials,
            AuthError::InvalidAppId { .. } => AuthErrorKind::InvalidAppId,
            AuthError::UserExists { .. } => AuthErrorKind::UserExists,
            AuthError::UserNotFound { .. } => AuthErrorKind::UserNotFound,
            AuthError::Validation { .. } => AuthErrorKind::ValidationFailed,
            AuthError::Cancelled { .. } => AuthErrorKind::Cancelled,
            AuthError::Internal { .. } => AuthErrorKind::Internal,
        }
    }

    pub fn op(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials { op }
            | AuthError::InvalidAppId { op }
            | AuthError::UserExists { op }
            | AuthError::UserNotFound { op }
            | AuthError::Validation { op, .. }
            | AuthError::Cancelled { op }
            | AuthError::Internal { op, .. } => op,
        }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self.kind() {
            AuthErrorKind::ValidationFailed => 1001,
            AuthErrorKind::UserExists => 1002,
            AuthErrorKind::UserNotFound => 1003,
            AuthErrorKind::InvalidCredentials => 1004,
            AuthErrorKind::InvalidAppId => 1005,
            AuthErrorKind::Cancelled => 1006,
            AuthErrorKind::Internal => 1200,
        }
    }
}
