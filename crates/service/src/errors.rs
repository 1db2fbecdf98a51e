use thiserror::Error;

/// Failure conditions reported by persistence collaborators.
/// The auth service re-classifies these into [`crate::auth::errors::AuthError`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0} already exists")]
    Conflict(&'static str),
    #[error("database error: {0}")]
    Db(String),
}

impl StorageError {
    /// Map a model-layer error, naming the entity for not-found and conflict cases.
    pub fn from_model(entity: &'static str, err: models::errors::ModelError) -> Self {
        use models::errors::ModelError;
        match err {
            ModelError::NotFound(_) => StorageError::NotFound(entity),
            ModelError::Conflict(_) => StorageError::Conflict(entity),
            ModelError::Validation(msg) | ModelError::Db(msg) => StorageError::Db(msg),
        }
    }
}
