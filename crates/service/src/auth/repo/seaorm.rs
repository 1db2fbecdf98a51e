use sea_orm::DatabaseConnection;

use crate::auth::domain::{App, User};
use crate::auth::repository::{AppRegistry, CredentialStore};
use crate::errors::StorageError;

/// Postgres-backed credential store and application registry.
#[derive(Clone)]
pub struct SeaOrmStore {
    pub db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl CredentialStore for SeaOrmStore {
    async fn save_user(&self, email: &str, pass_hash: Vec<u8>) -> Result<i64, StorageError> {
        let created = models::user::create(&self.db, email, pass_hash)
            .await
            .map_err(|e| StorageError::from_model("user", e))?;
        Ok(created.id)
    }

    async fn user_by_email(&self, email: &str) -> Result<User, StorageError> {
        let found = models::user::find_by_email(&self.db, email)
            .await
            .map_err(|e| StorageError::from_model("user", e))?
            .ok_or(StorageError::NotFound("user"))?;
        Ok(User { id: found.id, email: found.email, pass_hash: found.pass_hash })
    }

    async fn is_admin(&self, user_id: i64) -> Result<bool, StorageError> {
        models::admin::is_admin(&self.db, user_id)
            .await
            .map_err(|e| StorageError::from_model("user", e))
    }
}

#[async_trait::async_trait]
impl AppRegistry for SeaOrmStore {
    async fn app(&self, app_id: i32) -> Result<App, StorageError> {
        let found = models::app::find(&self.db, app_id)
            .await
            .map_err(|e| StorageError::from_model("app", e))?
            .ok_or(StorageError::NotFound("app"))?;
        Ok(App { id: found.id, name: found.name, secret: found.secret })
    }
}
