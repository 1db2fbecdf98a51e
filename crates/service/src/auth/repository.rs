use async_trait::async_trait;

use super::domain::{App, User};
use crate::errors::StorageError;

/// Persistence of users and their admin flags.
///
/// Email uniqueness is the store's job: `save_user` must fail with
/// [`StorageError::Conflict`] for a duplicate, even under concurrent inserts.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn save_user(&self, email: &str, pass_hash: Vec<u8>) -> Result<i64, StorageError>;
    async fn user_by_email(&self, email: &str) -> Result<User, StorageError>;
    async fn is_admin(&self, user_id: i64) -> Result<bool, StorageError>;
}

/// Read-only lookup of client applications and their signing secrets.
#[async_trait]
pub trait AppRegistry: Send + Sync {
    async fn app(&self, app_id: i32) -> Result<App, StorageError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockCredentialStore {
        users: Mutex<HashMap<String, User>>, // key: email
        admins: Mutex<HashSet<i64>>,
    }

    impl MockCredentialStore {
        pub fn grant_admin(&self, user_id: i64) {
            self.admins.lock().unwrap().insert(user_id);
        }

        pub fn user_count(&self) -> usize {
            self.users.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CredentialStore for MockCredentialStore {
        async fn save_user(&self, email: &str, pass_hash: Vec<u8>) -> Result<i64, StorageError> {
            let mut users = self.users.lock().unwrap();
            if users.contains_key(email) {
                return Err(StorageError::Conflict("user"));
            }
            let id = users.len() as i64 + 1;
            users.insert(email.to_string(), User { id, email: email.to_string(), pass_hash });
            Ok(id)
        }

        async fn user_by_email(&self, email: &str) -> Result<User, StorageError> {
            let users = self.users.lock().unwrap();
            users.get(email).cloned().ok_or(StorageError::NotFound("user"))
        }

        async fn is_admin(&self, user_id: i64) -> Result<bool, StorageError> {
            let known = self.users.lock().unwrap().values().any(|u| u.id == user_id);
            if !known {
                return Err(StorageError::NotFound("user"));
            }
            Ok(self.admins.lock().unwrap().contains(&user_id))
        }
    }

    #[derive(Default)]
    pub struct MockAppRegistry {
        apps: Mutex<HashMap<i32, App>>, // key: app id
    }

    impl MockAppRegistry {
        pub fn with_app(self, id: i32, name: &str, secret: &str) -> Self {
            self.apps.lock().unwrap().insert(id, App { id, name: name.to_string(), secret: secret.to_string() });
            self
        }
    }

    #[async_trait]
    impl AppRegistry for MockAppRegistry {
        async fn app(&self, app_id: i32) -> Result<App, StorageError> {
            let apps = self.apps.lock().unwrap();
            apps.get(&app_id).cloned().ok_or(StorageError::NotFound("app"))
        }
    }
}
