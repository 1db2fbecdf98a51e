//! Argon2id password hashing with the crate's default cost
//! (m = 19 MiB, t = 2, p = 1) and a fresh salt per hash.
//!
//! Both directions are CPU-bound, so they run on the blocking pool.

use argon2::password_hash::{PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHash};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("stored hash is malformed: {0}")]
    Malformed(String),
    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Hash `password` into PHC string bytes.
pub async fn hash_password(password: String) -> Result<Vec<u8>, PasswordError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string().into_bytes())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    })
    .await?
}

/// Constant-time comparison of `password` against a stored PHC hash.
/// `Ok(false)` means a mismatch; `Err` means the stored value is unusable.
pub async fn verify_password(password: String, stored: Vec<u8>) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || {
        let phc = std::str::from_utf8(&stored).map_err(|e| PasswordError::Malformed(e.to_string()))?;
        let parsed = PasswordHash::new(phc).map_err(|e| PasswordError::Malformed(e.to_string()))?;
        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
    })
    .await?
}
