//! Auth module: domain types, collaborator traits, and the orchestrating service.
//!
//! Request flow: validation, credential store, application registry, token issuer.

pub mod domain;
pub mod errors;
pub mod validation;
pub mod password;
pub mod token;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::{AuthConfig, AuthService};
