//! Authentication core: credential checks, registration, per-application
//! session tokens and admin lookups.
//! - Persistence and token signing sit behind traits so transports and tests
//!   can inject their own implementations.
//! - Every operation takes a [`context::RequestContext`] carrying correlation
//!   fields and the caller's cancellation signal.

pub mod errors;
pub mod context;
pub mod auth;
#[cfg(test)]
pub mod test_support;
