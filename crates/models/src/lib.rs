//! `sea-orm` entities backing the credential store and application registry.

pub mod errors;
pub mod db;
pub mod user;
pub mod app;
pub mod admin;

#[cfg(test)]
mod tests;
