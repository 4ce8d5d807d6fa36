//! Authentication and session lifecycle.
//!
//! - [`jwt`] -- typed access/refresh token encoding and verification.
//! - [`password`] -- Argon2id password hashing and strength validation.
//! - [`store`] -- refresh session persistence.
//! - [`directory`] -- user lookup.
//! - [`service`] -- login, issuance, refresh, revocation.
//! - [`guard`] -- per-request bearer token resolution.

pub mod directory;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod service;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
