//! Request extractors shared by handlers.
//!
//! - [`auth::AuthUser`] -- Resolves the live identity behind a Bearer access token.

pub mod auth;
