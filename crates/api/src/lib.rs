//! Vitalis API server library.
//!
//! Exposes the core building blocks (config, state, auth, error handling,
//! routes) so integration tests and the binary entrypoint can both access
//! them.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
pub mod validation;
