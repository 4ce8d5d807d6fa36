//! Shared building blocks for the vitalis backend crates.
//!
//! - [`types`] -- primitive id and timestamp aliases.
//! - [`error`] -- the domain error taxonomy.
//! - [`clock`] -- the time source injected into services and repositories.

pub mod clock;
pub mod error;
pub mod types;
