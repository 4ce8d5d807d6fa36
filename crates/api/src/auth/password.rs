//! Argon2id password hashing, verification, and strength validation.
//!
//! All password hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`]. The PHC string format is used for storage so
//! that algorithm parameters and salt are embedded in the hash itself.
//!
//! [`PasswordHasher`] is the seam the auth service depends on; [`Argon2Hasher`]
//! is the production implementation.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use vitalis_core::error::{CoreError, CoreResult};

/// Opaque password hashing capability.
pub trait PasswordHasher: Send + Sync {
    /// Produce a storable digest for `plaintext`.
    fn hash(&self, plaintext: &str) -> CoreResult<String>;

    /// Check `plaintext` against a stored digest.
    fn verify(&self, plaintext: &str, digest: &str) -> CoreResult<bool>;
}

/// Well-formed Argon2id digest (default parameters) that no password matches.
///
/// Verified against when there is no real digest to check, so a login attempt
/// for an unknown account costs the same as one with a wrong password.
pub const UNMATCHABLE_DIGEST: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$R1WCjkpIqmLuK1f4uCFnhQ$H5yN2rJm4Wk7JRJVTZp13jIzAsm/yI016Voqwo7w8/8";

/// Argon2id with default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> CoreResult<String> {
        hash_password(plaintext).map_err(|e| {
            tracing::error!(operation = "password.hash", error = %e, "Password hashing failed");
            CoreError::internal("password.hash", e)
        })
    }

    fn verify(&self, plaintext: &str, digest: &str) -> CoreResult<bool> {
        match verify_password(plaintext, digest) {
            Ok(matched) => Ok(matched),
            // A digest that does not parse can never match.
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is not a valid PHC string");
                Ok(false)
            }
        }
    }
}

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Validate that a password meets minimum strength requirements.
///
/// Currently enforces a minimum character length. Returns `Ok(())` when the
/// password is acceptable, or `Err` with a human-readable explanation.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}
