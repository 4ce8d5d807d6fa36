//! Signed bearer tokens: access and refresh.
//!
//! Both token kinds are HS256-signed JWTs with an explicit `type` claim so one
//! can never be accepted in place of the other. Refresh tokens additionally
//! carry a unique `jti`; server-side, only the SHA-256 hash of the full token
//! string is stored (see [`hash_refresh_token`]).
//!
//! Expiry is stamped and checked against the injected [`Clock`], never the
//! wall clock, so token lifetimes can be driven deterministically in tests.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use vitalis_core::clock::Clock;
use vitalis_core::error::{CoreError, CoreResult};
use vitalis_core::types::DbId;

/// Discriminates the two bearer credential kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject -- the user's email.
    pub sub: String,
    pub user_id: DbId,
    pub mobile_num: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

/// Claims embedded in every refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject -- the user's email.
    pub sub: String,
    pub user_id: DbId,
    pub exp: i64,
    pub iat: i64,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Unique token identifier (UUID v4), persisted on the paired session.
    pub jti: String,
}

/// Common view over the per-type claim records, used by [`TokenCodec::decode`].
pub trait TypedClaims: Serialize + DeserializeOwned {
    /// The `type` value a token must carry to decode as this record.
    const EXPECTED: TokenType;

    fn subject(&self) -> &str;
    fn token_type(&self) -> TokenType;
    fn expires_at(&self) -> i64;
}

impl TypedClaims for AccessClaims {
    const EXPECTED: TokenType = TokenType::Access;

    fn subject(&self) -> &str {
        &self.sub
    }

    fn token_type(&self) -> TokenType {
        self.token_type
    }

    fn expires_at(&self) -> i64 {
        self.exp
    }
}

impl TypedClaims for RefreshClaims {
    const EXPECTED: TokenType = TokenType::Refresh;

    fn subject(&self) -> &str {
        &self.sub
    }

    fn token_type(&self) -> TokenType {
        self.token_type
    }

    fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 60).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days (default: 30).
    pub refresh_token_expiry_days: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 30;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `60`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        }
    }

    pub fn access_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_expiry_mins)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::days(self.refresh_token_expiry_days)
    }
}

/// A freshly minted refresh token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub claims: RefreshClaims,
}

/// Encodes and decodes signed bearer tokens.
///
/// The signing key is fixed for the life of the process; rotating it requires
/// a restart and invalidates every outstanding token.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        // `exp` is checked by hand against the injected clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from(["exp".to_string(), "sub".to_string()]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_ttl: config.access_ttl(),
            refresh_ttl: config.refresh_ttl(),
            clock,
        }
    }

    /// Access token lifetime in seconds, as reported to clients.
    pub fn access_expires_in(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Mint an access token for the given identity.
    pub fn encode_access(&self, email: &str, user_id: DbId, mobile_num: &str) -> CoreResult<String> {
        let now = self.clock.now();
        let claims = AccessClaims {
            sub: email.to_string(),
            user_id,
            mobile_num: mobile_num.to_string(),
            exp: (now + self.access_ttl).timestamp(),
            iat: now.timestamp(),
            token_type: TokenType::Access,
        };
        self.sign(&claims)
    }

    /// Mint a refresh token with a fresh `jti`.
    pub fn encode_refresh(&self, email: &str, user_id: DbId) -> CoreResult<IssuedRefreshToken> {
        let now = self.clock.now();
        let claims = RefreshClaims {
            sub: email.to_string(),
            user_id,
            exp: (now + self.refresh_ttl).timestamp(),
            iat: now.timestamp(),
            token_type: TokenType::Refresh,
            jti: Uuid::new_v4().to_string(),
        };
        let token = self.sign(&claims)?;
        Ok(IssuedRefreshToken { token, claims })
    }

    /// Decode and verify a token as claim record `C`.
    ///
    /// Returns `None` when the signature is invalid, the token is expired,
    /// its `type` is not `C::EXPECTED`, or the subject is missing or empty.
    /// The specific cause is only logged.
    pub fn decode<C: TypedClaims>(&self, token: &str) -> Option<C> {
        let expected = C::EXPECTED;
        let claims = match decode::<C>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!(error = %e, ?expected, "Token rejected");
                return None;
            }
        };

        if claims.token_type() != expected {
            tracing::debug!(?expected, actual = ?claims.token_type(), "Token rejected: wrong type");
            return None;
        }

        if claims.subject().is_empty() {
            tracing::debug!(?expected, "Token rejected: empty subject");
            return None;
        }

        if self.clock.now().timestamp() >= claims.expires_at() {
            tracing::debug!(?expected, "Token rejected: expired");
            return None;
        }

        Some(claims)
    }

    fn sign<C: Serialize>(&self, claims: &C) -> CoreResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            tracing::error!(operation = "token_codec.encode", error = %e, "Token signing failed");
            CoreError::internal("token_codec.encode", e)
        })
    }
}

/// Compute the SHA-256 hex digest of a refresh token.
///
/// Sessions are keyed by this digest; comparing digests is equivalent to an
/// exact match on the presented token string.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
