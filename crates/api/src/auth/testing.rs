//! In-memory collaborators for unit tests.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use vitalis_core::clock::Clock;
use vitalis_core::error::{CoreError, CoreResult};
use vitalis_core::types::{DbId, Timestamp};
use vitalis_db::models::session::UserSession;
use vitalis_db::models::user::User;

use crate::auth::directory::UserDirectory;
use crate::auth::jwt::{hash_refresh_token, JwtConfig, TokenCodec};
use crate::auth::password::PasswordHasher;
use crate::auth::store::{NewSession, SessionStore};

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "unit-test-secret-that-is-long-enough".to_string(),
        access_token_expiry_mins: 60,
        refresh_token_expiry_days: 30,
    }
}

pub fn test_codec(clock: Arc<dyn Clock>) -> TokenCodec {
    TokenCodec::new(&test_jwt_config(), clock)
}

/// Reversible "hash" so tests skip Argon2's cost. Counts verifications.
#[derive(Default)]
pub struct FakeHasher {
    verifies: AtomicUsize,
}

impl FakeHasher {
    pub fn verify_calls(&self) -> usize {
        self.verifies.load(Ordering::SeqCst)
    }
}

impl PasswordHasher for FakeHasher {
    fn hash(&self, plaintext: &str) -> CoreResult<String> {
        Ok(format!("fake${plaintext}"))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> CoreResult<bool> {
        self.verifies.fetch_add(1, Ordering::SeqCst);
        Ok(digest == format!("fake${plaintext}"))
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemorySessionStore {
    rows: Mutex<Vec<UserSession>>,
    next_id: AtomicI64,
    fail_next: AtomicBool,
}

impl InMemorySessionStore {
    /// Make the next store call fail as if the database were unreachable.
    pub fn fail_next_call(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn sessions_for(&self, user_id: DbId) -> Vec<UserSession> {
        self.lock()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect()
    }

    fn check(&self, operation: &'static str) -> CoreResult<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(CoreError::internal(operation, "injected failure"));
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<UserSession>> {
        self.rows.lock().unwrap()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: NewSession) -> CoreResult<UserSession> {
        self.check("session_store.create")?;
        let row = UserSession {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id: session.user_id,
            refresh_token_hash: hash_refresh_token(&session.refresh_token),
            jti: session.jti,
            created_at: session.created_at,
            expires_at: session.expires_at,
            is_active: true,
            revoked_at: None,
            device_info: session.device_info,
        };
        self.lock().push(row.clone());
        Ok(row)
    }

    async fn find_active(
        &self,
        refresh_token: &str,
        now: Timestamp,
    ) -> CoreResult<Option<UserSession>> {
        self.check("session_store.find_active")?;
        let hash = hash_refresh_token(refresh_token);
        Ok(self
            .lock()
            .iter()
            .find(|s| s.refresh_token_hash == hash && s.is_active && s.expires_at > now)
            .cloned())
    }

    async fn deactivate(&self, refresh_token: &str, now: Timestamp) -> CoreResult<bool> {
        self.check("session_store.deactivate")?;
        let hash = hash_refresh_token(refresh_token);
        let mut rows = self.lock();
        let Some(row) = rows.iter_mut().find(|s| s.refresh_token_hash == hash) else {
            return Ok(false);
        };
        if row.is_active {
            row.is_active = false;
            row.revoked_at = Some(now);
        }
        Ok(true)
    }

    async fn deactivate_all(&self, user_id: DbId, now: Timestamp) -> CoreResult<u64> {
        self.check("session_store.deactivate_all")?;
        let mut flipped = 0;
        for row in self.lock().iter_mut() {
            if row.user_id == user_id && row.is_active {
                row.is_active = false;
                row.revoked_at = Some(now);
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    async fn purge_expired(&self, now: Timestamp) -> CoreResult<u64> {
        self.check("session_store.purge_expired")?;
        let mut rows = self.lock();
        let before = rows.len();
        rows.retain(|s| s.expires_at >= now);
        Ok((before - rows.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUsers {
    /// Add a user whose stored digest matches [`FakeHasher`].
    pub fn add(&self, email: &str, password: Option<&str>, status: bool) -> User {
        let now = chrono::Utc::now();
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_name: "Test User".to_string(),
            email_id: email.to_string(),
            mobile_num: "5550100".to_string(),
            city: "Pune".to_string(),
            status,
            hashed_password: password.map(|p| format!("fake${p}")),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(user.clone());
        user
    }

    pub fn remove(&self, email: &str) {
        self.rows.lock().unwrap().retain(|u| u.email_id != email);
    }

    pub fn set_status(&self, email: &str, status: bool) {
        for user in self.rows.lock().unwrap().iter_mut() {
            if user.email_id == email {
                user.status = status;
            }
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUsers {
    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email_id == email)
            .cloned())
    }

    async fn update_password(&self, user_id: DbId, hashed_password: &str) -> CoreResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.hashed_password = Some(hashed_password.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
