//! In-memory `SessionStore` with sliding expiry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{SessionIdentity, SessionToken, UserId};

struct Entry {
    identity: SessionIdentity,
    expires_at: DateTime<Utc>,
}

/// Session store held in process memory.
///
/// Every successful `get` pushes the expiry out by the TTL. Expired entries
/// are invisible immediately and removed by `get` or `purge_expired`.
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<SessionToken, Entry>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionStore {
    /// Empty store whose entries live for `ttl` after last use.
    pub fn new(ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    fn entries(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<SessionToken, Entry>>, SessionStoreError> {
        self.entries
            .write()
            .map_err(|_| SessionStoreError::operation("session store lock poisoned"))
    }

    fn expiry(&self) -> DateTime<Utc> {
        self.clock.utc() + self.ttl
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, identity: SessionIdentity) -> Result<SessionToken, SessionStoreError> {
        let token = SessionToken::generate();
        let entry = Entry {
            identity,
            expires_at: self.expiry(),
        };
        self.entries()?.insert(token.clone(), entry);
        Ok(token)
    }

    async fn get(
        &self,
        token: &SessionToken,
    ) -> Result<Option<SessionIdentity>, SessionStoreError> {
        let now = self.clock.utc();
        let expires_at = self.expiry();
        let mut entries = self.entries()?;
        let Some(entry) = entries.get_mut(token) else {
            return Ok(None);
        };
        if entry.expires_at <= now {
            entries.remove(token);
            debug!(session = %token.fingerprint(), "session expired");
            return Ok(None);
        }
        entry.expires_at = expires_at;
        Ok(Some(entry.identity.clone()))
    }

    async fn replace(
        &self,
        token: &SessionToken,
        identity: SessionIdentity,
    ) -> Result<bool, SessionStoreError> {
        let now = self.clock.utc();
        let mut entries = self.entries()?;
        match entries.get_mut(token) {
            Some(entry) if entry.expires_at > now => {
                entry.identity = identity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn destroy(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        self.entries()?.remove(token);
        Ok(())
    }

    async fn destroy_for_user(&self, user_id: &UserId) -> Result<usize, SessionStoreError> {
        let mut entries = self.entries()?;
        let before = entries.len();
        entries.retain(|_, entry| entry.identity.id != *user_id);
        Ok(before - entries.len())
    }

    async fn purge_expired(&self) -> Result<usize, SessionStoreError> {
        let now = self.clock.utc();
        let mut entries = self.entries()?;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::memory::test_clock::MutableClock;
    use rstest::{fixture, rstest};

    struct Harness {
        clock: Arc<MutableClock>,
        store: InMemorySessionStore,
    }

    #[fixture]
    fn harness() -> Harness {
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let store = InMemorySessionStore::new(TimeDelta::hours(1), clock.clone());
        Harness { clock, store }
    }

    fn identity(name: &str) -> SessionIdentity {
        SessionIdentity {
            id: UserId::random(),
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "0123456789".into(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn created_sessions_resolve(harness: Harness) {
        let token = harness.store.create(identity("Ada")).await.expect("create");

        let found = harness.store.get(&token).await.expect("get");

        assert_eq!(found.map(|identity| identity.name), Some("Ada".to_owned()));
    }

    #[rstest]
    #[tokio::test]
    async fn tokens_are_unique_per_login(harness: Harness) {
        let first = harness.store.create(identity("Ada")).await.expect("create");
        let second = harness.store.create(identity("Ada")).await.expect("create");
        assert_ne!(first, second);
    }

    #[rstest]
    #[tokio::test]
    async fn expired_sessions_disappear(harness: Harness) {
        let token = harness.store.create(identity("Ada")).await.expect("create");

        harness.clock.advance(TimeDelta::hours(1));

        assert!(harness.store.get(&token).await.expect("get").is_none());
        assert_eq!(harness.store.purge_expired().await.expect("purge"), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn use_slides_the_expiry(harness: Harness) {
        let token = harness.store.create(identity("Ada")).await.expect("create");

        harness.clock.advance(TimeDelta::minutes(45));
        assert!(harness.store.get(&token).await.expect("get").is_some());
        harness.clock.advance(TimeDelta::minutes(45));

        assert!(harness.store.get(&token).await.expect("get").is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn replace_swaps_identity_of_live_session(harness: Harness) {
        let token = harness.store.create(identity("Ada")).await.expect("create");

        let swapped = harness
            .store
            .replace(&token, identity("Countess"))
            .await
            .expect("replace");

        assert!(swapped);
        let found = harness.store.get(&token).await.expect("get");
        assert_eq!(found.map(|identity| identity.name), Some("Countess".to_owned()));
    }

    #[rstest]
    #[tokio::test]
    async fn replace_ignores_unknown_tokens(harness: Harness) {
        let swapped = harness
            .store
            .replace(&SessionToken::generate(), identity("Ada"))
            .await
            .expect("replace");
        assert!(!swapped);
    }

    #[rstest]
    #[tokio::test]
    async fn destroy_is_idempotent(harness: Harness) {
        let token = harness.store.create(identity("Ada")).await.expect("create");

        harness.store.destroy(&token).await.expect("destroy");
        harness.store.destroy(&token).await.expect("destroy again");

        assert!(harness.store.get(&token).await.expect("get").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn destroying_a_users_sessions_spares_everyone_else(harness: Harness) {
        let ada = identity("Ada");
        let laptop = harness.store.create(ada.clone()).await.expect("create");
        let phone = harness.store.create(ada.clone()).await.expect("create");
        let bob = harness.store.create(identity("Bob")).await.expect("create");

        let removed = harness.store.destroy_for_user(&ada.id).await.expect("destroy");

        assert_eq!(removed, 2);
        assert!(harness.store.get(&laptop).await.expect("get").is_none());
        assert!(harness.store.get(&phone).await.expect("get").is_none());
        assert!(harness.store.get(&bob).await.expect("get").is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn purge_removes_only_stale_entries(harness: Harness) {
        harness.store.create(identity("Ada")).await.expect("create");
        harness.clock.advance(TimeDelta::minutes(30));
        let fresh = harness.store.create(identity("Bob")).await.expect("create");
        harness.clock.advance(TimeDelta::minutes(40));

        let removed = harness.store.purge_expired().await.expect("purge");

        assert_eq!(removed, 1);
        assert!(harness.store.get(&fresh).await.expect("get").is_some());
    }
}
