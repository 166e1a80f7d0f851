use tracing::{info, warn};

use crate::domain::entities::{SessionState, User};
use crate::domain::errors::SessionError;
use crate::domain::ports::{AuthGateway, KeyValueStore};
use crate::use_cases::session::{PersistedSession, SessionHandle};

// Restores the session on process start. Without a stored token the session
// goes straight to Unauthenticated; with one, the profile is fetched and any
// failure is treated as expiry.
pub struct BootstrapSessionUseCase<'a, G: ?Sized, S: ?Sized> {
    pub gateway: &'a G,
    pub store: &'a S,
    pub session: &'a SessionHandle,
}

impl<'a, G, S> BootstrapSessionUseCase<'a, G, S>
where
    G: AuthGateway + ?Sized,
    S: KeyValueStore + ?Sized,
{
    pub async fn execute(&self) -> Result<Option<User>, SessionError> {
        let persisted = PersistedSession::new(self.store);
        let token = match persisted.access_token() {
            Ok(token) => token,
            Err(err) => {
                self.session.set(SessionState::Unauthenticated);
                return Err(SessionError::Storage(err));
            }
        };
        if token.is_none() {
            self.session.set(SessionState::Unauthenticated);
            return Ok(None);
        }

        self.session.set(SessionState::Loading);
        match self.gateway.fetch_profile().await {
            Ok(user) => {
                if let Err(err) = persisted.save_user(&user) {
                    warn!(error = %err, "failed to cache user profile");
                }
                info!(user = ?user.identifier(), "session restored");
                self.session.set(SessionState::Authenticated(user.clone()));
                Ok(Some(user))
            }
            Err(err) => {
                warn!(
                    error = %err,
                    unauthorized = err.is_unauthorized(),
                    "profile fetch failed during bootstrap; clearing session"
                );
                if let Err(err) = persisted.clear() {
                    warn!(error = %err, "failed to clear persisted session");
                }
                self.session.set(SessionState::Unauthenticated);
                Err(SessionError::SessionExpired)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ApiError;
    use crate::interface_adapters::storage::MemoryStore;
    use crate::use_cases::session::{ACCESS_TOKEN_KEY, DEVICE_ID_KEY, REFRESH_TOKEN_KEY, USER_KEY};
    use crate::use_cases::test_support::{FakeGateway, sample_user, upstream};

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.set(ACCESS_TOKEN_KEY, "access-1").unwrap();
        store.set(REFRESH_TOKEN_KEY, "refresh-1").unwrap();
        store.set(USER_KEY, "{\"name\":\"stale\"}").unwrap();
        store.set(DEVICE_ID_KEY, "abc123").unwrap();
        store
    }

    #[tokio::test]
    async fn when_no_token_is_stored_then_session_is_unauthenticated_without_a_request() {
        let gateway = FakeGateway::new();
        let store = MemoryStore::new();
        let session = SessionHandle::new();

        let result = BootstrapSessionUseCase {
            gateway: &gateway,
            store: &store,
            session: &session,
        }
        .execute()
        .await;

        assert!(matches!(result, Ok(None)));
        assert_eq!(session.current(), SessionState::Unauthenticated);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn when_profile_fetch_succeeds_then_user_is_cached_and_authenticated() {
        let user = sample_user();
        let gateway =
            FakeGateway::new().respond("fetch_profile", serde_json::to_value(&user).unwrap());
        let store = seeded_store();
        let session = SessionHandle::new();

        let restored = BootstrapSessionUseCase {
            gateway: &gateway,
            store: &store,
            session: &session,
        }
        .execute()
        .await
        .expect("expected bootstrap to succeed");

        assert_eq!(restored, Some(user.clone()));
        assert_eq!(session.user(), Some(user.clone()));
        assert_eq!(
            PersistedSession::new(&store).cached_user().unwrap(),
            Some(user)
        );
    }

    #[tokio::test]
    async fn when_profile_fetch_fails_then_every_session_key_is_cleared() {
        let gateway = FakeGateway::new().fail("fetch_profile", upstream(401, "jwt expired"));
        let store = seeded_store();
        let session = SessionHandle::new();

        let err = BootstrapSessionUseCase {
            gateway: &gateway,
            store: &store,
            session: &session,
        }
        .execute()
        .await
        .expect_err("expected bootstrap to fail");

        assert!(matches!(err, SessionError::SessionExpired));
        assert_eq!(err.to_string(), "Session expired. Please login again.");
        assert_eq!(session.current(), SessionState::Unauthenticated);
        let snapshot = store.snapshot();
        assert!(!snapshot.contains_key(ACCESS_TOKEN_KEY));
        assert!(!snapshot.contains_key(REFRESH_TOKEN_KEY));
        assert!(!snapshot.contains_key(USER_KEY));
        assert_eq!(snapshot.get(DEVICE_ID_KEY).map(String::as_str), Some("abc123"));
    }

    #[tokio::test]
    async fn when_network_is_down_then_bootstrap_still_expires_the_session() {
        let gateway = FakeGateway::new()
            .fail("fetch_profile", ApiError::Transport("connection refused".to_string()));
        let store = seeded_store();
        let session = SessionHandle::new();

        let result = BootstrapSessionUseCase {
            gateway: &gateway,
            store: &store,
            session: &session,
        }
        .execute()
        .await;

        assert!(matches!(result, Err(SessionError::SessionExpired)));
        assert!(!store.snapshot().contains_key(ACCESS_TOKEN_KEY));
    }
}
