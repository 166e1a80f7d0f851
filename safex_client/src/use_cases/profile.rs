use tracing::{debug, warn};

use crate::domain::contracts::ProfileUpdate;
use crate::domain::entities::{SessionState, User};
use crate::domain::errors::SessionError;
use crate::domain::ports::{AuthGateway, KeyValueStore};
use crate::use_cases::session::{PersistedSession, SessionHandle};

// Explicit profile refresh. Unlike bootstrap, a failed fetch is only logged
// and the current session is kept.
pub struct RefreshProfileUseCase<'a, G: ?Sized, S: ?Sized> {
    pub gateway: &'a G,
    pub store: &'a S,
    pub session: &'a SessionHandle,
}

impl<'a, G, S> RefreshProfileUseCase<'a, G, S>
where
    G: AuthGateway + ?Sized,
    S: KeyValueStore + ?Sized,
{
    pub async fn execute(&self) -> Result<Option<User>, SessionError> {
        let persisted = PersistedSession::new(self.store);
        if persisted
            .access_token()
            .map_err(SessionError::Storage)?
            .is_none()
        {
            debug!("no access token; skipping profile refresh");
            return Ok(None);
        }

        match self.gateway.fetch_profile().await {
            Ok(user) => {
                persisted.save_user(&user).map_err(SessionError::Storage)?;
                self.session.set(SessionState::Authenticated(user.clone()));
                Ok(Some(user))
            }
            Err(err) => {
                warn!(error = %err, "failed to refresh user");
                Ok(None)
            }
        }
    }
}

// Name/avatar edit; the returned profile replaces the cached one.
pub struct UpdateProfileUseCase<'a, G: ?Sized, S: ?Sized> {
    pub gateway: &'a G,
    pub store: &'a S,
    pub session: &'a SessionHandle,
}

impl<'a, G, S> UpdateProfileUseCase<'a, G, S>
where
    G: AuthGateway + ?Sized,
    S: KeyValueStore + ?Sized,
{
    pub async fn execute(&self, update: ProfileUpdate) -> Result<User, SessionError> {
        let user = self.gateway.update_profile(update).await?;
        PersistedSession::new(self.store)
            .save_user(&user)
            .map_err(SessionError::Storage)?;
        self.session.set(SessionState::Authenticated(user.clone()));
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface_adapters::storage::MemoryStore;
    use crate::use_cases::session::ACCESS_TOKEN_KEY;
    use crate::use_cases::test_support::{FakeGateway, sample_user, upstream};
    use serde_json::json;

    #[tokio::test]
    async fn when_refresh_fails_then_session_and_storage_are_kept() {
        let gateway = FakeGateway::new().fail("fetch_profile", upstream(401, "jwt expired"));
        let store = MemoryStore::new();
        store.set(ACCESS_TOKEN_KEY, "access-1").unwrap();
        let session = SessionHandle::new();
        session.set(SessionState::Authenticated(sample_user()));

        let refreshed = RefreshProfileUseCase {
            gateway: &gateway,
            store: &store,
            session: &session,
        }
        .execute()
        .await
        .expect("expected refresh failure to be swallowed");

        assert_eq!(refreshed, None);
        assert_eq!(session.user(), Some(sample_user()));
        assert!(store.snapshot().contains_key(ACCESS_TOKEN_KEY));
    }

    #[tokio::test]
    async fn when_refresh_succeeds_then_cached_user_is_overwritten() {
        let mut updated = sample_user();
        updated.name = "Asha K".to_string();
        let gateway = FakeGateway::new()
            .respond("fetch_profile", serde_json::to_value(&updated).unwrap());
        let store = MemoryStore::new();
        store.set(ACCESS_TOKEN_KEY, "access-1").unwrap();
        let session = SessionHandle::new();
        session.set(SessionState::Authenticated(sample_user()));

        RefreshProfileUseCase {
            gateway: &gateway,
            store: &store,
            session: &session,
        }
        .execute()
        .await
        .unwrap();

        assert_eq!(session.user().map(|u| u.name), Some("Asha K".to_string()));
        assert_eq!(
            PersistedSession::new(&store).cached_user().unwrap(),
            Some(updated)
        );
    }

    #[tokio::test]
    async fn when_no_token_is_stored_then_refresh_is_skipped() {
        let gateway = FakeGateway::new();
        let store = MemoryStore::new();
        let session = SessionHandle::new();

        let refreshed = RefreshProfileUseCase {
            gateway: &gateway,
            store: &store,
            session: &session,
        }
        .execute()
        .await
        .unwrap();

        assert_eq!(refreshed, None);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn when_profile_is_updated_then_only_given_fields_are_sent() {
        let mut updated = sample_user();
        updated.name = "New Name".to_string();
        let gateway = FakeGateway::new()
            .respond("update_profile", serde_json::to_value(&updated).unwrap());
        let store = MemoryStore::new();
        let session = SessionHandle::new();

        let user = UpdateProfileUseCase {
            gateway: &gateway,
            store: &store,
            session: &session,
        }
        .execute(ProfileUpdate {
            name: Some("New Name".to_string()),
            avatar: None,
        })
        .await
        .expect("expected update to succeed");

        assert_eq!(user.name, "New Name");
        assert_eq!(gateway.body_of("update_profile"), Some(json!({"name": "New Name"})));
        assert_eq!(session.user(), Some(updated));
    }
}
