use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::entities::{AuthTokens, SessionState, User};
use crate::domain::errors::SessionError;
use crate::domain::ports::KeyValueStore;

// Persisted keys shared with the storage adapter.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";
pub const DEVICE_ID_KEY: &str = "deviceId";

const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY];

// Reactive session holder owned by the application root. Views subscribe to
// changes; only the session use cases write to it.
#[derive(Clone)]
pub struct SessionHandle {
    tx: Arc<watch::Sender<SessionState>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::starting_in(SessionState::Unauthenticated)
    }

    // Loading while a stored token awaits bootstrap, so route guards wait
    // instead of redirecting to login.
    pub fn for_store<S>(store: &S) -> Self
    where
        S: KeyValueStore + ?Sized,
    {
        match PersistedSession::new(store).access_token() {
            Ok(Some(_)) => Self::starting_in(SessionState::Loading),
            _ => Self::new(),
        }
    }

    fn starting_in(state: SessionState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.tx.borrow().user().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    pub(crate) fn set(&self, state: SessionState) {
        self.tx.send_replace(state);
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

// Typed view over the session keys in the key-value store.
pub struct PersistedSession<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> PersistedSession<'a, S>
where
    S: KeyValueStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    // Empty strings count as absent.
    pub fn access_token(&self) -> Result<Option<String>, String> {
        Ok(self
            .store
            .get(ACCESS_TOKEN_KEY)?
            .filter(|token| !token.is_empty()))
    }

    pub fn refresh_token(&self) -> Result<Option<String>, String> {
        Ok(self
            .store
            .get(REFRESH_TOKEN_KEY)?
            .filter(|token| !token.is_empty()))
    }

    // The token is written before the user so a cached user never exists
    // without one.
    pub fn save(&self, tokens: &AuthTokens, user: &User) -> Result<(), String> {
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        match &tokens.refresh_token {
            Some(refresh) => self.store.set(REFRESH_TOKEN_KEY, refresh)?,
            None => self.store.remove(REFRESH_TOKEN_KEY)?,
        }
        self.save_user(user)
    }

    pub fn save_user(&self, user: &User) -> Result<(), String> {
        let json = serde_json::to_string(user).map_err(|err| err.to_string())?;
        self.store.set(USER_KEY, &json)
    }

    // Unreadable cache entries are treated as missing.
    pub fn cached_user(&self) -> Result<Option<User>, String> {
        Ok(self
            .store
            .get(USER_KEY)?
            .and_then(|json| serde_json::from_str(&json).ok()))
    }

    // Removes every session key; the device id is left in place.
    pub fn clear(&self) -> Result<(), String> {
        for key in SESSION_KEYS {
            self.store.remove(key)?;
        }
        Ok(())
    }
}

// Persists a freshly issued session and publishes it.
pub(crate) fn establish<S>(
    store: &S,
    handle: &SessionHandle,
    tokens: &AuthTokens,
    user: User,
) -> Result<User, SessionError>
where
    S: KeyValueStore + ?Sized,
{
    PersistedSession::new(store)
        .save(tokens, &user)
        .map_err(SessionError::Storage)?;
    handle.set(SessionState::Authenticated(user.clone()));
    Ok(user)
}
