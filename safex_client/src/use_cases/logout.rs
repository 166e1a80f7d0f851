use tracing::{info, warn};

use crate::domain::entities::SessionState;
use crate::domain::errors::SessionError;
use crate::domain::ports::{AuthGateway, KeyValueStore};
use crate::use_cases::session::{PersistedSession, SessionHandle};

// Ends the session. The server call is best-effort; local keys are always
// removed.
pub struct LogoutUseCase<'a, G: ?Sized, S: ?Sized> {
    pub gateway: &'a G,
    pub store: &'a S,
    pub session: &'a SessionHandle,
}

impl<'a, G, S> LogoutUseCase<'a, G, S>
where
    G: AuthGateway + ?Sized,
    S: KeyValueStore + ?Sized,
{
    pub async fn execute(&self) -> Result<(), SessionError> {
        let persisted = PersistedSession::new(self.store);
        let has_token = persisted
            .access_token()
            .map_err(SessionError::Storage)?
            .is_some();

        if has_token {
            if let Err(err) = self.gateway.logout().await {
                warn!(error = %err, "server logout failed; clearing local session anyway");
            }
        }

        let cleared = persisted.clear().map_err(SessionError::Storage);
        self.session.set(SessionState::Unauthenticated);
        cleared?;
        info!("logged out");
        Ok(())
    }
}
