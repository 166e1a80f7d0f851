use tracing::{info, warn};

use crate::domain::contracts::LoginRequest;
use crate::domain::device::DeviceId;
use crate::domain::entities::User;
use crate::domain::errors::SessionError;
use crate::domain::ports::{AuthGateway, KeyValueStore};
use crate::domain::validation::validate_login;
use crate::use_cases::session::{SessionHandle, establish};

// Phone/password login bound to the caller's device id.
pub struct LoginUseCase<'a, G: ?Sized, S: ?Sized> {
    pub gateway: &'a G,
    pub store: &'a S,
    pub session: &'a SessionHandle,
}

impl<'a, G, S> LoginUseCase<'a, G, S>
where
    G: AuthGateway + ?Sized,
    S: KeyValueStore + ?Sized,
{
    pub async fn execute(
        &self,
        phone: &str,
        password: &str,
        device_id: &DeviceId,
    ) -> Result<User, SessionError> {
        validate_login(phone, password)?;

        let payload = self
            .gateway
            .login(LoginRequest {
                phone: phone.to_string(),
                password: password.to_string(),
                device_id: device_id.as_str().to_string(),
            })
            .await?;

        let Some((tokens, user)) = payload.into_session() else {
            warn!(phone, "login response missing access token or user");
            return Err(SessionError::InvalidLoginResponse);
        };

        let user = establish(self.store, self.session, &tokens, user)?;
        info!(phone, user = ?user.identifier(), "login succeeded");
        Ok(user)
    }
}
