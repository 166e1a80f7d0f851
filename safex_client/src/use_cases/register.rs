use tracing::{info, warn};

use crate::domain::contracts::RegistrationRequest;
use crate::domain::device::DeviceId;
use crate::domain::entities::User;
use crate::domain::errors::SessionError;
use crate::domain::ports::{AuthGateway, KeyValueStore};
use crate::domain::validation::{RegistrationForm, validate_otp_field};
use crate::use_cases::session::{SessionHandle, establish};

// Completes registration by submitting the form together with the OTP the
// user received. A successful response logs the user in.
pub struct RegisterUseCase<'a, G: ?Sized, S: ?Sized> {
    pub gateway: &'a G,
    pub store: &'a S,
    pub session: &'a SessionHandle,
}

impl<'a, G, S> RegisterUseCase<'a, G, S>
where
    G: AuthGateway + ?Sized,
    S: KeyValueStore + ?Sized,
{
    pub async fn execute(
        &self,
        form: &RegistrationForm,
        otp: &str,
        device_id: &DeviceId,
    ) -> Result<User, SessionError> {
        form.validate()?;
        validate_otp_field(otp)?;

        let payload = self
            .gateway
            .register(RegistrationRequest {
                name: form.name.trim().to_string(),
                phone: form.phone.clone(),
                password: form.password.clone(),
                referral_code: form.referral_code(),
                device_id: device_id.as_str().to_string(),
                otp: otp.to_string(),
            })
            .await?;

        let Some((tokens, user)) = payload.into_session() else {
            warn!(phone = %form.phone, "registration response missing access token or user");
            return Err(SessionError::InvalidRegistrationResponse);
        };

        let user = establish(self.store, self.session, &tokens, user)?;
        info!(phone = %form.phone, user = ?user.identifier(), "registration completed");
        Ok(user)
    }
}
