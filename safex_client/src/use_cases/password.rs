use tracing::info;

use crate::domain::contracts::{ChangePasswordRequest, ResetPasswordRequest};
use crate::domain::errors::SessionError;
use crate::domain::ports::AuthGateway;
use crate::domain::validation::{ChangePasswordForm, ResetPasswordForm};

// OTP-backed password reset for signed-out users.
pub struct ResetPasswordUseCase<'a, G: ?Sized> {
    pub gateway: &'a G,
}

impl<'a, G> ResetPasswordUseCase<'a, G>
where
    G: AuthGateway + ?Sized,
{
    pub async fn execute(&self, form: &ResetPasswordForm) -> Result<(), SessionError> {
        form.validate()?;
        self.gateway
            .reset_password(ResetPasswordRequest {
                phone: form.phone.clone(),
                otp: form.otp.clone(),
                new_password: form.new_password.clone(),
            })
            .await?;
        info!(phone = %form.phone, "password reset");
        Ok(())
    }
}

pub struct ChangePasswordUseCase<'a, G: ?Sized> {
    pub gateway: &'a G,
}

impl<'a, G> ChangePasswordUseCase<'a, G>
where
    G: AuthGateway + ?Sized,
{
    pub async fn execute(&self, form: &ChangePasswordForm) -> Result<(), SessionError> {
        form.validate()?;
        self.gateway
            .change_password(ChangePasswordRequest {
                current_password: form.current_password.clone(),
                new_password: form.new_password.clone(),
            })
            .await?;
        info!("password changed");
        Ok(())
    }
}
