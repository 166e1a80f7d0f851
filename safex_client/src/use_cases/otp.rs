use tracing::info;

use crate::domain::contracts::{OtpPurpose, SendOtpRequest, VerifyOtpRequest};
use crate::domain::errors::{SessionError, ValidationErrors};
use crate::domain::ports::AuthGateway;
use crate::domain::validation::{
    OTP_MESSAGE, PHONE_MESSAGE, RegistrationForm, validate_otp, validate_phone,
    validate_phone_field,
};

// First registration step: the whole form is checked before an OTP is sent.
pub struct SendRegistrationOtpUseCase<'a, G: ?Sized> {
    pub gateway: &'a G,
}

impl<'a, G> SendRegistrationOtpUseCase<'a, G>
where
    G: AuthGateway + ?Sized,
{
    pub async fn execute(&self, form: &RegistrationForm) -> Result<(), SessionError> {
        form.validate()?;
        self.gateway
            .send_otp(SendOtpRequest {
                phone: form.phone.clone(),
                purpose: None,
            })
            .await?;
        info!(phone = %form.phone, "registration otp requested");
        Ok(())
    }
}

// Plain OTP check; the session is not touched.
pub struct VerifyOtpUseCase<'a, G: ?Sized> {
    pub gateway: &'a G,
}

impl<'a, G> VerifyOtpUseCase<'a, G>
where
    G: AuthGateway + ?Sized,
{
    pub async fn execute(&self, otp: &str, phone: &str) -> Result<(), SessionError> {
        let mut errors = ValidationErrors::new();
        if !validate_otp(otp) {
            errors.add("otp", OTP_MESSAGE);
        }
        if !validate_phone(phone) {
            errors.add("phone", PHONE_MESSAGE);
        }
        errors.into_result()?;

        self.gateway
            .verify_otp(VerifyOtpRequest {
                otp: otp.to_string(),
                phone: phone.to_string(),
            })
            .await?;
        info!(phone, "otp verified");
        Ok(())
    }
}

pub struct ForgotPasswordUseCase<'a, G: ?Sized> {
    pub gateway: &'a G,
}

impl<'a, G> ForgotPasswordUseCase<'a, G>
where
    G: AuthGateway + ?Sized,
{
    pub async fn execute(&self, phone: &str) -> Result<(), SessionError> {
        validate_phone_field(phone)?;
        self.gateway
            .send_otp(SendOtpRequest {
                phone: phone.to_string(),
                purpose: Some(OtpPurpose::ForgotPassword),
            })
            .await?;
        info!(phone, "password reset otp requested");
        Ok(())
    }
}
