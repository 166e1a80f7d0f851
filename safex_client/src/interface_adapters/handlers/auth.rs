use crate::domain::contracts::ProfileUpdate;
use crate::domain::device::DeviceId;
use crate::domain::entities::User;
use crate::domain::errors::SessionError;
use crate::domain::validation::{ChangePasswordForm, RegistrationForm, ResetPasswordForm};
use crate::interface_adapters::handlers::{notify_error, notify_success, report};
use crate::interface_adapters::state::AppState;
use crate::use_cases::bootstrap::BootstrapSessionUseCase;
use crate::use_cases::device_identity::DeviceIdentityUseCase;
use crate::use_cases::login::LoginUseCase;
use crate::use_cases::logout::LogoutUseCase;
use crate::use_cases::otp::{ForgotPasswordUseCase, SendRegistrationOtpUseCase, VerifyOtpUseCase};
use crate::use_cases::password::{ChangePasswordUseCase, ResetPasswordUseCase};
use crate::use_cases::profile::{RefreshProfileUseCase, UpdateProfileUseCase};
use crate::use_cases::register::RegisterUseCase;

pub fn device_id(state: &AppState) -> DeviceId {
    DeviceIdentityUseCase {
        store: state.store.as_ref(),
        fingerprint: state.fingerprint.as_ref(),
    }
    .execute()
}

#[tracing::instrument(name = "bootstrap", skip_all)]
pub async fn bootstrap(state: &AppState) -> Result<Option<User>, SessionError> {
    let result = BootstrapSessionUseCase {
        gateway: state.auth.as_ref(),
        store: state.store.as_ref(),
        session: &state.session,
    }
    .execute()
    .await;
    if let Err(err) = &result {
        notify_error(state, err.to_string());
    }
    result
}

#[tracing::instrument(name = "login", skip_all, fields(phone = %phone))]
pub async fn login(state: &AppState, phone: &str, password: &str) -> Result<User, SessionError> {
    let device_id = device_id(state);
    let result = LoginUseCase {
        gateway: state.auth.as_ref(),
        store: state.store.as_ref(),
        session: &state.session,
    }
    .execute(phone, password, &device_id)
    .await;
    report(state, &result, "Login successful!", "Login failed");
    result
}

#[tracing::instrument(name = "send_registration_otp", skip_all, fields(phone = %form.phone))]
pub async fn send_registration_otp(
    state: &AppState,
    form: &RegistrationForm,
) -> Result<(), SessionError> {
    let result = SendRegistrationOtpUseCase {
        gateway: state.auth.as_ref(),
    }
    .execute(form)
    .await;
    report(
        state,
        &result,
        "OTP sent to your mobile number",
        "Failed to send OTP",
    );
    result
}

#[tracing::instrument(name = "register", skip_all, fields(phone = %form.phone))]
pub async fn register(
    state: &AppState,
    form: &RegistrationForm,
    otp: &str,
) -> Result<User, SessionError> {
    let device_id = device_id(state);
    let result = RegisterUseCase {
        gateway: state.auth.as_ref(),
        store: state.store.as_ref(),
        session: &state.session,
    }
    .execute(form, otp, &device_id)
    .await;
    report(
        state,
        &result,
        "Registration completed successfully!",
        "Registration failed",
    );
    result
}

#[tracing::instrument(name = "verify_otp", skip_all, fields(phone = %phone))]
pub async fn verify_otp(state: &AppState, otp: &str, phone: &str) -> Result<(), SessionError> {
    let result = VerifyOtpUseCase {
        gateway: state.auth.as_ref(),
    }
    .execute(otp, phone)
    .await;
    report(
        state,
        &result,
        "OTP verified successfully!",
        "OTP verification failed",
    );
    result
}

#[tracing::instrument(name = "forgot_password", skip_all, fields(phone = %phone))]
pub async fn forgot_password(state: &AppState, phone: &str) -> Result<(), SessionError> {
    let result = ForgotPasswordUseCase {
        gateway: state.auth.as_ref(),
    }
    .execute(phone)
    .await;
    report(state, &result, "OTP sent to your phone!", "Failed to send OTP");
    result
}

#[tracing::instrument(name = "reset_password", skip_all, fields(phone = %form.phone))]
pub async fn reset_password(state: &AppState, form: &ResetPasswordForm) -> Result<(), SessionError> {
    let result = ResetPasswordUseCase {
        gateway: state.auth.as_ref(),
    }
    .execute(form)
    .await;
    report(
        state,
        &result,
        "Password reset successful!",
        "Password reset failed",
    );
    result
}

#[tracing::instrument(name = "change_password", skip_all)]
pub async fn change_password(
    state: &AppState,
    form: &ChangePasswordForm,
) -> Result<(), SessionError> {
    let result = ChangePasswordUseCase {
        gateway: state.auth.as_ref(),
    }
    .execute(form)
    .await;
    report(
        state,
        &result,
        "Password changed successfully!",
        "Failed to change password",
    );
    result
}

#[tracing::instrument(name = "logout", skip_all)]
pub async fn logout(state: &AppState) -> Result<(), SessionError> {
    let result = LogoutUseCase {
        gateway: state.auth.as_ref(),
        store: state.store.as_ref(),
        session: &state.session,
    }
    .execute()
    .await;
    if result.is_ok() {
        notify_success(state, "Logged out successfully");
    }
    result
}

// Silent refresh; failures are only logged.
pub async fn refresh_user(state: &AppState) -> Result<Option<User>, SessionError> {
    RefreshProfileUseCase {
        gateway: state.auth.as_ref(),
        store: state.store.as_ref(),
        session: &state.session,
    }
    .execute()
    .await
}

#[tracing::instrument(name = "update_profile", skip_all)]
pub async fn update_profile(state: &AppState, update: ProfileUpdate) -> Result<User, SessionError> {
    let result = UpdateProfileUseCase {
        gateway: state.auth.as_ref(),
        store: state.store.as_ref(),
        session: &state.session,
    }
    .execute(update)
    .await;
    report(
        state,
        &result,
        "Profile updated successfully!",
        "Failed to update profile",
    );
    result
}
