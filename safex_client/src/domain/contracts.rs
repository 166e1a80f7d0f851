use serde::{Deserialize, Serialize};

use crate::domain::entities::{AuthTokens, User};

// Request bodies, serialized as-is onto the wire.

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
    pub device_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    ForgotPassword,
}

#[derive(Clone, Debug, Serialize)]
pub struct SendOtpRequest {
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<OtpPurpose>,
}

// Registration completes through the OTP verification endpoint.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub name: String,
    pub phone: String,
    pub password: String,
    pub referral_code: Option<String>,
    pub device_id: String,
    pub otp: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct VerifyOtpRequest {
    pub otp: String,
    pub phone: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub phone: String,
    pub otp: String,
    pub new_password: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

// Token-bearing payload returned by login and registration. Every field is
// optional on the wire; the session use cases decide what is acceptable.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

impl AuthPayload {
    // Both an access token and a user are required for a usable session.
    pub fn into_session(self) -> Option<(AuthTokens, User)> {
        let access_token = self.access_token.filter(|token| !token.is_empty())?;
        let user = self.user?;
        let refresh_token = self.refresh_token.filter(|token| !token.is_empty());
        Some((
            AuthTokens {
                access_token,
                refresh_token,
            },
            user,
        ))
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RechargeRequest {
    pub amount: f64,
    pub payer_name: String,
    pub utr: String,
    pub payment_method: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    pub amount: f64,
    pub fee_amount: f64,
    pub net_amount: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyInvestmentRequest {
    pub plan_id: String,
}
