use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::domain::contracts::{
    AuthPayload, ChangePasswordRequest, LoginRequest, ProfileUpdate, RechargeRequest,
    RegistrationRequest, ResetPasswordRequest, SendOtpRequest, VerifyOtpRequest,
    WithdrawRequest,
};
use crate::domain::entities::{
    BankDetails, Dashboard, InvestmentDetail, InvestmentPortfolio, Notification,
    PaymentSettings, Plan, ReferralSummary, Transaction, TransactionKind, User, Wallet,
};
use crate::domain::errors::ApiError;

// Port for the persisted key-value store that backs the session.
// Access is synchronous and never contended.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str) -> Result<(), String>;
    fn clear(&self) -> Result<(), String>;
}

// Port for local wall-clock time.
pub trait Clock: Send + Sync {
    fn now_local(&self) -> NaiveDateTime;
}

// Port for the rendering/display environment feeding the device fingerprint.
pub trait FingerprintSource: Send + Sync {
    // Serialized offscreen render; None when rendering is unavailable.
    fn canvas_data(&self) -> Option<String>;
    fn screen_resolution(&self) -> String;
    fn timezone(&self) -> String;
}

// Port for transient user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

// Authentication endpoints plus the profile fetch the session depends on.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn send_otp(&self, req: SendOtpRequest) -> Result<(), ApiError>;
    async fn verify_otp(&self, req: VerifyOtpRequest) -> Result<(), ApiError>;
    async fn register(&self, req: RegistrationRequest) -> Result<AuthPayload, ApiError>;
    async fn login(&self, req: LoginRequest) -> Result<AuthPayload, ApiError>;
    async fn reset_password(&self, req: ResetPasswordRequest) -> Result<(), ApiError>;
    async fn change_password(&self, req: ChangePasswordRequest) -> Result<(), ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
    async fn fetch_profile(&self) -> Result<User, ApiError>;
    async fn update_profile(&self, update: ProfileUpdate) -> Result<User, ApiError>;
}

// Wallet, bank, transaction, investment, plan, and referral endpoints.
#[async_trait]
pub trait AccountGateway: Send + Sync {
    async fn wallet(&self) -> Result<Wallet, ApiError>;
    async fn dashboard(&self) -> Result<Dashboard, ApiError>;
    async fn daily_check_in(&self) -> Result<(), ApiError>;
    async fn payment_settings(&self) -> Result<PaymentSettings, ApiError>;
    async fn referral_summary(&self) -> Result<ReferralSummary, ApiError>;
    async fn bank_details(&self) -> Result<Option<BankDetails>, ApiError>;
    async fn save_bank_details(&self, details: BankDetails) -> Result<(), ApiError>;
    async fn transactions(
        &self,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<Transaction>, ApiError>;
    async fn transaction(&self, id: &str) -> Result<Transaction, ApiError>;
    async fn recharge(&self, req: RechargeRequest) -> Result<(), ApiError>;
    async fn withdraw(&self, req: WithdrawRequest) -> Result<(), ApiError>;
    async fn investments(&self) -> Result<InvestmentPortfolio, ApiError>;
    async fn buy_investment(&self, plan_id: &str) -> Result<(), ApiError>;
    async fn investment(&self, id: &str) -> Result<InvestmentDetail, ApiError>;
    async fn plans(&self) -> Result<Vec<Plan>, ApiError>;
    async fn plan(&self, id: &str) -> Result<Option<Plan>, ApiError>;
}
