use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

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
use crate::domain::ports::{AccountGateway, AuthGateway, Clock, FingerprintSource, Notifier};

pub(crate) fn sample_user() -> User {
    serde_json::from_value(json!({
        "id": "u-1",
        "name": "Asha",
        "phone": "9876543210",
        "uid": "100200",
        "referralCode": "ASHA01",
        "wallet": { "balance": 1200, "totalEarnings": "80.5" }
    }))
    .expect("sample user should deserialize")
}

pub(crate) fn login_payload() -> Value {
    json!({
        "accessToken": "access-1",
        "refreshToken": "refresh-1",
        "user": serde_json::to_value(sample_user()).expect("sample user should serialize"),
    })
}

pub(crate) fn local_time(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .expect("valid test timestamp")
}

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) NaiveDateTime);

impl Clock for FixedClock {
    fn now_local(&self) -> NaiveDateTime {
        self.0
    }
}

pub(crate) struct FixedFingerprint;

impl FingerprintSource for FixedFingerprint {
    fn canvas_data(&self) -> Option<String> {
        Some("data:image/png;base64,AAAA".to_string())
    }

    fn screen_resolution(&self) -> String {
        "1920x1080".to_string()
    }

    fn timezone(&self) -> String {
        "Asia/Kolkata".to_string()
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(crate) fn messages(&self) -> Vec<Notification> {
        self.seen.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
    }
}

// Scripted gateway for both ports. Each operation answers with the JSON
// scripted under its name; unscripted operations fail with a transport error.
#[derive(Default)]
pub(crate) struct FakeGateway {
    responses: Mutex<HashMap<&'static str, Result<Value, ApiError>>>,
    calls: Mutex<Vec<(&'static str, Value)>>,
}

impl FakeGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, operation: &'static str, value: Value) -> Self {
        self.responses
            .lock()
            .expect("responses mutex poisoned")
            .insert(operation, Ok(value));
        self
    }

    pub(crate) fn fail(self, operation: &'static str, err: ApiError) -> Self {
        self.responses
            .lock()
            .expect("responses mutex poisoned")
            .insert(operation, Err(err));
        self
    }

    pub(crate) fn calls(&self) -> Vec<(&'static str, Value)> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub(crate) fn called(&self, operation: &str) -> bool {
        self.calls().iter().any(|(name, _)| *name == operation)
    }

    pub(crate) fn body_of(&self, operation: &str) -> Option<Value> {
        self.calls()
            .into_iter()
            .find(|(name, _)| *name == operation)
            .map(|(_, body)| body)
    }

    fn record(&self, operation: &'static str, body: Value) -> Result<Value, ApiError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push((operation, body));
        self.responses
            .lock()
            .expect("responses mutex poisoned")
            .get(operation)
            .cloned()
            .unwrap_or_else(|| Err(ApiError::Transport(format!("{operation} not scripted"))))
    }

    fn answer<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        body: Value,
    ) -> Result<T, ApiError> {
        let value = self.record(operation, body)?;
        serde_json::from_value(value).map_err(|err| ApiError::Decode(err.to_string()))
    }

    fn ack(&self, operation: &'static str, body: Value) -> Result<(), ApiError> {
        self.record(operation, body).map(|_| ())
    }
}

fn body<T: serde::Serialize>(req: &T) -> Value {
    serde_json::to_value(req).expect("request should serialize")
}

#[async_trait]
impl AuthGateway for FakeGateway {
    async fn send_otp(&self, req: SendOtpRequest) -> Result<(), ApiError> {
        self.ack("send_otp", body(&req))
    }

    async fn verify_otp(&self, req: VerifyOtpRequest) -> Result<(), ApiError> {
        self.ack("verify_otp", body(&req))
    }

    async fn register(&self, req: RegistrationRequest) -> Result<AuthPayload, ApiError> {
        self.answer("register", body(&req))
    }

    async fn login(&self, req: LoginRequest) -> Result<AuthPayload, ApiError> {
        self.answer("login", body(&req))
    }

    async fn reset_password(&self, req: ResetPasswordRequest) -> Result<(), ApiError> {
        self.ack("reset_password", body(&req))
    }

    async fn change_password(&self, req: ChangePasswordRequest) -> Result<(), ApiError> {
        self.ack("change_password", body(&req))
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.ack("logout", Value::Null)
    }

    async fn fetch_profile(&self) -> Result<User, ApiError> {
        self.answer("fetch_profile", Value::Null)
    }

    async fn update_profile(&self, update: ProfileUpdate) -> Result<User, ApiError> {
        self.answer("update_profile", body(&update))
    }
}

#[async_trait]
impl AccountGateway for FakeGateway {
    async fn wallet(&self) -> Result<Wallet, ApiError> {
        self.answer("wallet", Value::Null)
    }

    async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        self.answer("dashboard", Value::Null)
    }

    async fn daily_check_in(&self) -> Result<(), ApiError> {
        self.ack("daily_check_in", Value::Null)
    }

    async fn payment_settings(&self) -> Result<PaymentSettings, ApiError> {
        self.answer("payment_settings", Value::Null)
    }

    async fn referral_summary(&self) -> Result<ReferralSummary, ApiError> {
        self.answer("referral_summary", Value::Null)
    }

    async fn bank_details(&self) -> Result<Option<BankDetails>, ApiError> {
        self.answer("bank_details", Value::Null)
    }

    async fn save_bank_details(&self, details: BankDetails) -> Result<(), ApiError> {
        self.ack("save_bank_details", body(&details))
    }

    async fn transactions(
        &self,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.answer("transactions", json!(kind.map(|k| k.as_str())))
    }

    async fn transaction(&self, id: &str) -> Result<Transaction, ApiError> {
        self.answer("transaction", json!(id))
    }

    async fn recharge(&self, req: RechargeRequest) -> Result<(), ApiError> {
        self.ack("recharge", body(&req))
    }

    async fn withdraw(&self, req: WithdrawRequest) -> Result<(), ApiError> {
        self.ack("withdraw", body(&req))
    }

    async fn investments(&self) -> Result<InvestmentPortfolio, ApiError> {
        self.answer("investments", Value::Null)
    }

    async fn buy_investment(&self, plan_id: &str) -> Result<(), ApiError> {
        self.ack("buy_investment", json!(plan_id))
    }

    async fn investment(&self, id: &str) -> Result<InvestmentDetail, ApiError> {
        self.answer("investment", json!(id))
    }

    async fn plans(&self) -> Result<Vec<Plan>, ApiError> {
        // Plan is not deserializable; tests script plans through `plan_fixture`.
        self.record("plans", Value::Null)?;
        Ok(vec![plan_fixture()])
    }

    async fn plan(&self, id: &str) -> Result<Option<Plan>, ApiError> {
        let value = self.record("plan", json!(id))?;
        Ok((!value.is_null()).then(plan_fixture))
    }
}

pub(crate) fn plan_fixture() -> Plan {
    Plan {
        id: "plan-1".to_string(),
        name: "Starter".to_string(),
        image: "https://via.placeholder.com/150".to_string(),
        price: 1000.0,
        daily_income: 50.0,
        days: 30,
        total_return: 1500.0,
        is_active: true,
        description: None,
    }
}

pub(crate) fn upstream(status: u16, message: &str) -> ApiError {
    ApiError::Upstream {
        status,
        message: message.to_string(),
    }
}
