use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::{Url, form_urlencoded};

use crate::domain::contracts::{
    AuthPayload, BuyInvestmentRequest, ChangePasswordRequest, LoginRequest, ProfileUpdate,
    RechargeRequest, RegistrationRequest, ResetPasswordRequest, SendOtpRequest,
    VerifyOtpRequest, WithdrawRequest,
};
use crate::domain::entities::{
    BankDetails, Dashboard, InvestmentDetail, InvestmentPortfolio, PaymentSettings, Plan,
    ReferralSummary, Transaction, TransactionKind, User, Wallet,
};
use crate::domain::errors::ApiError;
use crate::domain::ports::{AccountGateway, AuthGateway, KeyValueStore};
use crate::interface_adapters::protocol;
use crate::use_cases::session::PersistedSession;

type SharedResponse = Shared<BoxFuture<'static, Result<Value, ApiError>>>;

struct InFlight {
    generation: u64,
    response: SharedResponse,
}

// Thin reqwest client for the SafeXExpress REST API. Every call carries the
// stored bearer token, is tied to this client's cancellation scope, and has
// its `data` envelope unwrapped before decoding. Identical GETs that overlap
// share one network call.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<dyn KeyValueStore>,
    cancel: CancellationToken,
    in_flight: Arc<Mutex<HashMap<String, InFlight>>>,
    generations: Arc<AtomicU64>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().build()?;
        Ok(Self::with_http(http, base_url, store))
    }

    pub fn with_http(
        http: Client,
        base_url: impl Into<String>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            store,
            cancel: CancellationToken::new(),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            generations: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // Child client whose calls are cancelled with the returned scope (or with
    // any ancestor scope). Coalescing is shared with the parent.
    pub fn scoped(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            ..self.clone()
        }
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    // Fails every outstanding and future call of this scope with `Cancelled`.
    pub fn cancel_all(&self) {
        self.cancel.cancel();
    }

    fn access_token(&self) -> Option<String> {
        PersistedSession::new(self.store.as_ref())
            .access_token()
            .unwrap_or_else(|err| {
                warn!(error = %err, "failed to read access token; sending anonymously");
                None
            })
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self
            .http
            .request(method, url)
            .header(CACHE_CONTROL, "no-cache");
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn cancellable<F>(&self, path: &str, call: F) -> Result<Value, ApiError>
    where
        F: Future<Output = Result<Value, ApiError>>,
    {
        if self.cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!(endpoint = path, "request cancelled");
                Err(ApiError::Cancelled)
            }
            outcome = call => outcome,
        }
    }

    // Non-GET calls are never coalesced.
    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let token = self.access_token();
        let mut request = self.request(method.clone(), path, token.as_deref());
        if let Some(body) = body {
            request = request.json(body);
        }
        debug!(%method, endpoint = path, "api request");
        self.cancellable(path, dispatch(request, path.to_string()))
            .await
    }

    async fn post<B>(&self, path: &str, body: &B) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn post_empty(&self, path: &str) -> Result<Value, ApiError> {
        self.send::<()>(Method::POST, path, None).await
    }

    // GETs for the same path and bearer token join any call already in flight.
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        let token = self.access_token();
        let key = format!("{path}#{}", token.as_deref().unwrap_or_default());

        let (generation, response) = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            match in_flight.get(&key) {
                Some(entry) => {
                    debug!(endpoint = path, "joining in-flight request");
                    (entry.generation, entry.response.clone())
                }
                None => {
                    let generation = self.generations.fetch_add(1, Ordering::Relaxed);
                    let request = self.request(Method::GET, path, token.as_deref());
                    debug!(method = "GET", endpoint = path, "api request");
                    let response = dispatch(request, path.to_string()).boxed().shared();
                    in_flight.insert(
                        key.clone(),
                        InFlight {
                            generation,
                            response: response.clone(),
                        },
                    );
                    (generation, response)
                }
            }
        };

        let outcome = self.cancellable(path, response).await;
        self.forget(&key, generation);
        outcome
    }

    // Later callers start a fresh request once this one has settled.
    fn forget(&self, key: &str, generation: u64) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if in_flight
            .get(key)
            .is_some_and(|entry| entry.generation == generation)
        {
            in_flight.remove(key);
        }
    }
}

// Single attempt: no retries, no timeout. Unparseable bodies read as `{}`.
async fn dispatch(request: RequestBuilder, endpoint: String) -> Result<Value, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    let body: Value =
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Map::new()));

    if !status.is_success() {
        let message = protocol::error_message(&body);
        warn!(endpoint, status = status.as_u16(), %message, "api request failed");
        return Err(ApiError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    Ok(protocol::unwrap_envelope(body))
}

static SEGMENT_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://localhost/").expect("valid segment base"));

// `/{collection}/{id}` with the id percent-encoded as a single path segment.
fn resource_path(collection: &str, id: &str) -> String {
    let mut url = SEGMENT_BASE.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(collection).push(id);
    }
    url.path().to_string()
}

fn transactions_path(kind: Option<TransactionKind>) -> String {
    match kind {
        Some(kind) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("type", kind.as_str())
                .finish();
            format!("/transactions?{query}")
        }
        None => "/transactions".to_string(),
    }
}

#[async_trait]
impl AuthGateway for ApiClient {
    async fn send_otp(&self, req: SendOtpRequest) -> Result<(), ApiError> {
        self.post("/auth/send-otp", &req).await.map(|_| ())
    }

    async fn verify_otp(&self, req: VerifyOtpRequest) -> Result<(), ApiError> {
        self.post("/auth/verify-otp", &req).await.map(|_| ())
    }

    // Registration is completed by the OTP verification endpoint.
    async fn register(&self, req: RegistrationRequest) -> Result<AuthPayload, ApiError> {
        protocol::auth_payload(self.post("/auth/verify-otp", &req).await?)
    }

    async fn login(&self, req: LoginRequest) -> Result<AuthPayload, ApiError> {
        protocol::auth_payload(self.post("/auth/login", &req).await?)
    }

    async fn reset_password(&self, req: ResetPasswordRequest) -> Result<(), ApiError> {
        self.post("/auth/reset-password", &req).await.map(|_| ())
    }

    async fn change_password(&self, req: ChangePasswordRequest) -> Result<(), ApiError> {
        self.post("/auth/change-password", &req).await.map(|_| ())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.post_empty("/auth/logout").await.map(|_| ())
    }

    async fn fetch_profile(&self) -> Result<User, ApiError> {
        protocol::profile(self.get("/users/profile").await?)
    }

    async fn update_profile(&self, update: ProfileUpdate) -> Result<User, ApiError> {
        protocol::profile(
            self.send(Method::PUT, "/users/profile", Some(&update))
                .await?,
        )
    }
}

#[async_trait]
impl AccountGateway for ApiClient {
    async fn wallet(&self) -> Result<Wallet, ApiError> {
        protocol::wallet(self.get("/users/wallet").await?)
    }

    async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        Ok(Dashboard(self.get("/users/dashboard").await?))
    }

    async fn daily_check_in(&self) -> Result<(), ApiError> {
        self.post_empty("/users/daily-checkin").await.map(|_| ())
    }

    async fn payment_settings(&self) -> Result<PaymentSettings, ApiError> {
        protocol::decode(self.get("/users/payment-settings").await?)
    }

    async fn referral_summary(&self) -> Result<ReferralSummary, ApiError> {
        let value = self.get("/referrals/summary").await?;
        if value.is_null() {
            return Ok(ReferralSummary::default());
        }
        protocol::decode(value)
    }

    async fn bank_details(&self) -> Result<Option<BankDetails>, ApiError> {
        protocol::bank_details(self.get("/bank").await?)
    }

    async fn save_bank_details(&self, details: BankDetails) -> Result<(), ApiError> {
        self.post("/bank", &details).await.map(|_| ())
    }

    async fn transactions(
        &self,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<Transaction>, ApiError> {
        protocol::transactions(self.get(&transactions_path(kind)).await?)
    }

    async fn transaction(&self, id: &str) -> Result<Transaction, ApiError> {
        protocol::transaction(self.get(&resource_path("transactions", id)).await?)
    }

    async fn recharge(&self, req: RechargeRequest) -> Result<(), ApiError> {
        self.post("/transactions/recharge", &req).await.map(|_| ())
    }

    async fn withdraw(&self, req: WithdrawRequest) -> Result<(), ApiError> {
        self.post("/transactions/withdraw", &req).await.map(|_| ())
    }

    async fn investments(&self) -> Result<InvestmentPortfolio, ApiError> {
        protocol::investments(self.get("/investments").await?)
    }

    async fn buy_investment(&self, plan_id: &str) -> Result<(), ApiError> {
        let req = BuyInvestmentRequest {
            plan_id: plan_id.to_string(),
        };
        self.post("/investments/buy", &req).await.map(|_| ())
    }

    async fn investment(&self, id: &str) -> Result<InvestmentDetail, ApiError> {
        protocol::decode(self.get(&resource_path("investments", id)).await?)
    }

    async fn plans(&self) -> Result<Vec<Plan>, ApiError> {
        protocol::plans(self.get("/plans").await?)
    }

    async fn plan(&self, id: &str) -> Result<Option<Plan>, ApiError> {
        protocol::plan(self.get(&resource_path("plans", id)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface_adapters::storage::MemoryStore;

    #[test]
    fn when_transaction_kind_is_given_then_it_is_sent_as_type_query() {
        assert_eq!(
            transactions_path(Some(TransactionKind::Withdraw)),
            "/transactions?type=withdraw"
        );
        assert_eq!(transactions_path(None), "/transactions");
    }

    #[test]
    fn when_base_url_has_trailing_slash_then_it_is_trimmed() {
        let client = ApiClient::with_http(
            Client::new(),
            "http://localhost:5000/api/",
            Arc::new(MemoryStore::new()),
        );

        assert_eq!(client.base_url(), "http://localhost:5000/api");
    }

    #[tokio::test]
    async fn when_scope_is_cancelled_then_calls_fail_without_a_request() {
        let client = ApiClient::with_http(
            Client::new(),
            "http://127.0.0.1:9",
            Arc::new(MemoryStore::new()),
        );
        let scoped = client.scoped();

        scoped.cancel_all();

        assert_eq!(scoped.wallet().await, Err(ApiError::Cancelled));
        assert!(!client.cancellation().is_cancelled());
    }

    #[test]
    fn when_ids_contain_reserved_characters_then_they_are_encoded() {
        assert_eq!(resource_path("plans", "abc123"), "/plans/abc123");
        assert_eq!(resource_path("plans", "a/b?c"), "/plans/a%2Fb%3Fc");
        assert_eq!(resource_path("transactions", "a b+c"), "/transactions/a%20b+c");
    }
}
