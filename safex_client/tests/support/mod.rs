// Fake SafeXExpress backend plus helpers shared by the integration tests.
#![allow(dead_code)]

use std::{
    path::PathBuf,
    // Counters are bumped from handler tasks and read from the test body.
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use serde_json::{Value, json};
use safex_client::frameworks::config::ClientConfig;
use safex_client::frameworks::runtime::{Runtime, build_runtime};

pub const PHONE: &str = "9876543210";
pub const PASSWORD: &str = "secret1";
// Accepted by the fake login endpoint but answered without a token.
pub const TOKENLESS_PHONE: &str = "9000000001";
pub const ACCESS_TOKEN: &str = "access-1";

// Everything the fake backend observed.
#[derive(Default)]
pub struct Recorded {
    pub wallet_hits: AtomicUsize,
    pub logout_hits: AtomicUsize,
    pub authorizations: Mutex<Vec<Option<String>>>,
}

impl Recorded {
    pub fn wallet_hits(&self) -> usize {
        self.wallet_hits.load(Ordering::SeqCst)
    }

    pub fn logout_hits(&self) -> usize {
        self.logout_hits.load(Ordering::SeqCst)
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.authorizations
            .lock()
            .expect("authorizations mutex poisoned")
            .last()
            .cloned()
            .flatten()
    }
}

pub struct FakeBackend {
    // API root, already including the `/api` prefix.
    pub base_url: String,
    pub recorded: Arc<Recorded>,
}

// Serve the fake backend on an ephemeral port for the lifetime of the test runtime.
pub async fn spawn_backend() -> FakeBackend {
    let recorded = Arc::new(Recorded::default());
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/users/profile", get(profile))
        .route("/users/wallet", get(wallet))
        .route("/users/dashboard", get(slow_dashboard))
        .route("/users/payment-settings", get(payment_settings))
        .route("/referrals/summary", get(broken_referrals))
        .route("/plans", get(plans))
        .with_state(recorded.clone());
    let app = Router::new().nest("/api", api);

    // Bind to an ephemeral port to avoid collisions with local services.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake backend failed");
    });

    FakeBackend {
        base_url: format!("http://{addr}/api"),
        recorded,
    }
}

// Unique storage file per test so runs never share a session.
pub fn temp_storage_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("safex-it-{}", uuid::Uuid::new_v4()))
        .join("storage.json")
}

pub fn config_for(backend: &FakeBackend, storage_path: PathBuf) -> ClientConfig {
    ClientConfig {
        api_url: url::Url::parse(&backend.base_url).expect("fake backend url should parse"),
        storage_path,
        screen: "1920x1080".to_string(),
        timezone: "Asia/Kolkata".to_string(),
    }
}

pub fn runtime_for(backend: &FakeBackend, storage_path: PathBuf) -> Runtime {
    build_runtime(&config_for(backend, storage_path)).expect("runtime should build")
}

// Drain every queued notification message.
pub fn drain_messages(runtime: &mut Runtime) -> Vec<String> {
    let mut messages = Vec::new();
    while let Ok(notification) = runtime.notifications.try_recv() {
        messages.push(notification.message);
    }
    messages
}

// Nullable fields mirror what the live server sends for fresh accounts.
pub fn user_json() -> Value {
    json!({
        "_id": "u-1",
        "name": "Asha",
        "phone": PHONE,
        "uid": "100200",
        "referralCode": "ASHA01",
        "avatar": null,
        "isVerified": null,
        "wallet": { "balance": 1200 }
    })
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn record_authorization(recorded: &Recorded, headers: &HeaderMap) -> Option<String> {
    let value = authorization(headers);
    recorded
        .authorizations
        .lock()
        .expect("authorizations mutex poisoned")
        .push(value.clone());
    value
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let phone = body["phone"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    if body["deviceId"].as_str().is_none_or(str::is_empty) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Device id required" })),
        );
    }

    match (phone, password) {
        (PHONE, PASSWORD) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "accessToken": ACCESS_TOKEN,
                    "refreshToken": "refresh-1",
                    "user": user_json()
                }
            })),
        ),
        (TOKENLESS_PHONE, _) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": { "user": user_json() } })),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Invalid credentials" })),
        ),
    }
}

async fn logout(State(recorded): State<Arc<Recorded>>) -> Json<Value> {
    recorded.logout_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "success": true }))
}

async fn profile(
    State(recorded): State<Arc<Recorded>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let expected = format!("Bearer {ACCESS_TOKEN}");
    if record_authorization(&recorded, &headers).as_deref() != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Token expired" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "success": true, "data": { "user": user_json() } })),
    )
}

// Slow enough for overlapping callers to join the same request.
async fn wallet(State(recorded): State<Arc<Recorded>>, headers: HeaderMap) -> Json<Value> {
    recorded.wallet_hits.fetch_add(1, Ordering::SeqCst);
    record_authorization(&recorded, &headers);
    tokio::time::sleep(Duration::from_millis(150)).await;
    Json(json!({
        "success": true,
        "data": { "wallet": { "balance": "1200", "totalEarnings": 300 } }
    }))
}

async fn slow_dashboard() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(10)).await;
    Json(json!({ "success": true, "data": {} }))
}

// Falsy `data`, so the payload sits at the top level.
async fn payment_settings() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": null,
        "upiId": "safex@upi",
        "qrCodeUrl": "https://cdn.example/qr.png"
    }))
}

async fn broken_referrals() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
}

async fn plans() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "plans": [{
                "_id": "plan-1",
                "name": "Starter",
                "amount": 1000,
                "dailyReturn": 50,
                "duration": 30,
                "totalReturn": 1500,
                "isActive": true
            }]
        }
    }))
}
