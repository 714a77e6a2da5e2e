//! In-process fake backend for client integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use lendwise_client::{LendwiseClient, MemoryCredentialStore, Session, UserProfile, UserType};
use lendwise_shared::config::{ApiConfig, EligibilityConfig, StorageConfig};
use lendwise_shared::{AppConfig, TokenPair, UserStatus};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use url::Url;

// ============================================================================
// Backend state
// ============================================================================

/// Knobs and counters shared with the fake backend's handlers.
#[derive(Debug)]
pub struct BackendState {
    valid_token: Mutex<String>,
    pub refresh_succeeds: AtomicBool,
    /// Refresh answers with a token the protected routes still reject.
    pub refresh_issues_rejected_token: AtomicBool,
    pub logout_fails: AtomicBool,
    pub kyc_verified: AtomicBool,
    pub credit_score: AtomicU32,
    pub refresh_calls: AtomicUsize,
    pub protected_calls: AtomicUsize,
    pub score_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            valid_token: Mutex::new("access-1".to_string()),
            refresh_succeeds: AtomicBool::new(true),
            refresh_issues_rejected_token: AtomicBool::new(false),
            logout_fails: AtomicBool::new(false),
            kyc_verified: AtomicBool::new(true),
            credit_score: AtomicU32::new(72),
            refresh_calls: AtomicUsize::new(0),
            protected_calls: AtomicUsize::new(0),
            score_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
        }
    }
}

impl BackendState {
    pub fn valid_token(&self) -> String {
        self.valid_token.lock().unwrap().clone()
    }

    fn set_valid_token(&self, token: String) {
        *self.valid_token.lock().unwrap() = token;
    }

    pub fn refreshes(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn protected(&self) -> usize {
        self.protected_calls.load(Ordering::SeqCst)
    }

    pub fn score_fetches(&self) -> usize {
        self.score_calls.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Server
// ============================================================================

/// A running fake backend.
pub struct FakeBackend {
    pub state: Arc<BackendState>,
    pub base_url: Url,
}

impl FakeBackend {
    pub async fn start() -> Self {
        init_tracing();
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/logout", post(logout))
            .route("/api/auth/me", get(me))
            .route("/api/auth/refresh-token", post(refresh))
            .route("/api/auth/profile", put(update_profile))
            .route("/api/kyc/status", get(kyc_status))
            .route("/api/credit/score", get(credit_score))
            .route("/api/loans/types", get(loan_types))
            .route("/api/loans/my-loans", get(my_loans))
            .route("/api/boom", get(boom))
            .route("/api/reject", post(reject))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            state,
            base_url: Url::parse(&format!("http://{addr}/api")).unwrap(),
        }
    }

    pub fn config(&self) -> AppConfig {
        config_for(self.base_url.clone())
    }

    /// A client whose store already holds a session with `access_token`.
    pub fn client_with_session(&self, access_token: &str) -> LendwiseClient {
        let store = MemoryCredentialStore::with_session(&session(access_token, "refresh-0")).unwrap();
        LendwiseClient::with_store(&self.config(), Arc::new(store)).unwrap()
    }

    /// A client with an empty store.
    pub fn anonymous_client(&self) -> LendwiseClient {
        LendwiseClient::with_store(&self.config(), Arc::new(MemoryCredentialStore::new())).unwrap()
    }
}

/// Routes client logs to the test harness; set `RUST_LOG=lendwise_client=debug` to see them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config_for(base_url: Url) -> AppConfig {
    AppConfig {
        api: ApiConfig {
            base_url,
            user_agent: "lendwise-tests".to_string(),
        },
        storage: StorageConfig::default(),
        eligibility: EligibilityConfig::default(),
    }
}

pub fn user(email: &str) -> UserProfile {
    UserProfile {
        user_id: "u-1".to_string(),
        email: email.to_string(),
        full_name: "Amaka Eze".to_string(),
        user_type: UserType::Customer,
        status: UserStatus::Active,
    }
}

pub fn session(access_token: &str, refresh_token: &str) -> Session {
    Session::new(
        TokenPair::new(access_token, refresh_token),
        user("amaka@example.ng"),
    )
}

// ============================================================================
// Handlers
// ============================================================================

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "message": "OK", "data": data })).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn authorize(state: &BackendState, headers: &HeaderMap) -> Result<(), Response> {
    state.protected_calls.fetch_add(1, Ordering::SeqCst);
    let expected = format!("Bearer {}", state.valid_token());
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(fail(StatusCode::UNAUTHORIZED, "Token expired")),
    }
}

fn user_json(email: &str) -> Value {
    json!({
        "_id": "u-1",
        "email": email,
        "fullName": "Amaka Eze",
        "userType": "customer",
        "status": "active"
    })
}

async fn login(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    if body["password"] != "correct-horse" {
        return fail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    let email = body["identifier"].as_str().unwrap_or_default();
    state.set_valid_token("access-1".to_string());
    ok(json!({
        "user": user_json(email),
        "accessToken": "access-1",
        "refreshToken": "refresh-1"
    }))
}

async fn logout(State(state): State<Arc<BackendState>>) -> Response {
    state.logout_calls.fetch_add(1, Ordering::SeqCst);
    if state.logout_fails.load(Ordering::SeqCst) {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Logout unavailable");
    }
    ok(Value::Null)
}

async fn refresh(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    let n = state.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
    // Keep the refresh in flight long enough for concurrent callers to queue.
    tokio::time::sleep(Duration::from_millis(50)).await;

    if !state.refresh_succeeds.load(Ordering::SeqCst) || body["refreshToken"].is_null() {
        return fail(StatusCode::UNAUTHORIZED, "Refresh token expired");
    }
    let access = format!("access-r{n}");
    if !state.refresh_issues_rejected_token.load(Ordering::SeqCst) {
        state.set_valid_token(access.clone());
    }
    ok(json!({ "accessToken": access, "refreshToken": format!("refresh-r{n}") }))
}

async fn me(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    ok(json!({ "user": user_json("amaka.new@example.ng") }))
}

async fn update_profile(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    let mut user = user_json("amaka@example.ng");
    if let Some(name) = body.get("fullName") {
        user["fullName"] = name.clone();
    }
    ok(user)
}

async fn kyc_status(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    ok(json!({
        "bvn": "22222222222",
        "nin": null,
        "isVerified": state.kyc_verified.load(Ordering::SeqCst)
    }))
}

async fn credit_score(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    state.score_calls.fetch_add(1, Ordering::SeqCst);
    ok(json!({
        "creditScore": state.credit_score.load(Ordering::SeqCst),
        "rating": "Good"
    }))
}

async fn loan_types(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    ok(json!({
        "loanTypes": [
            { "_id": "lt-1", "name": "Salary Advance", "interest": 5, "maxAmount": 200000 },
            { "id": 2, "title": "SME Loan", "interestRate": "15", "minDuration": 3, "maxDuration": 24 }
        ]
    }))
}

async fn my_loans(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    ok(json!([
        {
            "_id": "loan-1",
            "amount": 1000000,
            "interestRate": 15,
            "duration": 12,
            "balance": 400000,
            "totalAmountDue": "1083099.75",
            "status": "disbursed"
        },
        {
            "_id": "loan-2",
            "amount": 50000,
            "status": "frozen"
        }
    ]))
}

async fn boom() -> Response {
    fail(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable")
}

async fn reject() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "success": false,
            "message": "Validation failed",
            "code": "VALIDATION_ERROR",
            "errors": [{ "field": "bvn", "message": "BVN must be 11 digits" }]
        })),
    )
        .into_response()
}
