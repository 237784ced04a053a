//! Shared fixtures for the api integration tests.
//!
//! The stores are in-memory stand-ins for PostgreSQL and Redis that keep the
//! same contracts (uniqueness, expiry against an injected clock), so service
//! and HTTP behaviour can be tested without external processes.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use passage_core::clock::Clock;
use passage_core::error::CoreError;
use passage_core::types::{DbId, Timestamp};
use passage_db::models::session::CreateSession;
use passage_db::models::user::{CreateUser, User};
use passage_db::store::{SessionStore, UserStore, VerificationCodeStore};
use tower::ServiceExt;

use passage_api::auth::code::CodeConfig;
use passage_api::auth::jwt::JwtConfig;
use passage_api::auth::password::{PasswordConfig, PasswordHasher};
use passage_api::config::{AuthConfig, ServerConfig};
use passage_api::middleware::client_ip::FORWARDED_FOR_HEADER;
use passage_api::notifications::{EmailError, Mailer};
use passage_api::router::build_app_router;
use passage_api::services::{AuthDeps, AuthService, EmailVerificationService, SessionConfig};
use passage_api::state::AppState;

/// Address every request comes from unless a test says otherwise.
pub const TEST_IP: &str = "203.0.113.7";

pub const TEST_JWT_SECRET: &str = "test-secret-for-integration-tests";

/// Session lifetime used by the fixtures: 1 hour.
pub const TEST_SESSION_TTL_SECS: i64 = 3600;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc::now()),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap()
    }
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
    pub unavailable: AtomicBool,
}

impl MemoryUserStore {
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn by_username(&self, username: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    fn check_available(&self) -> Result<(), CoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CoreError::Internal("user store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, input: &CreateUser) -> Result<User, CoreError> {
        self.check_available()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == input.username) {
            return Err(CoreError::AlreadyExists("username is already taken".into()));
        }
        if users.iter().any(|u| u.email == input.email) {
            return Err(CoreError::AlreadyExists("email is already registered".into()));
        }
        let user = User {
            id: input.id,
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            verified: input.verified,
            avatar_url: None,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, CoreError> {
        self.check_available()?;
        Ok(self.by_username(username))
    }

    async fn update_password_by_email(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, CoreError> {
        self.check_available()?;
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.email == email) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_avatar(&self, id: DbId, avatar_url: &str) -> Result<bool, CoreError> {
        self.check_available()?;
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.avatar_url = Some(avatar_url.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), CoreError> {
        self.check_available()
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    rows: Mutex<Vec<CreateSession>>,
    pub fail_create: AtomicBool,
}

impl MemorySessionStore {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, input: &CreateSession) -> Result<(), CoreError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(CoreError::Internal("session store unavailable".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|s| s.refresh_token == input.refresh_token) {
            return Err(CoreError::Internal("refresh token collision".into()));
        }
        rows.push(input.clone());
        Ok(())
    }

    async fn find_active_user_id(
        &self,
        refresh_token: &str,
        ip: &str,
        now: Timestamp,
    ) -> Result<Option<DbId>, CoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.refresh_token == refresh_token && s.ip == ip && s.expires_at > now)
            .map(|s| s.user_id))
    }

    async fn delete(&self, refresh_token: &str, ip: &str) -> Result<u64, CoreError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| !(s.refresh_token == refresh_token && s.ip == ip));
        Ok((before - rows.len()) as u64)
    }

    async fn delete_expired(&self, now: Timestamp) -> Result<u64, CoreError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| s.expires_at > now);
        Ok((before - rows.len()) as u64)
    }
}

/// Code store with Redis-like per-key expiry measured on a [`ManualClock`].
pub struct MemoryCodeStore {
    clock: Arc<ManualClock>,
    entries: Mutex<HashMap<String, (u64, Timestamp)>>,
    pub unavailable: AtomicBool,
}

impl MemoryCodeStore {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            clock,
            entries: Mutex::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    fn check_available(&self) -> Result<(), CoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CoreError::Internal("code store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl VerificationCodeStore for MemoryCodeStore {
    async fn put(&self, email: &str, code: u64, ttl: Duration) -> Result<(), CoreError> {
        self.check_available()?;
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| CoreError::internal("code ttl", e))?;
        let expires_at = self.clock.now() + ttl;
        self.entries
            .lock()
            .unwrap()
            .insert(email.to_string(), (code, expires_at));
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<u64>, CoreError> {
        self.check_available()?;
        let now = self.clock.now();
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(email)
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(code, _)| *code))
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Mailer that remembers what it was asked to send and can be told to fail.
#[derive(Default)]
pub struct RecordingMailer {
    codes: Mutex<HashMap<String, u64>>,
    pub welcomes: Mutex<Vec<String>>,
    pub login_alerts: Mutex<Vec<(String, String)>>,
    pub fail_codes: AtomicBool,
    pub fail_notices: AtomicBool,
}

impl RecordingMailer {
    /// Last code mailed to `to`.
    pub fn code_for(&self, to: &str) -> Option<u64> {
        self.codes.lock().unwrap().get(to).copied()
    }

    fn delivery_error() -> EmailError {
        EmailError::Build("relay refused connection".into())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification_code(&self, to: &str, code: u64) -> Result<(), EmailError> {
        if self.fail_codes.load(Ordering::SeqCst) {
            return Err(Self::delivery_error());
        }
        self.codes.lock().unwrap().insert(to.to_string(), code);
        Ok(())
    }

    async fn send_welcome(&self, to: &str, _username: &str) -> Result<(), EmailError> {
        if self.fail_notices.load(Ordering::SeqCst) {
            return Err(Self::delivery_error());
        }
        self.welcomes.lock().unwrap().push(to.to_string());
        Ok(())
    }

    async fn send_login_alert(&self, to: &str, ip: &str) -> Result<(), EmailError> {
        if self.fail_notices.load(Ordering::SeqCst) {
            return Err(Self::delivery_error());
        }
        self.login_alerts
            .lock()
            .unwrap()
            .push((to.to_string(), ip.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Configuration and wiring
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with cheap hashing and proxy trust enabled,
/// so requests can pick their address with `X-Forwarded-For`.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        trust_forwarded_for: true,
        database_url: "postgres://unused".to_string(),
        redis_url: "redis://unused".to_string(),
        session_cleanup_interval_secs: 3600,
        auth: AuthConfig {
            password: PasswordConfig {
                iterations: 1,
                memory_kib: 64,
            },
            code: CodeConfig::default(),
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
                access_token_ttl_secs: 900,
            },
            session: SessionConfig {
                ttl_secs: TEST_SESSION_TTL_SECS,
            },
        },
        email: None,
    }
}

/// Services wired to in-memory stores, with handles on every double.
pub struct TestHarness {
    pub config: ServerConfig,
    pub auth: Arc<AuthService>,
    pub verification: Arc<EmailVerificationService>,
    pub users: Arc<MemoryUserStore>,
    pub sessions: Arc<MemorySessionStore>,
    pub codes: Arc<MemoryCodeStore>,
    pub mailer: Arc<RecordingMailer>,
    pub clock: Arc<ManualClock>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let clock = Arc::new(ManualClock::new());
        let users = Arc::new(MemoryUserStore::default());
        let sessions = Arc::new(MemorySessionStore::default());
        let codes = Arc::new(MemoryCodeStore::new(Arc::clone(&clock)));
        let mailer = Arc::new(RecordingMailer::default());

        let verification = Arc::new(EmailVerificationService::new(
            codes.clone(),
            mailer.clone(),
            config.auth.code.clone(),
        ));

        let hasher = PasswordHasher::new(&config.auth.password).expect("test hash params");
        let auth = Arc::new(AuthService::new(
            AuthDeps {
                users: users.clone(),
                sessions: sessions.clone(),
                verification: Arc::clone(&verification),
                mailer: mailer.clone(),
                clock: clock.clone(),
            },
            hasher,
            config.auth.jwt.clone(),
            config.auth.session.clone(),
        ));

        Self {
            config,
            auth,
            verification,
            users,
            sessions,
            codes,
            mailer,
            clock,
        }
    }

    /// Build the full application router over this harness.
    ///
    /// Uses the same [`build_app_router`] as `main.rs`, so the whole middleware
    /// stack is exercised.
    pub fn app(&self) -> Router {
        let state = AppState {
            config: Arc::new(self.config.clone()),
            auth: Arc::clone(&self.auth),
            verification: Arc::clone(&self.verification),
        };
        build_app_router(state, &self.config)
    }

    /// Issue a code for `email` through the service and return it.
    pub async fn issue_code(&self, email: &str) -> u64 {
        self.verification
            .create_verification_code(email)
            .await
            .expect("code issue should succeed")
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST a JSON body from [`TEST_IP`].
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_json_from(app, uri, body, TEST_IP).await
}

/// POST a JSON body with `X-Forwarded-For: ip`.
pub async fn post_json_from(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    ip: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(FORWARDED_FOR_HEADER, ip)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
