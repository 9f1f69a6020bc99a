//! Common test utilities for integration tests
//!
//! Each `TestApp` runs the real router over an in-memory key-value store
//! and, optionally, a generator that replays canned AI replies.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fitpulse_backend::{
    ai::{AiBridge, AiError, TextGenerator},
    config::AppConfig,
    routes,
    state::AppState,
    storage::MemoryKvStore,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const ADMIN_CODE: &str = "wasd123wasd";

/// Replays queued replies in order; records every prompt
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<String>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn push(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(reply.into());
    }
}

#[async_trait::async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AiError::Request("no scripted reply left".to_string()))
    }
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub kv: MemoryKvStore,
    pub ai: Arc<ScriptedGenerator>,
}

impl TestApp {
    /// App with AI enabled through a scripted generator
    pub fn new() -> Self {
        Self::with_kv(MemoryKvStore::new())
    }

    /// App over pre-existing storage, e.g. to test reloads
    pub fn with_kv(kv: MemoryKvStore) -> Self {
        let ai = Arc::new(ScriptedGenerator::default());
        let state = AppState::new(
            test_config(),
            Arc::new(kv.clone()),
            AiBridge::new(ai.clone()),
        );
        let app = routes::create_router(state.clone());
        Self { app, state, kv, ai }
    }

    /// App with AI turned off
    pub fn without_ai() -> Self {
        let kv = MemoryKvStore::new();
        let state = AppState::new(test_config(), Arc::new(kv.clone()), AiBridge::disabled());
        let app = routes::create_router(state.clone());
        Self {
            app,
            state,
            kv,
            ai: Arc::new(ScriptedGenerator::default()),
        }
    }

    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, value)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("POST", path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("PUT", path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("DELETE", path, token, None).await
    }

    /// New session moved to the login form
    pub async fn login_form(&self) -> String {
        let (status, session) = self.post("/api/v1/session", None, json!({})).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = session["sessionId"].as_str().unwrap().to_string();

        let (status, _) = self
            .post(&format!("/api/v1/session/{}/open-login", id), None, json!({}))
            .await;
        assert_eq!(status, StatusCode::OK);
        id
    }

    /// Log the seeded administrator in; returns (session id, token)
    pub async fn login_admin(&self) -> (String, String) {
        let session = self.login_form().await;
        let (status, body) = self
            .post(
                &format!("/api/v1/session/{}/login", session),
                None,
                json!({
                    "role": "ADMIN",
                    "email": "admin@fitpulse.com",
                    "password": "admin123",
                    "verificationCode": ADMIN_CODE,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        (session, body["accessToken"].as_str().unwrap().to_string())
    }

    /// Create a member through the admin surface and log them in.
    /// Returns (member id, member token).
    pub async fn member_session(&self, email: &str) -> (String, String) {
        let (_, admin) = self.login_admin().await;
        let (status, member) = self
            .post(
                "/api/v1/admin/members",
                Some(&admin),
                json!({ "name": "Deniz Ak", "email": email, "password": "secret1" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", member);
        let member_id = member["id"].as_str().unwrap().to_string();

        let session = self.login_form().await;
        let (status, body) = self
            .post(
                &format!("/api/v1/session/{}/login", session),
                None,
                json!({ "role": "MEMBER", "email": email, "password": "secret1" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        (member_id, body["accessToken"].as_str().unwrap().to_string())
    }
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.jwt.secret = "test-secret-key-for-testing-only-32chars".to_string();
    config.jwt.access_token_expiry_secs = 3600;
    config
}
