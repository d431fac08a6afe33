#![allow(dead_code)]

use std::net::SocketAddr;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde_json::{json, Value};

use notes_api::config::{AppConfig, Environment};
use notes_api::database::Database;
use notes_api::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// In-process server on a free port with its own in-memory database
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::preset(Environment::Development, TEST_SECRET);
        // Cheap hashing keeps the suite fast
        config.security.password_memory_kib = 1024;
        config.security.password_iterations = 1;

        let database = Database::in_memory().await?;
        let state = AppState::new(&config, database)?;
        let app = notes_api::app(state, &config);

        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            port,
            base_url,
            client: Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/api/auth/Signup"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/api/auth/Login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    /// Sign up and log in a fresh user; returns (user id, token)
    pub async fn register_user(&self, email: &str) -> Result<(i64, String)> {
        let res = self.signup("Test User", email, "password123").await?;
        anyhow::ensure!(res.status() == 201, "signup failed: {}", res.status());

        let body: Value = self.login(email, "password123").await?.json().await?;
        let user_id = body["userId"].as_i64().context("missing userId")?;
        let token = body["token"].as_str().context("missing token")?.to_string();
        Ok((user_id, token))
    }

    pub async fn create_note(&self, token: &str, title: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/api/notes"))
            .bearer_auth(token)
            .json(&json!({ "title": title, "content": "body", "category": "general" }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == 201, "create failed: {}", res.status());
        Ok(res.json().await?)
    }

    pub async fn list_notes(&self, token: &str) -> Result<Vec<Value>> {
        let res = self
            .client
            .get(self.url("/api/notes"))
            .bearer_auth(token)
            .send()
            .await?;
        anyhow::ensure!(res.status() == 200, "list failed: {}", res.status());
        Ok(res.json().await?)
    }
}

pub fn unique_email() -> String {
    format!("user_{}@example.com", uuid::Uuid::new_v4().simple())
}
