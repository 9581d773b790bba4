#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use daypat::auth::{generate_jwt, Claims};
use daypat::config::SecurityConfig;
use reqwest::StatusCode;
use serde_json::Value;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "daypat-integration-secret";
pub const TEST_AUDIENCE: &str = "authenticated";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // In-memory store keeps the suite independent of a running database
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_daypat-api"));
        cmd.env("APP_ENV", "development")
            .env("DAYPAT_STORE", "memory")
            .env("DAYPAT_API_PORT", port.to_string())
            .env("DAYPAT_JWT_SECRET", TEST_JWT_SECRET)
            .env("DAYPAT_JWT_AUDIENCE", TEST_AUDIENCE)
            .stdin(Stdio::null())
            // Detached from the test harness pipes so a piped run can finish
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

pub fn test_security() -> SecurityConfig {
    SecurityConfig {
        enable_cors: false,
        cors_origins: vec![],
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_audience: Some(TEST_AUDIENCE.to_string()),
        dev_token_expiry_hours: 1,
    }
}

/// Signed session token for `user_id`
pub fn token_for(user_id: Uuid) -> String {
    let security = test_security();
    generate_jwt(&Claims::new(user_id, None, &security), &security).expect("sign test token")
}

/// A fresh user id and its token
pub fn new_user() -> (Uuid, String) {
    let user_id = Uuid::new_v4();
    (user_id, token_for(user_id))
}

/// Assert a success envelope and return its `data`
pub async fn expect_data(res: reqwest::Response, status: StatusCode) -> Result<Value> {
    assert_eq!(res.status(), status, "unexpected status");
    let body: Value = res.json().await?;
    assert_eq!(body["success"], true, "expected success envelope: {}", body);
    Ok(body["data"].clone())
}

/// Assert an error envelope and return it
pub async fn expect_error(res: reqwest::Response, status: StatusCode) -> Result<Value> {
    assert_eq!(res.status(), status, "unexpected status");
    let body: Value = res.json().await?;
    assert_eq!(body["success"], false, "expected error envelope: {}", body);
    assert!(body["code"].is_string(), "missing error code: {}", body);
    Ok(body)
}
