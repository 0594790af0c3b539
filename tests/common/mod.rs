#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

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

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_superhero-api"));
        cmd.env("API_PORT", port.to_string())
            .env("API_BIND_ADDR", "127.0.0.1")
            .env("SECURITY_BCRYPT_COST", "4")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit the rest of the environment so the server sees DATABASE_URL
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
        })
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
                let status = resp.status();
                if status == StatusCode::OK || status == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Integration tests need a real PostgreSQL; without DATABASE_URL they are skipped.
pub fn database_configured() -> bool {
    let _ = dotenvy::dotenv();
    let configured = std::env::var("DATABASE_URL").map(|v| !v.is_empty()).unwrap_or(false);
    if !configured {
        eprintln!("DATABASE_URL not set, skipping integration test");
    }
    configured
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

/// Username that will not collide with earlier runs against the same database.
pub fn unique_name(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{}_{}_{}", prefix, std::process::id(), nanos)
}

/// Create an account directly in the database through heroctl.
pub fn create_user(username: &str, password: &str, admin: bool) -> Result<()> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_heroctl"));
    cmd.args(["user", "create", username, "--password", password])
        .env("SECURITY_BCRYPT_COST", "4");
    if admin {
        cmd.arg("--admin");
    }
    let status = cmd.status().context("failed to run heroctl")?;
    anyhow::ensure!(status.success(), "heroctl user create {} failed: {}", username, status);
    Ok(())
}

pub async fn login(server: &TestServer, username: &str, password: &str) -> Result<String> {
    let res = reqwest::Client::new()
        .post(format!("{}/login", server.base_url))
        .form(&[("username", username), ("password", password)])
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
    let body: Value = res.json().await?;
    body["access_token"]
        .as_str()
        .map(str::to_string)
        .context("login response had no access_token")
}
