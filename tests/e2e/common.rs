//! Common E2E Test Infrastructure
//!
//! Backend discovery and context construction for live runs.

use s3_smoke::config::{AddressingStyle, ClientConfig};
use s3_smoke::harness::{bucket_name, Captured, Reporter, ScenarioContext};
use s3_smoke::s3::{CredentialsSource, StaticCredentials};
use s3_smoke::Scenario;
use std::time::Duration;

/// Default RustFS endpoint for E2E tests
pub const RUSTFS_ENDPOINT: &str = "http://localhost:9000";

/// Default credentials for RustFS
pub const RUSTFS_ACCESS_KEY: &str = "minioadmin";
pub const RUSTFS_SECRET_KEY: &str = "minioadmin";

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub fn endpoint() -> String {
    env_or("E2E_ENDPOINT", RUSTFS_ENDPOINT)
}

/// Check whether anything accepts connections at the backend address
pub async fn is_s3_backend_available() -> bool {
    let endpoint = endpoint();
    let authority = endpoint
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string();

    matches!(
        tokio::time::timeout(
            Duration::from_secs(2),
            tokio::net::TcpStream::connect(authority)
        )
        .await,
        Ok(Ok(_))
    )
}

/// Skip test if S3 backend is not available
#[macro_export]
macro_rules! skip_if_no_s3 {
    () => {
        if !$crate::e2e::common::is_s3_backend_available().await {
            eprintln!("Skipping test: S3 backend not available");
            return;
        }
    };
}

/// Live context for `scenario` with a fresh bucket name
pub async fn live_context(scenario: Scenario) -> (ScenarioContext, Captured) {
    let credentials = CredentialsSource::Static(StaticCredentials::new(
        env_or("E2E_ACCESS_KEY", RUSTFS_ACCESS_KEY),
        env_or("E2E_SECRET_KEY", RUSTFS_SECRET_KEY),
    ));
    let s3_config = ClientConfig::new(endpoint(), "us-east-1", credentials.clone())
        .expect("valid e2e endpoint")
        .with_addressing_style(AddressingStyle::Path);
    let iam_config =
        ClientConfig::new(endpoint(), "us-east-1", credentials).expect("valid e2e endpoint");

    let bucket = bucket_name(
        &format!("e2e-{}", scenario.default_bucket_prefix()),
        chrono::Utc::now(),
    );
    let (reporter, captured) = Reporter::capture();
    let ctx = ScenarioContext::new(s3_config, iam_config, bucket)
        .await
        .with_reporter(reporter);
    (ctx, captured)
}
