//! S3 Smoke Library
//!
//! End-to-end smoke tests for S3-compatible object storage and its IAM
//! access-key API.
//!
//! # Features
//!
//! - **Seven scenarios**: bucket lifecycle, object CRUD, basics, copy,
//!   multipart upload, access keys, access keys with a bucket-scoped policy
//! - **Guaranteed cleanup**: resources are released on success, failure,
//!   Ctrl-C and panic
//! - **Stable exit codes**: `0` success, `1` failure, `2` verification
//!   mismatch, `3`..`8` policy checks
//!
//! # Example
//!
//! ```no_run
//! # #![recursion_limit = "256"]
//! use s3_smoke::harness::{run_from_env, shutdown_signal};
//! use s3_smoke::scenarios::Scenario;
//!
//! #[tokio::main]
//! async fn main() -> std::process::ExitCode {
//!     let code = run_from_env(Scenario::Basics, shutdown_signal()).await;
//!     std::process::ExitCode::from(code)
//! }
//! ```

pub mod config;
pub mod harness;
pub mod iam;
pub mod io;
pub mod s3;
pub mod scenarios;
pub mod telemetry;

// Re-export commonly used types
pub use config::ClientConfig;
pub use harness::{ScenarioContext, ScenarioError};
pub use scenarios::Scenario;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
