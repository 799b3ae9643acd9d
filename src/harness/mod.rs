//! Scenario harness
//!
//! Every scenario runs through the same driver:
//!
//! ```text
//! banner -> scenario future -> cleanup of remaining handles -> exit code
//!              |
//!              +-- raced against shutdown (Ctrl-C) and guarded against panics
//! ```
//!
//! The scenario body only sees a [`ScenarioContext`] (clients, bucket name,
//! reporter) and the [`Handles`] record it must keep current. Whatever the
//! outcome, the driver releases everything still recorded before it reports.

use crate::config::env::{self, EnvSource, ProcessEnv};
use crate::config::{ClientConfig, ConfigError};
use crate::scenarios::Scenario;
use aws_sdk_s3::error::DisplayErrorContext;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::process::ExitCode;
use thiserror::Error;

pub mod cleanup;
pub mod report;

pub use cleanup::{Handles, PendingUpload};
pub use report::{Captured, Reporter};

/// Process exit codes
pub mod exit {
    pub const SUCCESS: u8 = 0;
    /// Init, API, cancellation and panic failures
    pub const FAILURE: u8 = 1;
    /// Observed state differs from what the scenario produced
    pub const VERIFICATION: u8 = 2;
    pub const POLICY_CREATE: u8 = 3;
    pub const POLICY_NOT_ATTACHED: u8 = 4;
    pub const SECRET_MISSING: u8 = 5;
    pub const ALLOWED_BUCKET_DENIED: u8 = 6;
    pub const POLICY_NOT_ENFORCED: u8 = 7;
    pub const ALLOWED_WRITE_DENIED: u8 = 8;
}

/// Scenario failures
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("init error: {0}")]
    Init(#[from] ConfigError),

    #[error("{step} error: {message}")]
    Api {
        step: &'static str,
        message: String,
        code: u8,
    },

    #[error("ERROR: {message}")]
    Verification { message: String, code: u8 },

    #[error("interrupted: scenario cancelled")]
    Cancelled,

    #[error("panic: {0}")]
    Panicked(String),
}

impl ScenarioError {
    /// Failed API call; the SDK error is rendered with its full source chain
    pub fn api(step: &'static str, err: impl std::error::Error) -> Self {
        Self::Api {
            step,
            message: DisplayErrorContext(&err).to_string(),
            code: exit::FAILURE,
        }
    }

    /// Successful call whose response lacks a field the scenario depends on
    pub fn missing(step: &'static str, field: &str) -> Self {
        Self::Api {
            step,
            message: format!("response is missing {field}"),
            code: exit::FAILURE,
        }
    }

    /// Observed state differs from what was written
    pub fn mismatch(message: impl Into<String>) -> Self {
        Self::Verification {
            message: message.into(),
            code: exit::VERIFICATION,
        }
    }

    /// Override the exit code of an API or verification failure
    pub fn with_exit_code(self, code: u8) -> Self {
        match self {
            Self::Api { step, message, .. } => Self::Api {
                step,
                message,
                code,
            },
            Self::Verification { message, .. } => Self::Verification { message, code },
            other => other,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Api { code, .. } | Self::Verification { code, .. } => *code,
            Self::Init(_) | Self::Cancelled | Self::Panicked(_) => exit::FAILURE,
        }
    }
}

/// Attach a step name to SDK results
pub trait StepExt<T> {
    fn api_step(self, step: &'static str) -> Result<T, ScenarioError>;
}

impl<T, E: std::error::Error> StepExt<T> for Result<T, E> {
    fn api_step(self, step: &'static str) -> Result<T, ScenarioError> {
        match self {
            Ok(value) => {
                tracing::debug!(step, "request succeeded");
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(step, error = %DisplayErrorContext(&err), "request failed");
                Err(ScenarioError::api(step, err))
            }
        }
    }
}

/// Require a non-empty string field from a response.
///
/// Accepts both `String` and `Option<String>` so that required and optional
/// SDK members read the same way.
pub fn require_str(
    step: &'static str,
    field: &str,
    value: impl Into<Option<String>>,
) -> Result<String, ScenarioError> {
    value
        .into()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ScenarioError::missing(step, field))
}

/// Lower-hex string of `bytes` random bytes
pub fn random_suffix(bytes: usize) -> String {
    let buf: Vec<u8> = (0..bytes).map(|_| rand::random::<u8>()).collect();
    hex::encode(buf)
}

/// `<prefix>-<yyyymmddhhmmss>-<8 lower-hex>`, lower-cased
pub fn bucket_name(prefix: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}-{}-{}",
        prefix.trim(),
        now.format("%Y%m%d%H%M%S"),
        random_suffix(4)
    )
    .to_ascii_lowercase()
}

/// Everything a scenario needs to talk to the service
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    s3: aws_sdk_s3::Client,
    s3_config: ClientConfig,
    iam: aws_sdk_iam::Client,
    iam_config: ClientConfig,
    bucket: String,
    enforce_policy: bool,
    reporter: Reporter,
}

impl ScenarioContext {
    /// Build both clients and the bucket name from explicit configurations
    pub async fn new(
        s3_config: ClientConfig,
        iam_config: ClientConfig,
        bucket: impl Into<String>,
    ) -> Self {
        let s3 = crate::s3::new_s3_client(&s3_config).await;
        let iam = crate::iam::new_iam_client(&iam_config).await;
        Self {
            s3,
            s3_config,
            iam,
            iam_config,
            bucket: bucket.into(),
            enforce_policy: false,
            reporter: Reporter::stdio(),
        }
    }

    /// Resolve configuration for `scenario` from the process environment
    pub async fn from_env(scenario: Scenario) -> Result<Self, ScenarioError> {
        Self::from_vars(&ProcessEnv, scenario).await
    }

    /// Resolve configuration for `scenario` from `vars`
    pub async fn from_vars(
        vars: &impl EnvSource,
        scenario: Scenario,
    ) -> Result<Self, ScenarioError> {
        let s3_config = ClientConfig::for_s3(vars)?;
        let iam_config = ClientConfig::for_iam(vars)?;
        let prefix = vars.get_or(env::BUCKET_PREFIX, scenario.default_bucket_prefix());
        let bucket = bucket_name(&prefix, Utc::now());
        let enforce_policy = vars.flag(env::IAM_POLICY_ENFORCEMENT);

        Ok(Self::new(s3_config, iam_config, bucket)
            .await
            .with_policy_enforcement(enforce_policy))
    }

    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_policy_enforcement(mut self, enabled: bool) -> Self {
        self.enforce_policy = enabled;
        self
    }

    pub fn s3(&self) -> &aws_sdk_s3::Client {
        &self.s3
    }

    pub fn s3_config(&self) -> &ClientConfig {
        &self.s3_config
    }

    pub fn iam(&self) -> &aws_sdk_iam::Client {
        &self.iam
    }

    pub fn iam_config(&self) -> &ClientConfig {
        &self.iam_config
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn enforce_policy(&self) -> bool {
        self.enforce_policy
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Print the configuration banner for `scenario`
    pub fn banner(&self, scenario: Scenario) {
        let r = &self.reporter;
        if scenario.is_iam() {
            r.field("Using endpoint", self.iam_config.endpoint());
            r.field("Region", self.iam_config.region());
            r.field("User", "[current IAM identity]");
        } else {
            r.field("Using endpoint", self.s3_config.endpoint());
            r.field("Region", self.s3_config.region());
            r.field("Bucket", &self.bucket);
            r.field("Addressing", self.s3_config.addressing_style());
        }
    }
}

/// Run `scenario` to completion, cancellation or panic, then release every
/// resource it left behind.
#[tracing::instrument(name = "scenario", skip_all, fields(scenario = scenario.binary_name()))]
pub async fn execute(
    scenario: Scenario,
    ctx: &ScenarioContext,
    shutdown: impl Future<Output = ()>,
) -> Result<(), ScenarioError> {
    execute_with(
        ctx,
        async |handles: &mut Handles| scenario.run(ctx, handles).await,
        shutdown,
    )
    .await
}

/// Drive `body` against a fresh [`Handles`] record, racing it against
/// `shutdown`. A panic in `body` is caught and reported as
/// [`ScenarioError::Panicked`]. Cleanup runs on every path.
pub async fn execute_with<B>(
    ctx: &ScenarioContext,
    body: B,
    shutdown: impl Future<Output = ()>,
) -> Result<(), ScenarioError>
where
    B: AsyncFnOnce(&mut Handles) -> Result<(), ScenarioError>,
{
    let mut handles = Handles::default();

    let outcome = {
        let run = AssertUnwindSafe(body(&mut handles)).catch_unwind();
        tokio::select! {
            result = run => match result {
                Ok(result) => result,
                Err(payload) => Err(ScenarioError::Panicked(panic_message(payload.as_ref()))),
            },
            () = shutdown => {
                tracing::warn!("shutdown requested, cancelling scenario");
                Err(ScenarioError::Cancelled)
            }
        }
    };

    handles.cleanup(ctx).await;
    outcome
}

/// Report `outcome` and map it to an exit code
pub fn finish(scenario: Scenario, ctx: &ScenarioContext, outcome: Result<(), ScenarioError>) -> u8 {
    match outcome {
        Ok(()) => {
            ctx.reporter()
                .step(format!("{} succeeded ✔", scenario.title()));
            exit::SUCCESS
        }
        Err(err) => {
            ctx.reporter().failure(&err);
            err.exit_code()
        }
    }
}

/// Banner, run, cleanup, report
pub async fn run_scenario(
    scenario: Scenario,
    ctx: &ScenarioContext,
    shutdown: impl Future<Output = ()>,
) -> u8 {
    ctx.banner(scenario);
    let outcome = execute(scenario, ctx, shutdown).await;
    finish(scenario, ctx, outcome)
}

/// Resolve the context from the process environment and run `scenario`
pub async fn run_from_env(scenario: Scenario, shutdown: impl Future<Output = ()>) -> u8 {
    match ScenarioContext::from_env(scenario).await {
        Ok(ctx) => run_scenario(scenario, &ctx, shutdown).await,
        Err(err) => {
            Reporter::stdio().failure(&err);
            err.exit_code()
        }
    }
}

/// Entry point shared by the scenario binaries
pub async fn main_for(scenario: Scenario) -> ExitCode {
    let _ = crate::telemetry::init_subscriber(crate::telemetry::DEFAULT_DIRECTIVE);
    ExitCode::from(run_from_env(scenario, shutdown_signal()).await)
}

/// Resolves on Ctrl-C. Never resolves when the signal cannot be installed.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "scenario panicked".to_string()
    }
}
