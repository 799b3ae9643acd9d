//! Client configuration for the smoke tests
//!
//! Resolves endpoint, region, addressing style and credentials from the
//! environment and validates the result. A [`ClientConfig`] is immutable once
//! built and lives for the whole process.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::fmt;
use thiserror::Error;

pub mod env;

pub use env::{EnvSource, ProcessEnv};

use crate::s3::credentials::{CredentialsError, CredentialsSource};

/// Endpoint used when neither `IAM_ENDPOINT` nor `S3_ENDPOINT` is set
pub const DEFAULT_ENDPOINT: &str = "https://acceleratedprod.com";

/// Region used when no region variable is set
pub const DEFAULT_REGION: &str = "global";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Credentials error: {0}")]
    CredentialsError(#[from] CredentialsError),
}

/// Validate that a URL starts with http:// or https://
fn is_valid_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Which API surface a configuration is resolved for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    S3,
    Iam,
}

/// How the bucket is placed in request URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressingStyle {
    /// Bucket as a subdomain of the endpoint
    #[default]
    Virtual,
    /// Bucket as the first path segment
    Path,
    /// Let the SDK decide; treated like `Virtual`
    Auto,
}

impl AddressingStyle {
    /// Parse leniently: anything outside `virtual|path|auto` becomes `Virtual`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "path" => Self::Path,
            "auto" => Self::Auto,
            _ => Self::Virtual,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Virtual => "virtual",
            Self::Path => "path",
            Self::Auto => "auto",
        }
    }

    /// Whether the S3 client must be forced into path-style requests
    pub fn force_path_style(&self) -> bool {
        matches!(self, Self::Path)
    }
}

impl fmt::Display for AddressingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the base endpoint for `service`.
///
/// IAM prefers `IAM_ENDPOINT`; both fall back to `S3_ENDPOINT` and then to
/// [`DEFAULT_ENDPOINT`].
pub fn resolve_endpoint(vars: &impl EnvSource, service: Service) -> String {
    let iam = match service {
        Service::Iam => vars.non_empty(env::IAM_ENDPOINT),
        Service::S3 => None,
    };
    iam.or_else(|| vars.non_empty(env::S3_ENDPOINT))
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
}

/// Resolve the signing region for `service`.
///
/// Precedence: `IAM_REGION` (IAM only), `AWS_REGION`, `AWS_DEFAULT_REGION`,
/// `S3_REGION`, then [`DEFAULT_REGION`].
pub fn resolve_region(vars: &impl EnvSource, service: Service) -> String {
    let iam = match service {
        Service::Iam => vars.non_empty(env::IAM_REGION),
        Service::S3 => None,
    };
    iam.or_else(|| vars.non_empty(env::AWS_REGION))
        .or_else(|| vars.non_empty(env::AWS_DEFAULT_REGION))
        .or_else(|| vars.non_empty(env::S3_REGION))
        .unwrap_or_else(|| DEFAULT_REGION.to_string())
}

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    endpoint: String,
    region: String,
    addressing_style: AddressingStyle,
    credentials: CredentialsSource,
}

impl ClientConfig {
    /// Build and validate a configuration with virtual-hosted addressing
    pub fn new(
        endpoint: impl Into<String>,
        region: impl Into<String>,
        credentials: CredentialsSource,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            endpoint: endpoint.into(),
            region: region.into(),
            addressing_style: AddressingStyle::default(),
            credentials,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_addressing_style(mut self, addressing_style: AddressingStyle) -> Self {
        self.addressing_style = addressing_style;
        self
    }

    /// Resolve the S3 client configuration from `vars`
    pub fn for_s3(vars: &impl EnvSource) -> Result<Self, ConfigError> {
        let credentials = CredentialsSource::for_s3(vars)?;
        let addressing_style =
            AddressingStyle::parse_lenient(&vars.get_or(env::S3_ADDRESSING_STYLE, "virtual"));

        Ok(Self::new(
            resolve_endpoint(vars, Service::S3),
            resolve_region(vars, Service::S3),
            credentials,
        )?
        .with_addressing_style(addressing_style))
    }

    /// Resolve the IAM client configuration from `vars`
    pub fn for_iam(vars: &impl EnvSource) -> Result<Self, ConfigError> {
        let credentials = CredentialsSource::for_iam(vars)?;
        Self::new(
            resolve_endpoint(vars, Service::Iam),
            resolve_region(vars, Service::Iam),
            credentials,
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn addressing_style(&self) -> AddressingStyle {
        self.addressing_style
    }

    pub fn credentials(&self) -> &CredentialsSource {
        &self.credentials
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_http_url(&self.endpoint) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid endpoint '{}': must start with http:// or https://",
                self.endpoint
            )));
        }

        if self.region.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Region cannot be empty".into(),
            ));
        }

        Ok(())
    }

    /// Load the shared SDK configuration: region plus the selected
    /// credentials provider. Endpoint overrides are applied per service.
    pub async fn load_sdk_config(&self) -> SdkConfig {
        let loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()));

        let loader = match &self.credentials {
            CredentialsSource::Static(credentials) => {
                loader.credentials_provider(credentials.to_sdk())
            }
            CredentialsSource::DefaultChain => loader,
        };

        loader.load().await
    }
}
