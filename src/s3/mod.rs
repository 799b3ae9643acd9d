//! S3 Client module
//!
//! Builds the `aws-sdk-s3` client used by every object-storage scenario.
//!
//! The factory pins the client to the resolved endpoint, region and
//! addressing style, overriding whatever endpoint inference the SDK would
//! otherwise perform. Request and response checksums are only computed when an
//! operation requires them so that bodies reach S3-compatible services
//! verbatim.
//!
//! # Example
//!
//! ```no_run
//! use s3_smoke::config::{ClientConfig, ProcessEnv};
//! use s3_smoke::s3::new_s3_client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::for_s3(&ProcessEnv)?;
//! let client = new_s3_client(&config).await;
//! let buckets = client.list_buckets().send().await?;
//! println!("{} buckets", buckets.buckets().len());
//! # Ok(())
//! # }
//! ```

use crate::config::ClientConfig;
use aws_config::Region;
use aws_sdk_s3::config::{RequestChecksumCalculation, ResponseChecksumValidation};
use aws_sdk_s3::Client;

pub mod credentials;

pub use credentials::{mask_access_key, CredentialsSource, StaticCredentials};

/// Create an S3 client bound to `config`
#[tracing::instrument(
    name = "s3.client",
    skip(config),
    fields(
        endpoint = %config.endpoint(),
        region = %config.region(),
        addressing = %config.addressing_style(),
        credentials = config.credentials().describe()
    )
)]
pub async fn new_s3_client(config: &ClientConfig) -> Client {
    let sdk_config = config.load_sdk_config().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .endpoint_url(config.endpoint())
        .region(Region::new(config.region().to_string()))
        .force_path_style(config.addressing_style().force_path_style())
        .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
        .response_checksum_validation(ResponseChecksumValidation::WhenRequired)
        .build();

    tracing::debug!("S3 client configured");

    Client::from_conf(s3_config)
}
