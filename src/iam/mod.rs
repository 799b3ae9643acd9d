//! IAM Client module
//!
//! Builds the `aws-sdk-iam` client for the access-key scenarios and the
//! bucket-scoped policy document they attach.
//!
//! In the target service dialect the user-scoped IAM calls
//! (`AttachUserPolicy`, `ListAttachedUserPolicies`, `DetachUserPolicy`) take
//! the access-key id as the user name. There is no separate user entity.

use crate::config::ClientConfig;
use aws_config::Region;
use aws_sdk_iam::Client;
use serde::{Deserialize, Serialize};

/// IAM policy language version
pub const POLICY_VERSION: &str = "2012-10-17";

/// Create an IAM client bound to `config`
#[tracing::instrument(
    name = "iam.client",
    skip(config),
    fields(
        endpoint = %config.endpoint(),
        region = %config.region(),
        credentials = config.credentials().describe()
    )
)]
pub async fn new_iam_client(config: &ClientConfig) -> Client {
    let sdk_config = config.load_sdk_config().await;

    let iam_config = aws_sdk_iam::config::Builder::from(&sdk_config)
        .endpoint_url(config.endpoint())
        .region(Region::new(config.region().to_string()))
        .build();

    tracing::debug!("IAM client configured");

    Client::from_conf(iam_config)
}

/// Unique policy name: `S3BucketPolicy-<uuid>`
pub fn policy_name() -> String {
    format!("S3BucketPolicy-{}", uuid::Uuid::new_v4())
}

/// IAM policy document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

/// Single policy statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub effect: String,
    pub action: String,
    pub resource: Vec<String>,
}

impl PolicyDocument {
    /// Allow `s3:*` on `bucket` and every object in it
    pub fn bucket_full_access(bucket: &str) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement: vec![Statement {
                effect: "Allow".to_string(),
                action: "s3:*".to_string(),
                resource: vec![
                    format!("arn:aws:s3:::{bucket}"),
                    format!("arn:aws:s3:::{bucket}/*"),
                ],
            }],
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
