//! Smoke-test scenarios
//!
//! Each scenario is an async function over a [`ScenarioContext`] and the
//! driver-owned [`Handles`]. Scenarios register a resource the moment it
//! exists and clear it right after their own explicit teardown succeeds.

use crate::harness::{Handles, ScenarioContext, ScenarioError};
use clap::ValueEnum;
use std::fmt;

pub mod access_key;
pub mod basics;
pub mod bucket;
pub mod copy;
pub mod multipart;
pub mod object;
pub mod policy;

mod steps;

/// The available scenarios, named after their executables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Scenario {
    /// Create, head, list and delete a bucket
    #[value(name = "s3-bucket-test")]
    BucketLifecycle,
    /// Put, head, get, list and delete an object
    #[value(name = "s3-object-test")]
    ObjectCrud,
    /// Put and get a small object
    #[value(name = "s3-basics")]
    Basics,
    /// Server-side copy between keys
    #[value(name = "s3-copy-test")]
    CopyObject,
    /// Two-part multipart upload
    #[value(name = "s3-multipart-test")]
    Multipart,
    /// Access key lifecycle
    #[value(name = "iam-access-key-test")]
    IamAccessKey,
    /// Access key plus bucket-scoped policy
    #[value(name = "iam-policy-test")]
    IamPolicy,
}

impl Scenario {
    /// Every scenario, in the order the umbrella CLI runs them
    pub const ALL: [Scenario; 7] = [
        Scenario::BucketLifecycle,
        Scenario::ObjectCrud,
        Scenario::Basics,
        Scenario::CopyObject,
        Scenario::Multipart,
        Scenario::IamAccessKey,
        Scenario::IamPolicy,
    ];

    pub fn binary_name(&self) -> &'static str {
        match self {
            Self::BucketLifecycle => "s3-bucket-test",
            Self::ObjectCrud => "s3-object-test",
            Self::Basics => "s3-basics",
            Self::CopyObject => "s3-copy-test",
            Self::Multipart => "s3-multipart-test",
            Self::IamAccessKey => "iam-access-key-test",
            Self::IamPolicy => "iam-policy-test",
        }
    }

    /// Subject of the final success line
    pub fn title(&self) -> &'static str {
        match self {
            Self::BucketLifecycle => "Bucket lifecycle test",
            Self::ObjectCrud => "Object CRUD test",
            Self::Basics => "basics test",
            Self::CopyObject => "Copy object test",
            Self::Multipart => "Multipart upload test",
            Self::IamAccessKey => "IAM access key test",
            Self::IamPolicy => "IAM access key and policy test",
        }
    }

    /// Bucket-name prefix used when `BUCKET_PREFIX` is unset.
    ///
    /// The access-key scenario creates no bucket; its name is generated but
    /// never used.
    pub fn default_bucket_prefix(&self) -> &'static str {
        match self {
            Self::BucketLifecycle => "acs-bucket-test",
            Self::ObjectCrud => "objecttest",
            Self::Basics => "smoketest",
            Self::CopyObject => "copytest",
            Self::Multipart => "mpuploadtest",
            Self::IamAccessKey => "iam-access-key-test",
            Self::IamPolicy => "iam-policy-test",
        }
    }

    /// Whether the banner describes the IAM identity instead of a bucket
    pub fn is_iam(&self) -> bool {
        matches!(self, Self::IamAccessKey | Self::IamPolicy)
    }

    /// Run the scenario body. Cleanup of `handles` is the caller's job.
    pub async fn run(
        self,
        ctx: &ScenarioContext,
        handles: &mut Handles,
    ) -> Result<(), ScenarioError> {
        match self {
            Self::BucketLifecycle => bucket::run(ctx, handles).await,
            Self::ObjectCrud => object::run(ctx, handles).await,
            Self::Basics => basics::run(ctx, handles).await,
            Self::CopyObject => copy::run(ctx, handles).await,
            Self::Multipart => multipart::run(ctx, handles).await,
            Self::IamAccessKey => access_key::run(ctx, handles).await,
            Self::IamPolicy => policy::run(ctx, handles).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary_name())
    }
}
