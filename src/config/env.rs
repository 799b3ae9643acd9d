//! Environment variable lookup
//!
//! Every knob the smoke tests understand comes from the process environment.
//! Lookups go through [`EnvSource`] so the resolution rules can be exercised
//! against an in-memory map.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

pub const S3_ENDPOINT: &str = "S3_ENDPOINT";
pub const IAM_ENDPOINT: &str = "IAM_ENDPOINT";
pub const S3_REGION: &str = "S3_REGION";
pub const IAM_REGION: &str = "IAM_REGION";
pub const AWS_REGION: &str = "AWS_REGION";
pub const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
pub const S3_ACCESS_KEY: &str = "S3_ACCESS_KEY";
pub const S3_SECRET_KEY: &str = "S3_SECRET_KEY";
pub const S3_ADDRESSING_STYLE: &str = "S3_ADDRESSING_STYLE";
pub const S3_CREDENTIALS_SOURCE: &str = "S3_CREDENTIALS_SOURCE";
pub const IAM_CREDENTIALS_SOURCE: &str = "IAM_CREDENTIALS_SOURCE";
pub const IAM_POLICY_ENFORCEMENT: &str = "IAM_POLICY_ENFORCEMENT";
pub const BUCKET_PREFIX: &str = "BUCKET_PREFIX";

/// Source of environment variables
pub trait EnvSource {
    /// Raw value of `name`, if set
    fn var(&self, name: &str) -> Option<String>;

    /// Value of `name` if set and non-empty
    fn non_empty(&self, name: &str) -> Option<String> {
        self.var(name).filter(|value| !value.is_empty())
    }

    /// Value of `name` if set and non-empty, otherwise `default`
    fn get_or(&self, name: &str, default: &str) -> String {
        self.non_empty(name).unwrap_or_else(|| default.to_string())
    }

    /// Boolean flag: `1`, `true`, `yes` and `on` (any case) enable it
    fn flag(&self, name: &str) -> bool {
        self.non_empty(name).is_some_and(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<K, V> EnvSource for HashMap<K, V>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
{
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).map(|value| value.as_ref().to_string())
    }
}

/// Read `name` from the process environment, falling back to `default` when
/// the variable is unset or empty.
pub fn env(name: &str, default: &str) -> String {
    ProcessEnv.get_or(name, default)
}
