//! Access key plus bucket-scoped policy
//!
//! Creates a bucket and an access key, attaches a policy that allows `s3:*`
//! on that bucket only, verifies the attachment and tears everything down in
//! reverse order. With `IAM_POLICY_ENFORCEMENT=true` the new key is also used
//! to check that the policy is actually enforced.
//!
//! The access-key id doubles as the user name for the user-scoped calls.

use super::{access_key, steps};
use crate::config::ClientConfig;
use crate::harness::{
    bucket_name, exit, require_str, Handles, ScenarioContext, ScenarioError, StepExt,
};
use crate::iam::{policy_name, PolicyDocument};
use crate::io::bytes_body;
use crate::s3::{new_s3_client, CredentialsSource, StaticCredentials};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use bytes::Bytes;
use chrono::Utc;

/// Object written with the new key during the enforcement phase
pub const PROBE_KEY: &str = "policy-probe.txt";
const PROBE_BODY: &[u8] = b"policy probe\n";

/// Prefix of the bucket the new key must not be able to create
const OUTSIDE_PREFIX: &str = "iam-policy-outside";

pub async fn run(ctx: &ScenarioContext, handles: &mut Handles) -> Result<(), ScenarioError> {
    let s3 = ctx.s3();
    let iam = ctx.iam();
    let bucket = ctx.bucket();
    let r = ctx.reporter();

    steps::send_create_bucket(ctx, handles).await?;
    r.step(format!("Created test bucket: {bucket}"));

    let key = access_key::create_access_key(ctx, handles, ctx.enforce_policy()).await?;
    let user_name = key.id.clone();
    handles.track_user(&user_name);

    access_key::verify_listed(ctx, &key.id).await?;

    let document = PolicyDocument::bucket_full_access(bucket)
        .to_json()
        .map_err(|e| ScenarioError::api("create policy", e).with_exit_code(exit::POLICY_CREATE))?;
    let name = policy_name();
    let created = iam
        .create_policy()
        .policy_name(&name)
        .policy_document(document)
        .description(format!("Allow all S3 operations on bucket {bucket}"))
        .send()
        .await
        .api_step("create policy")
        .map_err(|e| e.with_exit_code(exit::POLICY_CREATE))?;
    let policy_arn = require_str(
        "create policy",
        "Policy.Arn",
        created.policy().and_then(|p| p.arn()).map(str::to_string),
    )
    .map_err(|e| e.with_exit_code(exit::POLICY_CREATE))?;
    handles.track_policy(&policy_arn);
    r.step(format!("Created policy: {name}"));
    r.step(format!("Policy ARN: {policy_arn}"));

    iam.attach_user_policy()
        .user_name(&user_name)
        .policy_arn(&policy_arn)
        .send()
        .await
        .api_step("attach user policy")?;
    r.step("Attached policy to access key (user)");

    let attached = iam
        .list_attached_user_policies()
        .user_name(&user_name)
        .send()
        .await
        .api_step("list attached user policies")?;
    if !attached
        .attached_policies()
        .iter()
        .any(|p| p.policy_arn() == Some(policy_arn.as_str()))
    {
        return Err(ScenarioError::mismatch("Policy not found in attached policies")
            .with_exit_code(exit::POLICY_NOT_ATTACHED));
    }
    r.step("Verified policy attachment");

    if ctx.enforce_policy() {
        let secret = key.secret.ok_or_else(|| {
            ScenarioError::missing("create access key", "SecretAccessKey")
                .with_exit_code(exit::SECRET_MISSING)
        })?;
        verify_enforcement(ctx, handles, &key.id, secret).await?;
    }

    access_key::deactivate(ctx, &key.id).await?;

    iam.detach_user_policy()
        .user_name(&user_name)
        .policy_arn(&policy_arn)
        .send()
        .await
        .api_step("detach user policy")?;
    r.step("Detached policy from access key (user)");

    iam.delete_policy()
        .policy_arn(&policy_arn)
        .send()
        .await
        .api_step("delete policy")?;
    handles.forget_policy();
    r.step("Deleted policy");

    access_key::delete_access_key(ctx, handles, &key.id).await?;

    s3.delete_bucket()
        .bucket(bucket)
        .send()
        .await
        .api_step("delete bucket")?;
    handles.forget_bucket();
    r.step(format!("Deleted test bucket: {bucket}"));

    Ok(())
}

/// Exercise the policy with an S3 client signed by the new key: the allowed
/// bucket must be reachable and writable, any other bucket must be refused.
async fn verify_enforcement(
    ctx: &ScenarioContext,
    handles: &mut Handles,
    access_key_id: &str,
    secret: String,
) -> Result<(), ScenarioError> {
    let r = ctx.reporter();
    let bucket = ctx.bucket();

    let base = ctx.s3_config();
    let config = ClientConfig::new(
        base.endpoint(),
        base.region(),
        CredentialsSource::Static(StaticCredentials::new(access_key_id, secret)),
    )?
    .with_addressing_style(base.addressing_style());
    let scoped = new_s3_client(&config).await;

    scoped
        .head_bucket()
        .bucket(bucket)
        .send()
        .await
        .api_step("head allowed bucket")
        .map_err(|e| e.with_exit_code(exit::ALLOWED_BUCKET_DENIED))?;
    r.step("Allowed bucket reachable with new key");

    let outside = bucket_name(OUTSIDE_PREFIX, Utc::now());
    match scoped.create_bucket().bucket(&outside).send().await {
        Ok(_) => {
            if let Err(err) = ctx.s3().delete_bucket().bucket(&outside).send().await {
                tracing::debug!(bucket = %outside, error = %DisplayErrorContext(&err), "failed to remove stray bucket");
            }
            return Err(ScenarioError::mismatch(format!(
                "Bucket outside the policy could be created: {outside}"
            ))
            .with_exit_code(exit::POLICY_NOT_ENFORCED));
        }
        Err(err) => match err.code() {
            Some("AccessDenied" | "Forbidden") => {
                r.step("Bucket outside the policy refused");
            }
            code => {
                let code = code.unwrap_or("unknown");
                tracing::debug!(bucket = %outside, code, "create outside bucket failed without AccessDenied");
                r.failure(format!(
                    "WARNING: Expected AccessDenied but got {code}: {}",
                    DisplayErrorContext(&err)
                ));
            }
        },
    }

    handles.track_object(PROBE_KEY);
    scoped
        .put_object()
        .bucket(bucket)
        .key(PROBE_KEY)
        .body(bytes_body(Bytes::from_static(PROBE_BODY)))
        .send()
        .await
        .api_step("put object with new key")
        .map_err(|e| e.with_exit_code(exit::ALLOWED_WRITE_DENIED))?;
    scoped
        .delete_object()
        .bucket(bucket)
        .key(PROBE_KEY)
        .send()
        .await
        .api_step("delete object with new key")
        .map_err(|e| e.with_exit_code(exit::ALLOWED_WRITE_DENIED))?;
    handles.forget_object(PROBE_KEY);
    r.step("Wrote and deleted object with new key");

    Ok(())
}
