//! Access key lifecycle: create, list, deactivate, delete

use crate::harness::{require_str, Handles, ScenarioContext, ScenarioError, StepExt};
use crate::s3::mask_access_key;
use aws_sdk_iam::types::{AccessKey, StatusType};

/// A freshly issued key. The secret is only retained when asked for.
pub(crate) struct IssuedKey {
    pub id: String,
    pub secret: Option<String>,
}

/// Create an access key and register it for cleanup
pub(crate) async fn create_access_key(
    ctx: &ScenarioContext,
    handles: &mut Handles,
    keep_secret: bool,
) -> Result<IssuedKey, ScenarioError> {
    const STEP: &str = "create access key";

    let created = ctx
        .iam()
        .create_access_key()
        .send()
        .await
        .api_step(STEP)?;
    let key = Option::<AccessKey>::from(created.access_key)
        .ok_or_else(|| ScenarioError::missing(STEP, "AccessKey"))?;
    let id = require_str(STEP, "AccessKeyId", key.access_key_id)?;
    handles.track_access_key(&id);
    let secret = if keep_secret {
        require_str(STEP, "SecretAccessKey", key.secret_access_key).ok()
    } else {
        None
    };

    tracing::debug!(access_key = %mask_access_key(&id), "access key issued");
    ctx.reporter()
        .step(format!("Created access key: {}", mask_access_key(&id)));
    Ok(IssuedKey { id, secret })
}

/// Fail with a verification error unless `id` shows up in the key listing
pub(crate) async fn verify_listed(ctx: &ScenarioContext, id: &str) -> Result<(), ScenarioError> {
    let listed = ctx
        .iam()
        .list_access_keys()
        .send()
        .await
        .api_step("list access keys")?;
    if !listed
        .access_key_metadata()
        .iter()
        .any(|meta| meta.access_key_id() == Some(id))
    {
        return Err(ScenarioError::mismatch(
            "Created access key not found in list_access_keys",
        ));
    }
    ctx.reporter().step("Listed access keys (found created key)");
    Ok(())
}

pub(crate) async fn deactivate(ctx: &ScenarioContext, id: &str) -> Result<(), ScenarioError> {
    ctx.iam()
        .update_access_key()
        .access_key_id(id)
        .status(StatusType::Inactive)
        .send()
        .await
        .api_step("update access key")?;
    ctx.reporter().step("Updated access key to inactive");
    Ok(())
}

pub(crate) async fn delete_access_key(
    ctx: &ScenarioContext,
    handles: &mut Handles,
    id: &str,
) -> Result<(), ScenarioError> {
    ctx.iam()
        .delete_access_key()
        .access_key_id(id)
        .send()
        .await
        .api_step("delete access key")?;
    handles.forget_access_key();
    ctx.reporter().step("Deleted access key");
    Ok(())
}

pub async fn run(ctx: &ScenarioContext, handles: &mut Handles) -> Result<(), ScenarioError> {
    let key = create_access_key(ctx, handles, false).await?;
    verify_listed(ctx, &key.id).await?;
    deactivate(ctx, &key.id).await?;
    delete_access_key(ctx, handles, &key.id).await
}
