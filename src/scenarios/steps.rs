//! S3 steps shared by several scenarios

use crate::harness::{Handles, ScenarioContext, ScenarioError, StepExt};
use crate::io::{bytes_body, read_all};
use aws_sdk_s3::error::SdkError;
use bytes::Bytes;

/// Create the context bucket. It is tracked before the request is sent, so a
/// create interrupted in flight is still deleted; an outright refusal from the
/// service untracks it again.
pub(crate) async fn send_create_bucket(
    ctx: &ScenarioContext,
    handles: &mut Handles,
) -> Result<(), ScenarioError> {
    handles.track_bucket(ctx.bucket());
    let result = ctx.s3().create_bucket().bucket(ctx.bucket()).send().await;
    if let Err(SdkError::ServiceError(_)) = &result {
        handles.forget_bucket();
    }
    result.api_step("create bucket")?;
    Ok(())
}

pub(crate) async fn create_bucket(
    ctx: &ScenarioContext,
    handles: &mut Handles,
) -> Result<(), ScenarioError> {
    send_create_bucket(ctx, handles).await?;
    ctx.reporter().step("Created bucket");
    Ok(())
}

pub(crate) async fn delete_bucket(
    ctx: &ScenarioContext,
    handles: &mut Handles,
) -> Result<(), ScenarioError> {
    ctx.s3()
        .delete_bucket()
        .bucket(ctx.bucket())
        .send()
        .await
        .api_step("delete bucket")?;
    handles.forget_bucket();
    ctx.reporter().step("Deleted bucket");
    Ok(())
}

/// Put `body` under `key`. The key is registered before the request so a
/// partially applied write is still removed.
pub(crate) async fn put_object(
    ctx: &ScenarioContext,
    handles: &mut Handles,
    step: &'static str,
    key: &str,
    body: &'static [u8],
) -> Result<(), ScenarioError> {
    handles.track_object(key);
    ctx.s3()
        .put_object()
        .bucket(ctx.bucket())
        .key(key)
        .body(bytes_body(Bytes::from_static(body)))
        .send()
        .await
        .api_step(step)?;
    Ok(())
}

/// Get `key` and drain its body
pub(crate) async fn get_object(
    ctx: &ScenarioContext,
    step: &'static str,
    key: &str,
) -> Result<Bytes, ScenarioError> {
    let output = ctx
        .s3()
        .get_object()
        .bucket(ctx.bucket())
        .key(key)
        .send()
        .await
        .api_step(step)?;
    read_all(output.body).await.api_step("read body")
}

pub(crate) async fn delete_object(
    ctx: &ScenarioContext,
    handles: &mut Handles,
    key: &str,
) -> Result<(), ScenarioError> {
    ctx.s3()
        .delete_object()
        .bucket(ctx.bucket())
        .key(key)
        .send()
        .await
        .api_step("delete object")?;
    handles.forget_object(key);
    Ok(())
}
