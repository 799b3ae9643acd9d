//! Bucket lifecycle: create, head, find in the listing, delete

use super::steps;
use crate::harness::{Handles, ScenarioContext, ScenarioError, StepExt};

pub async fn run(ctx: &ScenarioContext, handles: &mut Handles) -> Result<(), ScenarioError> {
    let s3 = ctx.s3();
    let bucket = ctx.bucket();

    steps::create_bucket(ctx, handles).await?;

    s3.head_bucket()
        .bucket(bucket)
        .send()
        .await
        .api_step("head bucket")?;
    ctx.reporter().step("Head bucket OK");

    let listed = s3.list_buckets().send().await.api_step("list buckets")?;
    if !listed.buckets().iter().any(|b| b.name() == Some(bucket)) {
        return Err(ScenarioError::mismatch(
            "Created bucket not found in list_buckets()",
        ));
    }
    ctx.reporter().step("List buckets contains created bucket");

    steps::delete_bucket(ctx, handles).await
}
