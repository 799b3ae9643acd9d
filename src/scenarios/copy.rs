//! Server-side copy from one key to another in the same bucket

use super::steps;
use crate::harness::{Handles, ScenarioContext, ScenarioError, StepExt};

pub const SOURCE_KEY: &str = "src/hello.txt";
pub const DEST_KEY: &str = "dst/hello-copy.txt";
pub const BODY: &[u8] = b"hello copy api\n";

/// `<bucket>/<key>` as sent in `x-amz-copy-source`
pub fn copy_source(bucket: &str, key: &str) -> String {
    format!("{bucket}/{key}")
}

pub async fn run(ctx: &ScenarioContext, handles: &mut Handles) -> Result<(), ScenarioError> {
    let bucket = ctx.bucket();
    let r = ctx.reporter();

    steps::create_bucket(ctx, handles).await?;

    steps::put_object(ctx, handles, "put src object", SOURCE_KEY, BODY).await?;
    r.step("Put source object");

    handles.track_object(DEST_KEY);
    ctx.s3()
        .copy_object()
        .bucket(bucket)
        .key(DEST_KEY)
        .copy_source(copy_source(bucket, SOURCE_KEY))
        .send()
        .await
        .api_step("copy object")?;
    r.step("Copied object");

    let data = steps::get_object(ctx, "get dst object", DEST_KEY).await?;
    if data.as_ref() != BODY {
        return Err(ScenarioError::mismatch("Copied object content mismatch"));
    }
    r.step("Copy verification OK");

    steps::delete_object(ctx, handles, DEST_KEY).await?;
    steps::delete_object(ctx, handles, SOURCE_KEY).await?;
    r.step("Deleted objects");

    steps::delete_bucket(ctx, handles).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_source_is_bucket_slash_key() {
        assert_eq!(
            copy_source("copytest-20240101000000-abcd1234", SOURCE_KEY),
            "copytest-20240101000000-abcd1234/src/hello.txt"
        );
    }
}
