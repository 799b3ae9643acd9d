//! Object CRUD: put with content type and metadata, head, get, list by
//! prefix, delete

use super::steps;
use crate::harness::{Handles, ScenarioContext, ScenarioError, StepExt};
use crate::io::bytes_body;
use bytes::Bytes;

pub const KEY: &str = "folder/hello.txt";
pub const PREFIX: &str = "folder/";
pub const BODY: &[u8] = b"hello object api\n";
pub const CONTENT_TYPE: &str = "text/plain";

pub async fn run(ctx: &ScenarioContext, handles: &mut Handles) -> Result<(), ScenarioError> {
    let s3 = ctx.s3();
    let bucket = ctx.bucket();
    let r = ctx.reporter();

    steps::create_bucket(ctx, handles).await?;

    handles.track_object(KEY);
    s3.put_object()
        .bucket(bucket)
        .key(KEY)
        .content_type(CONTENT_TYPE)
        .metadata("owner", "examples")
        .body(bytes_body(Bytes::from_static(BODY)))
        .send()
        .await
        .api_step("put object")?;
    r.step("Put object");

    let head = s3
        .head_object()
        .bucket(bucket)
        .key(KEY)
        .send()
        .await
        .api_step("head object")?;
    if head.content_length() != Some(BODY.len() as i64) {
        return Err(ScenarioError::mismatch(format!(
            "Head object content length mismatch: expected {}, got {:?}",
            BODY.len(),
            head.content_length()
        )));
    }
    r.step("Head object OK");

    let data = steps::get_object(ctx, "get object", KEY).await?;
    if data.as_ref() != BODY {
        return Err(ScenarioError::mismatch("Get object content mismatch"));
    }
    r.step("Get object OK");

    let listed = s3
        .list_objects_v2()
        .bucket(bucket)
        .prefix(PREFIX)
        .send()
        .await
        .api_step("list objects v2")?;
    if !listed.contents().iter().any(|o| o.key() == Some(KEY)) {
        return Err(ScenarioError::mismatch(
            "Object not found in list_objects_v2",
        ));
    }
    r.step("ListObjectsV2 OK");

    steps::delete_object(ctx, handles, KEY).await?;
    r.step("Deleted object");

    steps::delete_bucket(ctx, handles).await
}
