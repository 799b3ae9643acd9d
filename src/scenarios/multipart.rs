//! Multipart upload of two parts, verified by size and content
//!
//! The upload handle stays registered until the assembled object is deleted,
//! so a failure anywhere after initiation also aborts the upload.

use super::steps;
use crate::harness::{require_str, Handles, ScenarioContext, ScenarioError, StepExt};
use crate::io::bytes_body;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use bytes::Bytes;

pub const KEY: &str = "large/data.bin";
pub const CONTENT_TYPE: &str = "application/octet-stream";

const MIB: usize = 1024 * 1024;

/// Fill byte and length of each part, in part-number order
pub const PARTS: [(u8, usize); 2] = [(b'a', 5 * MIB), (b'b', 2 * MIB)];

/// Length of the assembled object
pub fn total_len(parts: &[(u8, usize)]) -> usize {
    parts.iter().map(|(_, len)| len).sum()
}

/// Whether `data` is exactly the concatenation of the `parts` runs
pub fn verify_assembly(data: &[u8], parts: &[(u8, usize)]) -> bool {
    if data.len() != total_len(parts) {
        return false;
    }
    let mut offset = 0;
    for &(fill, len) in parts {
        if !data[offset..offset + len].iter().all(|b| *b == fill) {
            return false;
        }
        offset += len;
    }
    true
}

const UPLOAD_STEPS: [&str; 2] = ["upload part1", "upload part2"];

pub async fn run(ctx: &ScenarioContext, handles: &mut Handles) -> Result<(), ScenarioError> {
    let s3 = ctx.s3();
    let bucket = ctx.bucket();
    let r = ctx.reporter();

    steps::create_bucket(ctx, handles).await?;

    let created = s3
        .create_multipart_upload()
        .bucket(bucket)
        .key(KEY)
        .content_type(CONTENT_TYPE)
        .send()
        .await
        .api_step("init MPU")?;
    let upload_id = require_str("init MPU", "UploadId", created.upload_id().map(str::to_string))?;
    handles.track_upload(KEY, &upload_id);
    r.step(format!("Initiated MPU: {upload_id}"));

    let mut completed = Vec::with_capacity(PARTS.len());
    for (index, (&(fill, len), step)) in PARTS.iter().zip(UPLOAD_STEPS).enumerate() {
        let part_number = index as i32 + 1;
        let uploaded = s3
            .upload_part()
            .bucket(bucket)
            .key(KEY)
            .upload_id(&upload_id)
            .part_number(part_number)
            .body(bytes_body(Bytes::from(vec![fill; len])))
            .send()
            .await
            .api_step(step)?;
        let e_tag = require_str(step, "ETag", uploaded.e_tag().map(str::to_string))?;
        completed.push(
            CompletedPart::builder()
                .part_number(part_number)
                .e_tag(e_tag)
                .build(),
        );
        r.step(format!("Uploaded part {part_number}"));
    }

    handles.track_object(KEY);
    let finished = s3
        .complete_multipart_upload()
        .bucket(bucket)
        .key(KEY)
        .upload_id(&upload_id)
        .multipart_upload(
            CompletedMultipartUpload::builder()
                .set_parts(Some(completed))
                .build(),
        )
        .send()
        .await
        .api_step("complete MPU")?;
    require_str("complete MPU", "ETag", finished.e_tag().map(str::to_string))?;
    r.step("Completed MPU");

    let expected = total_len(&PARTS);
    let head = s3
        .head_object()
        .bucket(bucket)
        .key(KEY)
        .send()
        .await
        .api_step("head object")?;
    if head.content_length() != Some(expected as i64) {
        return Err(ScenarioError::mismatch("Head size mismatch after MPU"));
    }

    let data = steps::get_object(ctx, "get object", KEY).await?;
    if !verify_assembly(&data, &PARTS) {
        return Err(ScenarioError::mismatch(
            "Retrieved content mismatch after MPU",
        ));
    }
    r.step(format!("Verified assembled object ({expected} bytes)"));

    steps::delete_object(ctx, handles, KEY).await?;
    handles.forget_upload();
    r.step("Deleted object");

    steps::delete_bucket(ctx, handles).await
}
