//! E2E Scenario Tests
//!
//! Every S3 scenario must succeed against the live backend and leave its
//! bucket deleted.

use super::common::live_context;
use s3_smoke::harness::{exit, run_scenario};
use s3_smoke::Scenario;
use std::future::pending;

async fn assert_scenario_passes(scenario: Scenario) {
    crate::skip_if_no_s3!();

    let (ctx, captured) = live_context(scenario).await;
    let code = run_scenario(scenario, &ctx, pending()).await;
    assert_eq!(
        code,
        exit::SUCCESS,
        "{scenario} failed\nstdout:\n{}\nstderr:\n{}",
        captured.stdout(),
        captured.stderr()
    );

    // Nothing may be left behind
    let head = ctx.s3().head_bucket().bucket(ctx.bucket()).send().await;
    assert!(head.is_err(), "bucket {} still exists", ctx.bucket());
}

#[tokio::test]
async fn test_bucket_lifecycle_against_backend() {
    assert_scenario_passes(Scenario::BucketLifecycle).await;
}

#[tokio::test]
async fn test_object_crud_against_backend() {
    assert_scenario_passes(Scenario::ObjectCrud).await;
}

#[tokio::test]
async fn test_basics_against_backend() {
    assert_scenario_passes(Scenario::Basics).await;
}

#[tokio::test]
async fn test_copy_against_backend() {
    assert_scenario_passes(Scenario::CopyObject).await;
}

#[tokio::test]
async fn test_multipart_against_backend() {
    assert_scenario_passes(Scenario::Multipart).await;
}
