//! Basics: put a small object and read it back

use super::steps;
use crate::harness::{Handles, ScenarioContext, ScenarioError};

pub const KEY: &str = "hello.txt";
pub const BODY: &[u8] = b"hello world\n";

pub async fn run(ctx: &ScenarioContext, handles: &mut Handles) -> Result<(), ScenarioError> {
    let r = ctx.reporter();

    steps::create_bucket(ctx, handles).await?;

    steps::put_object(ctx, handles, "put object", KEY, BODY).await?;
    r.step(format!("Put object: {KEY}"));

    let data = steps::get_object(ctx, "get object", KEY).await?;
    if data.as_ref() != BODY {
        return Err(ScenarioError::mismatch("content mismatch"));
    }
    r.step(format!("Got object: {KEY} ({} bytes)", data.len()));

    steps::delete_object(ctx, handles, KEY).await?;
    r.step(format!("Deleted object: {KEY}"));

    steps::delete_bucket(ctx, handles).await
}
