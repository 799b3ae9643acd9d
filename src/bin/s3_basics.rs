//! Put/get smoke test
#![recursion_limit = "256"]

use s3_smoke::harness::main_for;
use s3_smoke::Scenario;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    main_for(Scenario::Basics).await
}
