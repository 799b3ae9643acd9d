//! End-to-End Tests for the S3 scenarios
//!
//! Each test runs one scenario through the full harness against a live
//! backend and expects exit code 0 with nothing left behind.
//!
//! ## Test Categories
//!
//! - `scenarios`: every S3 scenario, plus a leak check on the backend

pub mod common;
pub mod scenarios;
