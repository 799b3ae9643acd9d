//! Body helpers
//!
//! Adapters between in-memory buffers and SDK byte streams.

use aws_sdk_s3::primitives::{ByteStream, ByteStreamError};
use bytes::Bytes;
use thiserror::Error;

/// Response body errors
#[derive(Error, Debug)]
pub enum BodyError {
    #[error("Failed to read response body: {0}")]
    ReadError(#[from] ByteStreamError),
}

/// Wrap an in-memory buffer as a request body
pub fn bytes_body(bytes: impl Into<Bytes>) -> ByteStream {
    ByteStream::from(bytes.into())
}

/// Drain a response body completely.
///
/// The stream is taken by value so it is released on every path, including
/// read errors.
pub async fn read_all(body: ByteStream) -> Result<Bytes, BodyError> {
    let aggregated = body.collect().await?;
    Ok(aggregated.into_bytes())
}
