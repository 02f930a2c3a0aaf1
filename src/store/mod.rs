//! Object storage capability
//!
//! Rotated log files are uploaded through the `ObjectStore` trait. Two
//! implementations exist:
//!
//! - [`s3::S3Store`]: production backend on AWS S3 (or any S3-compatible
//!   endpoint)
//! - [`memory::MemoryStore`]: in-memory backend for tests
//!
//! The trait is deliberately minimal: the pipeline only ever writes whole
//! objects, never reads them back.

pub mod error;
pub mod memory;
pub mod s3;

use async_trait::async_trait;

pub use error::{StoreError, StoreResult};

/// Write-only object storage used by the upload dispatcher
///
/// Implementations must be `Send + Sync` as uploads for different rotated
/// files run as independent tasks.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key` in `bucket`
    ///
    /// There is no exactly-once guarantee: a failed put leaves the local
    /// rotated file in place and an operator re-triggers the upload.
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> StoreResult<()>;
}
