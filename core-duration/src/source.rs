//! File byte access abstraction
//!
//! Parsers work over whole-file byte buffers; where those bytes come from
//! is a host concern. Desktop hosts use [`FsByteSource`]; tests use an
//! in-memory map.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

use crate::error::Result;

/// Supplies the raw bytes of a file identified by path.
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Read the entire file into memory. Whole-file access is assumed;
    /// streaming parse of larger-than-memory files is out of scope.
    async fn read_file(&self, path: &Path) -> Result<Bytes>;
}

/// Direct filesystem implementation over `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsByteSource;

#[async_trait]
impl ByteSource for FsByteSource {
    async fn read_file(&self, path: &Path) -> Result<Bytes> {
        let data = tokio::fs::read(path).await?;
        Ok(Bytes::from(data))
    }
}
