//! External tag-probe capability
//!
//! Formats this core does not parse natively (FLAC, OGG, MP4/M4A, AAC,
//! WMA, APE, ALAC, ...) are delegated to a collaborator-supplied probe
//! that wraps an existing container/metadata library. The core only knows
//! this trait; the `provider-lofty` crate ships the default adapter.

use async_trait::async_trait;
use std::path::Path;

use crate::models::DurationResult;

/// Collaborator-supplied duration probe for non-native formats.
///
/// `None` means the probe could not produce a result for this file; the
/// resolver then reports the file as `Unsupported`. Implementations must
/// not panic on malformed input.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExternalTagProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> Option<DurationResult>;
}
