//! Per-file duration resolution
//!
//! One dispatch point replaces the original per-format scanners: the
//! descriptor's normalized extension picks the native parser (WAV, MP3,
//! GSM) or falls through to the external tag probe. The resolver contract
//! guarantees that no per-file failure ever propagates outward; everything
//! becomes a [`DurationResult`] with the appropriate status.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::gsm::GsmEstimator;
use crate::models::{AudioFileDescriptor, DurationResult};
use crate::mp3::Mp3Parser;
use crate::probe::ExternalTagProbe;
use crate::source::ByteSource;
use crate::wav::WavParser;

/// Dispatches a file to the correct parser and normalizes all outcomes
/// into one result shape.
#[derive(Default, Clone)]
pub struct DurationResolver {
    probe: Option<Arc<dyn ExternalTagProbe>>,
}

impl DurationResolver {
    /// Resolver with no external probe: only WAV, MP3 and GSM are handled,
    /// everything else reports `Unsupported`.
    pub fn new() -> Self {
        Self { probe: None }
    }

    /// Resolver that delegates non-native formats to the given probe.
    pub fn with_probe(probe: Arc<dyn ExternalTagProbe>) -> Self {
        Self { probe: Some(probe) }
    }

    /// Resolve one file to a duration result. Never returns an error:
    /// unobtainable bytes and parser failures become `Unreadable`,
    /// unhandled extensions become `Unsupported`.
    pub async fn resolve(
        &self,
        descriptor: &AudioFileDescriptor,
        source: &dyn ByteSource,
    ) -> DurationResult {
        debug!(
            "resolving {} ({} bytes, .{})",
            descriptor.path.display(),
            descriptor.size_bytes,
            descriptor.extension
        );
        match descriptor.extension.as_str() {
            "wav" => match source.read_file(&descriptor.path).await {
                Ok(bytes) => WavParser::parse(&bytes),
                Err(e) => Self::read_failure(descriptor, e),
            },
            "mp3" => match source.read_file(&descriptor.path).await {
                Ok(bytes) => Mp3Parser::parse(&bytes),
                Err(e) => Self::read_failure(descriptor, e),
            },
            // Fixed-frame codec: the size on the descriptor is all we need.
            "gsm" => GsmEstimator::estimate(descriptor.size_bytes),
            other => match &self.probe {
                Some(probe) => match probe.probe(&descriptor.path).await {
                    Some(result) => result,
                    None => {
                        debug!(
                            "probe declined {} (.{})",
                            descriptor.path.display(),
                            other
                        );
                        DurationResult::unsupported()
                    }
                },
                None => DurationResult::unsupported(),
            },
        }
    }

    fn read_failure(
        descriptor: &AudioFileDescriptor,
        error: crate::error::DurationError,
    ) -> DurationResult {
        warn!(
            "could not obtain bytes for {}: {}",
            descriptor.path.display(),
            error
        );
        DurationResult::unreadable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DurationError;
    use crate::models::DurationStatus;
    use crate::probe::MockExternalTagProbe;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    /// In-memory byte source for tests.
    struct MapSource(HashMap<PathBuf, Vec<u8>>);

    #[async_trait]
    impl ByteSource for MapSource {
        async fn read_file(&self, path: &Path) -> crate::error::Result<Bytes> {
            self.0
                .get(path)
                .map(|v| Bytes::from(v.clone()))
                .ok_or_else(|| {
                    DurationError::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        path.display().to_string(),
                    ))
                })
        }
    }

    fn tiny_wav() -> Vec<u8> {
        // 8000 Hz, mono, 8 bit, 8000 data bytes -> 1.0 s
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(4 + 24 + 8 + 8000u32).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&8000u32.to_le_bytes());
        out.extend_from_slice(&8000u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&8u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&8000u32.to_le_bytes());
        out.extend(std::iter::repeat(0u8).take(8000));
        out
    }

    #[tokio::test]
    async fn test_dispatch_by_extension() {
        let mut files = HashMap::new();
        files.insert(PathBuf::from("/a/one.wav"), tiny_wav());
        let source = MapSource(files);
        let resolver = DurationResolver::new();

        let wav = AudioFileDescriptor::new("/a/one.wav", 8044);
        let result = resolver.resolve(&wav, &source).await;
        assert_eq!(result.status, DurationStatus::Ok);
        assert!((result.duration_seconds - 1.0).abs() < 1e-6);

        // GSM never touches the source, only the descriptor size
        let gsm = AudioFileDescriptor::new("/a/voice.gsm", 330);
        let result = resolver.resolve(&gsm, &source).await;
        assert_eq!(result.status, DurationStatus::Ok);
        assert!((result.duration_seconds - 0.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unobtainable_bytes_is_unreadable() {
        let source = MapSource(HashMap::new());
        let resolver = DurationResolver::new();
        let desc = AudioFileDescriptor::new("/missing/file.mp3", 123);
        let result = resolver.resolve(&desc, &source).await;
        assert_eq!(result.status, DurationStatus::Unreadable);
        assert_eq!(result.duration_seconds, 0.0);
    }

    #[tokio::test]
    async fn test_unknown_extension_without_probe() {
        let source = MapSource(HashMap::new());
        let resolver = DurationResolver::new();
        let desc = AudioFileDescriptor::new("/music/track.flac", 9000);
        let result = resolver.resolve(&desc, &source).await;
        assert_eq!(result.status, DurationStatus::Unsupported);
    }

    #[tokio::test]
    async fn test_probe_result_is_passed_through() {
        let mut probe = MockExternalTagProbe::new();
        probe
            .expect_probe()
            .times(1)
            .returning(|_| Some(DurationResult::ok(12.5, Some(44100), Some(2), Some(900))));

        let source = MapSource(HashMap::new());
        let resolver = DurationResolver::with_probe(Arc::new(probe));
        let desc = AudioFileDescriptor::new("/music/track.flac", 9000);
        let result = resolver.resolve(&desc, &source).await;
        assert_eq!(result.status, DurationStatus::Ok);
        assert!((result.duration_seconds - 12.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_probe_decline_is_unsupported() {
        let mut probe = MockExternalTagProbe::new();
        probe.expect_probe().returning(|_| None);

        let source = MapSource(HashMap::new());
        let resolver = DurationResolver::with_probe(Arc::new(probe));
        let desc = AudioFileDescriptor::new("/music/track.wma", 9000);
        let result = resolver.resolve(&desc, &source).await;
        assert_eq!(result.status, DurationStatus::Unsupported);
    }
}
