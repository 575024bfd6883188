//! Value types shared across the duration pipeline
//!
//! Descriptors come in from an external enumeration collaborator, results go
//! out to an external renderer. Everything here is immutable once built and
//! serde-serializable so a bridge layer can ship it across process
//! boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One physical audio file, as supplied by the enumeration collaborator.
///
/// The extension is normalized to lowercase at construction so dispatch and
/// deduplication never have to care about `SONG.MP3` vs `song.mp3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFileDescriptor {
    /// Canonical path to the file. The enumerator owns canonicalization;
    /// the aggregator deduplicates on this value as-is.
    pub path: PathBuf,
    /// Lowercase extension without the leading dot (`"mp3"`, `"wav"`, ...).
    /// Empty when the file has no extension.
    pub extension: String,
    /// On-disk size in bytes.
    pub size_bytes: u64,
}

impl AudioFileDescriptor {
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self {
            path,
            extension,
            size_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Outcome class of a single file's duration extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationStatus {
    /// Duration was derived; stream parameters may be partially filled.
    Ok,
    /// The file claimed a handled format but its bytes could not be parsed
    /// (or could not be obtained at all).
    Unreadable,
    /// No native parser or external probe handles this format.
    Unsupported,
}

impl DurationStatus {
    pub fn is_ok(self) -> bool {
        matches!(self, DurationStatus::Ok)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DurationStatus::Ok => "ok",
            DurationStatus::Unreadable => "unreadable",
            DurationStatus::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for DurationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-file result produced by the resolver.
///
/// `duration_seconds` is always non-negative and is `0.0` for any non-`Ok`
/// status. The optional stream parameters are filled when the format makes
/// them cheap to read; `bit_depth_or_bitrate_kbps` holds PCM bit depth for
/// WAV and bitrate in kbps for MP3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationResult {
    pub duration_seconds: f64,
    pub sample_rate_hz: Option<u32>,
    pub channels: Option<u16>,
    pub bit_depth_or_bitrate_kbps: Option<u32>,
    pub status: DurationStatus,
}

impl DurationResult {
    pub fn ok(
        duration_seconds: f64,
        sample_rate_hz: Option<u32>,
        channels: Option<u16>,
        bit_depth_or_bitrate_kbps: Option<u32>,
    ) -> Self {
        Self {
            duration_seconds,
            sample_rate_hz,
            channels,
            bit_depth_or_bitrate_kbps,
            status: DurationStatus::Ok,
        }
    }

    pub fn unreadable() -> Self {
        Self {
            duration_seconds: 0.0,
            sample_rate_hz: None,
            channels: None,
            bit_depth_or_bitrate_kbps: None,
            status: DurationStatus::Unreadable,
        }
    }

    pub fn unsupported() -> Self {
        Self {
            duration_seconds: 0.0,
            sample_rate_hz: None,
            channels: None,
            bit_depth_or_bitrate_kbps: None,
            status: DurationStatus::Unsupported,
        }
    }
}

/// Render a duration as `HH:MM:SS`, with hours running past 24 for very
/// long batches. Fractional seconds are truncated.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}
