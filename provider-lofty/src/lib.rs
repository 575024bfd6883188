//! # Lofty Tag Probe
//!
//! Default [`ExternalTagProbe`] implementation for the container formats
//! the core does not parse natively (FLAC, OGG, MP4/M4A, AAC, WMA, APE,
//! ALAC, ...). Wraps the `lofty` crate: the file is read into memory,
//! probed by content, and its stream properties are mapped into a
//! [`DurationResult`].
//!
//! Any failure — unreadable file, unrecognized container, parse error —
//! logs a warning and yields `None`, so the resolver reports the file as
//! unsupported and the batch keeps going.

use async_trait::async_trait;
use lofty::config::ParseOptions;
use lofty::file::AudioFile;
use lofty::probe::Probe;
use std::path::Path;
use tracing::{debug, warn};

use core_duration::{DurationResult, ExternalTagProbe};

/// Tag-reading duration probe backed by `lofty`.
pub struct LoftyTagProbe {
    parse_options: ParseOptions,
}

impl LoftyTagProbe {
    /// Probe with default parse options.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::new(),
        }
    }

    /// Probe with custom parse options (e.g. relaxed parsing mode).
    pub fn with_options(parse_options: ParseOptions) -> Self {
        Self { parse_options }
    }
}

impl Default for LoftyTagProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExternalTagProbe for LoftyTagProbe {
    async fn probe(&self, path: &Path) -> Option<DurationResult> {
        debug!("probing {} with lofty", path.display());

        let file_data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) => {
                warn!("could not read {}: {}", path.display(), e);
                return None;
            }
        };

        let tagged_file = match Probe::new(std::io::Cursor::new(&file_data))
            .options(self.parse_options)
            .guess_file_type()
        {
            Ok(probe) => match probe.read() {
                Ok(file) => file,
                Err(e) => {
                    warn!("could not parse {}: {}", path.display(), e);
                    return None;
                }
            },
            Err(e) => {
                warn!("could not probe {}: {}", path.display(), e);
                return None;
            }
        };

        let properties = tagged_file.properties();
        Some(DurationResult::ok(
            properties.duration().as_secs_f64(),
            properties.sample_rate(),
            properties.channels().map(u16::from),
            properties.audio_bitrate(),
        ))
    }
}
