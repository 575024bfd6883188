//! WAV (RIFF/PCM) container parsing
//!
//! Walks RIFF sub-chunks to find `fmt ` and `data`, then derives playback
//! duration from the stream parameters alone. Sample data is never decoded.
//!
//! The walk is deliberately lenient with non-conformant writers: a chunk
//! whose declared size runs past the end of the file is clamped to the
//! bytes actually present, and the walk itself is bounded by the file
//! length so corrupt size fields cannot loop it forever.

use tracing::{debug, warn};

use crate::error::{DurationError, Result};
use crate::models::DurationResult;
use crate::reader::ByteReader;

/// WAVE_FORMAT_EXTENSIBLE; carries an extension-size field after the
/// standard 16 format bytes.
const FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Stream parameters captured from the `fmt ` chunk.
#[derive(Debug, Clone, Copy)]
struct FmtChunk {
    format_tag: u16,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

/// RIFF chunk walker producing duration + stream parameters for WAV files.
pub struct WavParser;

impl WavParser {
    /// Parse a whole WAV file from memory. Never returns an error: any
    /// structural failure degrades to an `Unreadable` result.
    pub fn parse(bytes: &[u8]) -> DurationResult {
        match Self::parse_inner(bytes) {
            Ok(result) => result,
            Err(e) => {
                warn!("WAV parse failed: {}", e);
                DurationResult::unreadable()
            }
        }
    }

    fn parse_inner(bytes: &[u8]) -> Result<DurationResult> {
        let mut reader = ByteReader::new(bytes);
        if &reader.read_tag4()? != b"RIFF" {
            return Err(DurationError::MalformedContainer(
                "missing RIFF magic".to_string(),
            ));
        }
        let riff_size = reader.read_u32_le()? as usize;
        if &reader.read_tag4()? != b"WAVE" {
            return Err(DurationError::MalformedContainer(
                "missing WAVE form type".to_string(),
            ));
        }

        // The declared RIFF size counts from offset 8; trust whichever of
        // the declaration and the real file length is smaller.
        let end = bytes.len().min(8usize.saturating_add(riff_size));

        let mut fmt: Option<FmtChunk> = None;
        let mut data_bytes: Option<u64> = None;

        let mut pos = 12usize;
        while pos + 8 <= end {
            reader.seek(pos)?;
            let id = reader.read_tag4()?;
            let declared = reader.read_u32_le()? as usize;
            let body = pos + 8;
            // Clamp truncated chunks to what is really there.
            let available = end - body;
            let take = declared.min(available);
            if declared > available {
                debug!(
                    "chunk {:?} declares {} bytes but only {} remain, clamping",
                    String::from_utf8_lossy(&id),
                    declared,
                    available
                );
            }

            match &id {
                b"fmt " => {
                    if fmt.is_none() {
                        fmt = Some(Self::read_fmt(&bytes[body..body + take])?);
                    }
                }
                b"data" => {
                    if data_bytes.is_none() {
                        data_bytes = Some(take as u64);
                    }
                }
                _ => {}
            }

            // RIFF pad rule: chunk bodies are rounded up to an even length.
            let advance = declared.saturating_add(declared & 1);
            pos = match body.checked_add(advance) {
                Some(next) if next > pos => next,
                _ => break,
            };
        }

        let fmt = fmt.ok_or_else(|| DurationError::MissingChunk("fmt ".to_string()))?;
        let data_bytes = data_bytes.ok_or_else(|| DurationError::MissingChunk("data".to_string()))?;

        if fmt.sample_rate == 0 {
            return Err(DurationError::DivisionUndefined(
                "sample rate is zero".to_string(),
            ));
        }
        let bytes_per_second =
            fmt.sample_rate as u64 * fmt.channels as u64 * fmt.bits_per_sample as u64 / 8;
        if bytes_per_second == 0 {
            return Err(DurationError::DivisionUndefined(format!(
                "zero byte rate (channels={}, bits={})",
                fmt.channels, fmt.bits_per_sample
            )));
        }

        let duration = data_bytes as f64 / bytes_per_second as f64;
        debug!(
            "WAV: tag 0x{:04X}, {} Hz, {} ch, {} bit, {} data bytes -> {:.3}s",
            fmt.format_tag, fmt.sample_rate, fmt.channels, fmt.bits_per_sample, data_bytes, duration
        );

        Ok(DurationResult::ok(
            duration,
            Some(fmt.sample_rate),
            Some(fmt.channels),
            Some(fmt.bits_per_sample as u32),
        ))
    }

    fn read_fmt(chunk: &[u8]) -> Result<FmtChunk> {
        let mut reader = ByteReader::new(chunk);
        let format_tag = reader.read_u16_le()?;
        let channels = reader.read_u16_le()?;
        let sample_rate = reader.read_u32_le()?;
        let _byte_rate = reader.read_u32_le()?;
        let _block_align = reader.read_u16_le()?;
        let bits_per_sample = reader.read_u16_le()?;

        // Extensible formats append an extension block; its size field is
        // read for validation but plays no part in the duration.
        if format_tag == FORMAT_EXTENSIBLE && reader.remaining() >= 2 {
            let extension_size = reader.read_u16_le()?;
            debug!("extensible WAV format, extension size {}", extension_size);
        }

        Ok(FmtChunk {
            format_tag,
            channels,
            sample_rate,
            bits_per_sample,
        })
    }
}
