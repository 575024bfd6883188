//! MP3 frame-sync scanning and duration estimation
//!
//! Locates the first self-consistent MPEG audio frame header (skipping a
//! leading ID3v2 region), then prefers a Xing/Info or VBRI summary block
//! for the duration and falls back to a constant-bitrate estimate over the
//! audio payload. Audio frames are never decoded.

use tracing::{debug, warn};

use crate::error::{DurationError, Result};
use crate::models::DurationResult;

/// Sample rates in Hz, indexed by `[version][sample_rate_index]`.
const SAMPLE_RATES: [[u32; 3]; 3] = [
    [44100, 48000, 32000], // MPEG-1
    [22050, 24000, 16000], // MPEG-2
    [11025, 12000, 8000],  // MPEG-2.5
];

/// Bitrates in kbps for MPEG-1, indexed by `[layer][bitrate_index]`.
/// Index 0 is free-format and index 15 is invalid; both are rejected
/// during the sync scan because neither yields a computable frame length.
const BITRATES_V1: [[u32; 15]; 3] = [
    [0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448],
    [0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384],
    [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320],
];

/// Bitrates in kbps for MPEG-2 and MPEG-2.5.
const BITRATES_V2: [[u32; 15]; 3] = [
    [0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256],
    [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160],
    [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MpegVersion {
    V1,
    V2,
    V25,
}

impl MpegVersion {
    fn table_index(self) -> usize {
        match self {
            MpegVersion::V1 => 0,
            MpegVersion::V2 => 1,
            MpegVersion::V25 => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    I,
    II,
    III,
}

impl Layer {
    fn table_index(self) -> usize {
        match self {
            Layer::I => 0,
            Layer::II => 1,
            Layer::III => 2,
        }
    }
}

/// A decoded, self-consistent MPEG frame header.
#[derive(Debug, Clone, Copy)]
struct FrameHeader {
    version: MpegVersion,
    layer: Layer,
    bitrate_kbps: u32,
    sample_rate: u32,
    padding: bool,
    channels: u16,
}

impl FrameHeader {
    /// Decode four header bytes. Returns `None` for anything that is not a
    /// frame sync or whose fields do not round-trip to a valid frame
    /// length (reserved version/layer, free or invalid bitrate, invalid
    /// sample-rate index).
    fn decode(b: &[u8]) -> Option<FrameHeader> {
        if b.len() < 4 || b[0] != 0xFF || b[1] & 0xE0 != 0xE0 {
            return None;
        }
        let version = match (b[1] >> 3) & 0x03 {
            0 => MpegVersion::V25,
            2 => MpegVersion::V2,
            3 => MpegVersion::V1,
            _ => return None, // reserved
        };
        let layer = match (b[1] >> 1) & 0x03 {
            1 => Layer::III,
            2 => Layer::II,
            3 => Layer::I,
            _ => return None, // reserved
        };
        let bitrate_index = (b[2] >> 4) as usize;
        if bitrate_index == 0 || bitrate_index == 15 {
            return None;
        }
        let sample_rate_index = ((b[2] >> 2) & 0x03) as usize;
        if sample_rate_index == 3 {
            return None;
        }

        let bitrate_table = match version {
            MpegVersion::V1 => &BITRATES_V1,
            _ => &BITRATES_V2,
        };
        let bitrate_kbps = bitrate_table[layer.table_index()][bitrate_index];
        let sample_rate = SAMPLE_RATES[version.table_index()][sample_rate_index];
        let padding = (b[2] >> 1) & 0x01 == 1;
        let channels = if (b[3] >> 6) & 0x03 == 3 { 1 } else { 2 };

        Some(FrameHeader {
            version,
            layer,
            bitrate_kbps,
            sample_rate,
            padding,
            channels,
        })
    }

    /// PCM samples carried by one frame, fixed per version/layer.
    fn samples_per_frame(&self) -> u32 {
        match self.layer {
            Layer::I => 384,
            Layer::II => 1152,
            Layer::III => match self.version {
                MpegVersion::V1 => 1152,
                _ => 576,
            },
        }
    }

    /// Frame length in bytes, derived from bitrate and sample rate.
    fn frame_len(&self) -> usize {
        let bitrate = self.bitrate_kbps as usize * 1000;
        let rate = self.sample_rate as usize;
        let pad = self.padding as usize;
        match self.layer {
            Layer::I => (12 * bitrate / rate + pad) * 4,
            _ => self.samples_per_frame() as usize / 8 * bitrate / rate + pad,
        }
    }

    /// Length of the Layer III side-information block that sits between
    /// the frame header and a Xing/Info tag.
    fn side_info_len(&self) -> usize {
        match (self.layer, self.version) {
            (Layer::III, MpegVersion::V1) => {
                if self.channels == 1 {
                    17
                } else {
                    32
                }
            }
            (Layer::III, _) => {
                if self.channels == 1 {
                    9
                } else {
                    17
                }
            }
            _ => 0,
        }
    }
}

/// Frame-sync scanner with VBR-header detection.
pub struct Mp3Parser;

impl Mp3Parser {
    /// Parse a whole MP3 file from memory. Never returns an error: a file
    /// with no recognizable frame sync degrades to `Unreadable`.
    pub fn parse(bytes: &[u8]) -> DurationResult {
        match Self::parse_inner(bytes) {
            Ok(result) => result,
            Err(e) => {
                warn!("MP3 parse failed: {}", e);
                DurationResult::unreadable()
            }
        }
    }

    fn parse_inner(bytes: &[u8]) -> Result<DurationResult> {
        let audio_start = id3v2_region(bytes);
        let (frame_pos, header) = find_first_frame(bytes, audio_start).ok_or_else(|| {
            DurationError::MalformedContainer("no MP3 frame sync found".to_string())
        })?;
        debug!(
            "MP3: first frame at {}, {:?} {:?}, {} kbps, {} Hz",
            frame_pos, header.version, header.layer, header.bitrate_kbps, header.sample_rate
        );

        let duration = match vbr_frame_count(bytes, frame_pos, &header) {
            Some(frames) => {
                let d = frames as f64 * header.samples_per_frame() as f64
                    / header.sample_rate as f64;
                debug!("MP3: VBR summary declares {} frames -> {:.3}s", frames, d);
                d
            }
            None => {
                // CBR estimate over the audio payload: everything except
                // the leading tag region and a trailing ID3v1 block.
                let effective =
                    bytes.len().saturating_sub(audio_start + trailing_id3v1(bytes)) as f64;
                effective * 8.0 / (header.bitrate_kbps as f64 * 1000.0)
            }
        };

        Ok(DurationResult::ok(
            duration,
            Some(header.sample_rate),
            Some(header.channels),
            Some(header.bitrate_kbps),
        ))
    }
}

/// Length of a leading ID3v2 region (header + synch-safe payload size +
/// optional footer), clamped to the file length. Zero when absent.
fn id3v2_region(bytes: &[u8]) -> usize {
    if bytes.len() < 10 || &bytes[0..3] != b"ID3" {
        return 0;
    }
    let size = bytes[6..10]
        .iter()
        .fold(0usize, |acc, &b| (acc << 7) | (b & 0x7F) as usize);
    let footer = if bytes[5] & 0x10 != 0 { 10 } else { 0 };
    (10 + size + footer).min(bytes.len())
}

/// 128 when the file ends with a legacy ID3v1 block, else 0.
fn trailing_id3v1(bytes: &[u8]) -> usize {
    if bytes.len() >= 128 && &bytes[bytes.len() - 128..bytes.len() - 125] == b"TAG" {
        128
    } else {
        0
    }
}

/// Scan forward from `start` for the first byte offset whose four bytes
/// decode to a self-consistent frame header.
fn find_first_frame(bytes: &[u8], start: usize) -> Option<(usize, FrameHeader)> {
    if bytes.len() < start + 4 {
        return None;
    }
    for offset in start..=bytes.len() - 4 {
        if bytes[offset] != 0xFF {
            continue;
        }
        if let Some(header) = FrameHeader::decode(&bytes[offset..offset + 4]) {
            if header.frame_len() > 4 {
                return Some((offset, header));
            }
        }
    }
    None
}

/// Frame count from a VBR summary block, if one is present after the first
/// frame's side information (Xing/Info) or at the fixed VBRI offset, and
/// it declares a positive frame count.
fn vbr_frame_count(bytes: &[u8], frame_pos: usize, header: &FrameHeader) -> Option<u32> {
    // Xing/Info sits right after the side information.
    let xing = frame_pos + 4 + header.side_info_len();
    if bytes.len() >= xing + 12 {
        let tag = &bytes[xing..xing + 4];
        if tag == b"Xing" || tag == b"Info" {
            let flags = u32::from_be_bytes(bytes[xing + 4..xing + 8].try_into().ok()?);
            if flags & 0x1 != 0 {
                let frames = u32::from_be_bytes(bytes[xing + 8..xing + 12].try_into().ok()?);
                if frames > 0 {
                    return Some(frames);
                }
            }
        }
    }

    // VBRI always sits 32 bytes after the frame header.
    let vbri = frame_pos + 4 + 32;
    if bytes.len() >= vbri + 18 && &bytes[vbri..vbri + 4] == b"VBRI" {
        let frames = u32::from_be_bytes(bytes[vbri + 14..vbri + 18].try_into().ok()?);
        if frames > 0 {
            return Some(frames);
        }
    }

    None
}
