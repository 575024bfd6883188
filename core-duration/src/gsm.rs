//! GSM 6.10 duration estimation
//!
//! GSM 6.10 is a fixed-rate codec: every 33-byte frame carries exactly
//! 20 ms of 8000 Hz mono speech, so the duration is pure arithmetic on the
//! file size. Trailing bytes that do not complete a frame are discarded.

use crate::models::DurationResult;

/// Bytes per GSM 6.10 frame.
const FRAME_SIZE_BYTES: u64 = 33;

/// Seconds of audio per frame.
const FRAME_DURATION_SECONDS: f64 = 0.02;

/// Closed-form arithmetic duration for fixed-frame GSM files.
pub struct GsmEstimator;

impl GsmEstimator {
    /// Estimate the duration of a GSM file from its size alone. A file
    /// smaller than one frame yields 0.0 seconds, not an error.
    pub fn estimate(size_bytes: u64) -> DurationResult {
        let frames = size_bytes / FRAME_SIZE_BYTES;
        let duration = frames as f64 * FRAME_DURATION_SECONDS;
        DurationResult::ok(duration, Some(8000), Some(1), None)
    }
}
