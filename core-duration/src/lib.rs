//! # Audio Duration Core
//!
//! Derives playback duration (and basic stream parameters) for audio files
//! directly from raw file bytes, without decoding audio, and aggregates a
//! batch of files into summary statistics.
//!
//! ## Overview
//!
//! This crate handles:
//! - WAV (RIFF/PCM) chunk walking — duration from `fmt ` + `data` chunks
//! - MP3 frame-sync scanning with Xing/Info/VBRI detection and a CBR
//!   fallback estimate
//! - GSM 6.10 fixed-frame arithmetic (33 bytes = 20 ms)
//! - Dispatch over those parsers plus an external tag-probe capability,
//!   with graceful per-file degradation
//! - Batch aggregation into a deterministic, path-ordered report
//!
//! Directory traversal, pattern matching, and rendering are host concerns
//! and live outside this crate; the default probe for other container
//! formats (FLAC, OGG, MP4, ...) ships in `provider-lofty`.
//!
//! ## Usage
//!
//! ```ignore
//! use core_duration::{
//!     AudioFileDescriptor, DirectoryAggregator, DurationResolver, FsByteSource,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let descriptors = vec![
//!     AudioFileDescriptor::new("/music/one.wav", 176_444),
//!     AudioFileDescriptor::new("/music/two.mp3", 3_210_987),
//! ];
//!
//! let aggregator = DirectoryAggregator::new(
//!     DurationResolver::new(),
//!     Arc::new(FsByteSource),
//! )
//! .with_concurrency(4);
//!
//! let report = aggregator.aggregate(descriptors).await;
//! println!("total: {:.1}s over {} files", report.total_duration_seconds,
//!     report.per_file.len());
//! # }
//! ```

pub mod aggregate;
pub mod error;
pub mod gsm;
pub mod models;
pub mod mp3;
pub mod probe;
pub mod reader;
pub mod resolver;
pub mod source;
pub mod wav;

pub use aggregate::{DirectoryAggregator, FileOutcome, Report};
pub use error::{DurationError, Result};
pub use gsm::GsmEstimator;
pub use models::{format_duration, AudioFileDescriptor, DurationResult, DurationStatus};
pub use mp3::Mp3Parser;
pub use probe::ExternalTagProbe;
pub use reader::ByteReader;
pub use resolver::DurationResolver;
pub use source::{ByteSource, FsByteSource};
pub use wav::WavParser;
