//! Integration tests for the lofty-backed probe
//!
//! These verify the graceful-decline contract: a file the probe cannot
//! handle yields `None`, never a panic or an error. A synthetic WAV
//! fixture checks the happy path end to end.

use core_duration::{DurationStatus, ExternalTagProbe};
use provider_lofty::LoftyTagProbe;
use std::fs;
use std::path::PathBuf;

/// Helper to get the fixtures directory
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// One second of silent CD-quality PCM in a minimal RIFF container.
fn wav_fixture_bytes() -> Vec<u8> {
    let data_len = 176_400u32;
    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(4 + 24 + 8 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&44100u32.to_le_bytes());
    out.extend_from_slice(&176_400u32.to_le_bytes()); // byte rate
    out.extend_from_slice(&4u16.to_le_bytes()); // block align
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend(std::iter::repeat(0u8).take(data_len as usize));
    out
}

#[tokio::test]
async fn test_probe_missing_file_declines() {
    let probe = LoftyTagProbe::new();
    let result = probe.probe(&fixtures_dir().join("nonexistent.flac")).await;
    assert!(result.is_none(), "missing file should yield None");
}

#[tokio::test]
async fn test_probe_corrupt_file_declines() {
    let fixtures = fixtures_dir();
    let corrupt_path = fixtures.join("corrupt.flac");

    fs::create_dir_all(&fixtures).ok();
    fs::write(&corrupt_path, b"This is not a valid audio file")
        .expect("Failed to create corrupt file");

    let probe = LoftyTagProbe::new();
    let result = probe.probe(&corrupt_path).await;

    let _ = fs::remove_file(&corrupt_path);

    assert!(result.is_none(), "corrupt file should yield None");
}

#[tokio::test]
async fn test_probe_reads_wav_fixture() {
    let fixtures = fixtures_dir();
    let wav_path = fixtures.join("silence.wav");

    fs::create_dir_all(&fixtures).ok();
    fs::write(&wav_path, wav_fixture_bytes()).expect("Failed to create wav fixture");

    let probe = LoftyTagProbe::default();
    let result = probe.probe(&wav_path).await;

    let _ = fs::remove_file(&wav_path);

    let result = result.expect("probe should handle a conformant WAV");
    assert_eq!(result.status, DurationStatus::Ok);
    assert!((result.duration_seconds - 1.0).abs() < 0.1);
    assert_eq!(result.sample_rate_hz, Some(44100));
    assert_eq!(result.channels, Some(2));
}
