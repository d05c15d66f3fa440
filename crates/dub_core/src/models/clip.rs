//! Assembly input references.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A generated clip file and the video timestamp it belongs at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipRef {
    /// Offset into the source video in milliseconds.
    pub start_ms: u64,
    /// Path to the clip audio.
    pub path: PathBuf,
}

impl ClipRef {
    pub fn new(start_ms: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            start_ms,
            path: path.into(),
        }
    }

    /// Create from a minutes/seconds timestamp.
    pub fn from_timestamp(minutes: u32, seconds: u32, path: impl Into<PathBuf>) -> Self {
        let start_ms = u64::from(minutes) * 60_000 + u64::from(seconds) * 1_000;
        Self::new(start_ms, path)
    }

    /// Derive the timestamp from a TTS clip named `MMSS.<ext>`.
    ///
    /// Minutes may run past two digits; the last two digits are always the
    /// seconds. Returns `None` for names that don't follow the pattern.
    pub fn from_clip_filename(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let (minutes, seconds) = parse_clip_stem(&path)?;
        Some(Self::from_timestamp(minutes, seconds, path))
    }
}

/// Parse `MMSS` out of a clip file stem.
fn parse_clip_stem(path: &Path) -> Option<(u32, u32)> {
    let stem = path.file_stem()?.to_str()?;
    if stem.len() < 4 || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let (min_part, sec_part) = stem.split_at(stem.len() - 2);
    let minutes: u32 = min_part.parse().ok()?;
    let seconds: u32 = sec_part.parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    Some((minutes, seconds))
}
