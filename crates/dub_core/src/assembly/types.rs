//! Types for timeline assembly.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::AssemblyMode;

/// Safety margin kept between a truncated clip and the next clip's start.
pub const OVERLAP_GUARD_MS: u64 = 50;

/// Fade-out applied at a truncation cut point.
pub const TRUNCATION_FADE_MS: u64 = 30;

/// Errors during timeline assembly.
///
/// Any error is fatal for the whole build; no partial track is exported.
#[derive(Error, Debug)]
pub enum AssemblyError {
    /// A clip's audio could not be read.
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// ffmpeg is not installed.
    #[error("{tool} not found. Install ffmpeg: https://ffmpeg.org/download.html")]
    ToolMissing { tool: String },

    /// Writing the final track failed.
    #[error("Failed to export {path}: {message}")]
    Export { path: PathBuf, message: String },

    /// Nothing to assemble.
    #[error("No clips to assemble")]
    NoClips,

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl AssemblyError {
    /// Create a decode error.
    pub fn decode(path: &Path, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create an export error.
    pub fn export(path: &Path, message: impl Into<String>) -> Self {
        Self::Export {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for assembly operations.
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Per-build assembly configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyConfig {
    pub mode: AssemblyMode,
    /// Silence inserted between clips in sequential mode.
    pub gap_ms: u64,
    /// Export file extension (decides container/codec).
    pub export_format: String,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            mode: AssemblyMode::Synced,
            gap_ms: 1000,
            export_format: "mp3".to_string(),
        }
    }
}

/// What a build produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyReport {
    pub output_path: PathBuf,
    pub mode: AssemblyMode,
    /// Exported track length in milliseconds.
    pub track_ms: u64,
    pub segment_count: usize,
    /// Clips shortened to clear the next clip.
    pub truncated: usize,
    /// Clips reduced to nothing (near-simultaneous starts).
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_names_file() {
        let err = AssemblyError::decode(Path::new("outputs/de/0012.mp3"), "invalid data");
        let msg = err.to_string();
        assert!(msg.contains("0012.mp3"));
        assert!(msg.contains("invalid data"));
    }

    #[test]
    fn default_config_is_synced_mp3() {
        let config = AssemblyConfig::default();
        assert_eq!(config.mode, AssemblyMode::Synced);
        assert_eq!(config.gap_ms, 1000);
        assert_eq!(config.export_format, "mp3");
    }
}
