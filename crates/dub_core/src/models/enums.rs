//! Core enums.

use serde::{Deserialize, Serialize};

/// How clips are laid out on the exported track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssemblyMode {
    /// Overlay each clip at its original video timestamp, resolving overlaps.
    #[default]
    Synced,
    /// Concatenate clips in timestamp order with a fixed silent gap.
    Sequential,
}

impl AssemblyMode {
    /// Suffix used in the exported file name (`<lang>_<suffix>.<ext>`).
    pub fn file_suffix(&self) -> &'static str {
        match self {
            AssemblyMode::Synced => "synced",
            AssemblyMode::Sequential => "sequential",
        }
    }
}

impl std::fmt::Display for AssemblyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssemblyMode::Synced => write!(f, "Time-synchronized"),
            AssemblyMode::Sequential => write!(f, "Sequential (with gaps)"),
        }
    }
}

/// Category of a failed cleanup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Input/output paths rejected before any tool ran.
    Validation,
    /// Duration query failed.
    Probe,
    /// ffmpeg or ffprobe is not installed.
    ToolMissing,
    /// Every filter chain variant failed.
    FilterExecution,
    /// Temp file or publish I/O failed.
    Io,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_suffixes() {
        assert_eq!(AssemblyMode::Synced.file_suffix(), "synced");
        assert_eq!(AssemblyMode::Sequential.file_suffix(), "sequential");
    }

    #[test]
    fn mode_defaults_to_synced() {
        assert_eq!(AssemblyMode::default(), AssemblyMode::Synced);
    }

    #[test]
    fn failure_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FailureKind::FilterExecution).unwrap();
        assert_eq!(json, "\"filter_execution\"");
    }
}
