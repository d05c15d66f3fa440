//! Types for TTS clip cleanup.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::FailureKind;
use crate::tools::ToolError;

/// Environment variable consulted for the RNNoise model when none is configured.
pub const MODEL_ENV_VAR: &str = "RNNOISE_MODEL_PATH";

/// Length of the tail fade-out, in seconds.
pub const FADE_DURATION_SECS: f64 = 0.03;

/// Extension of the canonical working format.
pub const WORKING_EXTENSION: &str = "wav";

/// Sample rate used when converting inputs to the working format.
pub const CONVERSION_SAMPLE_RATE: u32 = 44100;

/// Errors from one cleanup attempt.
///
/// These never escape the engine's public entry points; they are folded
/// into a [`crate::models::DenoiseResult`] or a `bool`.
#[derive(Error, Debug)]
pub enum DenoiseError {
    /// Input or output path rejected before any tool ran.
    #[error("{message}")]
    Validation { message: String },

    /// Duration query failed.
    #[error("Failed to probe audio duration: {source}")]
    Probe {
        #[source]
        source: ToolError,
    },

    /// ffmpeg or ffprobe is not installed.
    #[error("{tool} not found. Install ffmpeg: https://ffmpeg.org/download.html")]
    ToolMissing { tool: String },

    /// Conversion or every filter chain variant failed.
    #[error("{stage} failed: {message}")]
    FilterExecution { stage: String, message: String },

    /// Temp file or publish I/O error.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl DenoiseError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Wrap a probe failure; a missing ffprobe is reported as such.
    pub fn probe(source: ToolError) -> Self {
        match source {
            ToolError::Missing { tool } => Self::ToolMissing { tool },
            other => Self::Probe { source: other },
        }
    }

    /// Wrap a failed ffmpeg run for `stage`; a missing ffmpeg is reported as such.
    pub fn tool(stage: impl Into<String>, source: ToolError) -> Self {
        match source {
            ToolError::Missing { tool } => Self::ToolMissing { tool },
            other => Self::FilterExecution {
                stage: stage.into(),
                message: other.to_string(),
            },
        }
    }

    /// Create an I/O error with context.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Result category for reporting.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation { .. } => FailureKind::Validation,
            Self::Probe { .. } => FailureKind::Probe,
            Self::ToolMissing { .. } => FailureKind::ToolMissing,
            Self::FilterExecution { .. } => FailureKind::FilterExecution,
            Self::Io { .. } => FailureKind::Io,
        }
    }
}

/// Result type for cleanup internals.
pub type CleanResult<T> = Result<T, DenoiseError>;

/// Cleanup engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenoiseConfig {
    /// RNNoise model for the `arnndn` stage. `None` skips noise suppression.
    pub model_path: Option<PathBuf>,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    /// Files cleaned concurrently by batch runs (1 = sequential).
    pub workers: usize,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            workers: 1,
        }
    }
}

impl DenoiseConfig {
    /// Defaults, with the model taken from `RNNOISE_MODEL_PATH` if set.
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`Self::from_env`] with an explicit variable lookup.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            model_path: env_model_path(lookup),
            ..Self::default()
        }
    }

    /// Fill in `model_path` from the environment when it is unset.
    pub fn with_env_fallback(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.model_path.is_none() {
            self.model_path = env_model_path(lookup);
        }
        self
    }
}

fn env_model_path(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    lookup(MODEL_ENV_VAR)
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_is_its_own_kind() {
        let err = DenoiseError::probe(ToolError::missing("ffprobe"));
        assert_eq!(err.kind(), FailureKind::ToolMissing);

        let err = DenoiseError::tool("filter pass", ToolError::missing("ffmpeg"));
        assert_eq!(err.kind(), FailureKind::ToolMissing);
    }

    #[test]
    fn probe_parse_failure_is_probe_kind() {
        let err = DenoiseError::probe(ToolError::parse("ffprobe", "bad json"));
        assert_eq!(err.kind(), FailureKind::Probe);
        assert!(err.to_string().contains("bad json"));
    }

    #[test]
    fn env_supplies_model_path() {
        let config = DenoiseConfig::from_env_with(|key| {
            (key == MODEL_ENV_VAR).then(|| "/models/sh.rnnn".to_string())
        });
        assert_eq!(config.model_path, Some(PathBuf::from("/models/sh.rnnn")));
        assert_eq!(config.workers, 1);
    }

    #[test]
    fn blank_env_is_ignored() {
        let config = DenoiseConfig::from_env_with(|_| Some("  ".to_string()));
        assert_eq!(config.model_path, None);
    }

    #[test]
    fn explicit_model_wins_over_env() {
        let config = DenoiseConfig {
            model_path: Some(PathBuf::from("/explicit.rnnn")),
            ..DenoiseConfig::default()
        }
        .with_env_fallback(|_| Some("/env.rnnn".to_string()));
        assert_eq!(config.model_path, Some(PathBuf::from("/explicit.rnnn")));
    }
}
