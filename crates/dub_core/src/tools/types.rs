//! Types for external tool invocations.

use thiserror::Error;

/// Captured output of a finished tool run.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// Raw stdout bytes.
    pub stdout: Vec<u8>,
    /// Stderr, lossily decoded.
    pub stderr: String,
}

impl ToolOutput {
    /// Create output from stdout bytes with empty stderr.
    pub fn from_stdout(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Errors from running an external tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The executable could not be found.
    #[error("{tool} not found. Install ffmpeg: https://ffmpeg.org/download.html")]
    Missing { tool: String },

    /// The process could not be started for another reason.
    #[error("Failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but exited unsuccessfully.
    #[error("{tool} failed with exit code {exit_code}: {stderr}")]
    Failed {
        tool: String,
        exit_code: i32,
        stderr: String,
    },

    /// The tool's output could not be interpreted.
    #[error("Failed to parse {tool} output: {message}")]
    Parse { tool: String, message: String },
}

impl ToolError {
    /// Create a missing-tool error.
    pub fn missing(tool: impl Into<String>) -> Self {
        Self::Missing { tool: tool.into() }
    }

    /// Create a failed-run error.
    pub fn failed(tool: impl Into<String>, exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::Failed {
            tool: tool.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Whether the executable itself was absent.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

/// Result type for tool invocations.
pub type ToolResult<T> = Result<T, ToolError>;
