//! External tool boundary.
//!
//! All ffmpeg/ffprobe invocations made by the denoise pipeline go through
//! the [`ToolRunner`] trait so that the filter/fallback policy can be
//! exercised without the real binaries installed.

mod probe;
mod process;
mod types;

use std::ffi::OsString;

pub use probe::probe_duration;
pub use process::ProcessRunner;
pub use types::{ToolError, ToolOutput, ToolResult};

/// Trait for running an external command to completion.
///
/// Implementations must map "executable not found" to [`ToolError::Missing`]
/// and a non-zero exit to [`ToolError::Failed`]; callers never see a panic.
pub trait ToolRunner: Send + Sync {
    /// Run `program` with `args` and capture its output.
    fn run(&self, program: &str, args: &[OsString]) -> ToolResult<ToolOutput>;
}
