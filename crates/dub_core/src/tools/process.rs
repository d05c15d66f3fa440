//! `std::process` backed tool runner.

use std::ffi::OsString;
use std::io;
use std::process::{Command, Stdio};

use super::types::{ToolError, ToolOutput, ToolResult};
use super::ToolRunner;

/// Runs tools as child processes and waits for them to exit.
///
/// There is no timeout; a caller that needs a deadline must kill the process
/// itself and treat it as a failed run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[OsString]) -> ToolResult<ToolOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!("Running: {:?}", cmd);

        let output = cmd.output().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ToolError::missing(program),
            _ => ToolError::Spawn {
                tool: program.to_string(),
                source: e,
            },
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if !output.status.success() {
            return Err(ToolError::failed(
                program,
                output.status.code().unwrap_or(-1),
                stderr.trim(),
            ));
        }

        Ok(ToolOutput {
            stdout: output.stdout,
            stderr,
        })
    }
}
