//! Test doubles for the external tool and audio backend seams.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::assembly::{AssemblyError, AssemblyResult, AudioBackend, AudioBuffer};
use crate::tools::{ToolError, ToolOutput, ToolResult, ToolRunner};

/// One recorded tool invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
}

impl Call {
    /// The argument following `flag`, if present.
    pub fn arg_after(&self, flag: &str) -> Option<&str> {
        let idx = self.args.iter().position(|a| a == flag)?;
        self.args.get(idx + 1).map(|s| s.as_str())
    }

    /// The `-af` filter chain.
    pub fn filter(&self) -> Option<&str> {
        self.arg_after("-af")
    }

    /// The `-i` input path.
    pub fn input(&self) -> Option<&str> {
        self.arg_after("-i")
    }

    /// The last argument (output path for ffmpeg and ffprobe).
    pub fn last(&self) -> &str {
        self.args.last().map(|s| s.as_str()).unwrap_or("")
    }

    pub fn is_probe(&self) -> bool {
        self.program.contains("ffprobe")
    }
}

type ProbeFn = Box<dyn Fn(&Call) -> ToolResult<String> + Send + Sync>;
type FfmpegFn = Box<dyn Fn(&Call) -> ToolResult<()> + Send + Sync>;

/// Scripted `ToolRunner`: ffprobe answers with JSON, ffmpeg succeeds unless told otherwise.
pub struct FakeRunner {
    calls: Mutex<Vec<Call>>,
    probe: ProbeFn,
    ffmpeg: FfmpegFn,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            probe: Box::new(|_| Ok(probe_json(2.0))),
            ffmpeg: Box::new(|_| Ok(())),
        }
    }

    pub fn with_probe(
        mut self,
        probe: impl Fn(&Call) -> ToolResult<String> + Send + Sync + 'static,
    ) -> Self {
        self.probe = Box::new(probe);
        self
    }

    pub fn with_ffmpeg(
        mut self,
        ffmpeg: impl Fn(&Call) -> ToolResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.ffmpeg = Box::new(ffmpeg);
        self
    }

    /// Every tool reports "not found".
    pub fn all_missing(self) -> Self {
        self.with_probe(|c| Err(ToolError::missing(c.program.clone())))
            .with_ffmpeg(|c| Err(ToolError::missing(c.program.clone())))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn ffmpeg_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| !c.is_probe()).collect()
    }

    pub fn probe_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.is_probe()).collect()
    }
}

impl ToolRunner for FakeRunner {
    fn run(&self, program: &str, args: &[OsString]) -> ToolResult<ToolOutput> {
        let call = Call {
            program: program.to_string(),
            args: args
                .iter()
                .map(|a| a.to_string_lossy().to_string())
                .collect(),
        };
        self.calls.lock().push(call.clone());

        if call.is_probe() {
            (self.probe)(&call).map(ToolOutput::from_stdout)
        } else {
            (self.ffmpeg)(&call).map(|_| ToolOutput::default())
        }
    }
}

/// ffprobe-style JSON for a given duration.
pub fn probe_json(duration_secs: f64) -> String {
    format!(
        r#"{{"format": {{"filename": "clip.wav", "duration": "{:.6}"}}}}"#,
        duration_secs
    )
}

/// Sample rate used by in-memory clips: one frame per millisecond.
pub const TEST_RATE: u32 = 1000;

/// In-memory `AudioBackend`: decodes from a path table, records exports.
#[derive(Default)]
pub struct FakeBackend {
    clips: HashMap<PathBuf, AudioBuffer>,
    exports: Mutex<Vec<(PathBuf, AudioBuffer)>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constant-valued mono clip of `duration_ms`.
    pub fn with_clip(mut self, path: impl Into<PathBuf>, duration_ms: u64, value: f64) -> Self {
        let frames = duration_ms as usize;
        let audio = AudioBuffer::new(vec![value; frames], TEST_RATE, 1);
        self.clips.insert(path.into(), audio);
        self
    }

    pub fn exports(&self) -> Vec<(PathBuf, AudioBuffer)> {
        self.exports.lock().clone()
    }
}

impl AudioBackend for FakeBackend {
    fn decode(&self, path: &Path) -> AssemblyResult<AudioBuffer> {
        self.clips
            .get(path)
            .cloned()
            .ok_or_else(|| AssemblyError::decode(path, "no such clip"))
    }

    fn export(&self, audio: &AudioBuffer, path: &Path) -> AssemblyResult<()> {
        self.exports
            .lock()
            .push((path.to_path_buf(), audio.clone()));
        Ok(())
    }
}
