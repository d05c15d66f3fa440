//! Audio decode/export backends.
//!
//! The assembler decodes every clip into a common PCM format, mixes in
//! memory, and hands the final buffer back to the backend for encoding.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use super::buffer::AudioBuffer;
use super::types::{AssemblyError, AssemblyResult};

/// Trait for reading clips and writing the assembled track.
pub trait AudioBackend: Send + Sync {
    /// Decode a clip into PCM.
    fn decode(&self, path: &Path) -> AssemblyResult<AudioBuffer>;

    /// Encode and write a track; the format follows the path's extension.
    fn export(&self, audio: &AudioBuffer, path: &Path) -> AssemblyResult<()>;
}

/// FFmpeg subprocess backend.
///
/// Every clip is converted to the same sample rate and channel count so
/// that buffers can be mixed directly.
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    ffmpeg_path: String,
    sample_rate: u32,
    channels: u16,
}

impl FfmpegBackend {
    pub fn new(ffmpeg_path: impl Into<String>, sample_rate: u32, channels: u16) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            sample_rate,
            channels: channels.max(1),
        }
    }

    fn map_spawn_error(&self, e: io::Error) -> AssemblyError {
        match e.kind() {
            io::ErrorKind::NotFound => AssemblyError::ToolMissing {
                tool: self.ffmpeg_path.clone(),
            },
            _ => AssemblyError::io(format!("spawning {}", self.ffmpeg_path), e),
        }
    }
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self::new("ffmpeg", 44100, 1)
    }
}

impl AudioBackend for FfmpegBackend {
    fn decode(&self, path: &Path) -> AssemblyResult<AudioBuffer> {
        if !path.is_file() {
            return Err(AssemblyError::decode(path, "file not found"));
        }

        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.arg("-v")
            .arg("error")
            .arg("-i")
            .arg(path)
            .arg("-vn")
            .arg("-ac")
            .arg(self.channels.to_string())
            .arg("-ar")
            .arg(self.sample_rate.to_string())
            .arg("-f")
            .arg("f64le")
            .arg("-acodec")
            .arg("pcm_f64le")
            .arg("pipe:1");

        tracing::debug!("Running FFmpeg (decode): {:?}", cmd);

        let output = cmd
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AssemblyError::decode(
                path,
                format!(
                    "ffmpeg exited with code {:?}: {}",
                    output.status.code(),
                    stderr.trim()
                ),
            ));
        }

        let audio = AudioBuffer::from_f64le_bytes(&output.stdout, self.sample_rate, self.channels);

        tracing::debug!(
            "Decoded {} frames ({}ms) from {}",
            audio.frames(),
            audio.duration_ms(),
            path.display()
        );

        Ok(audio)
    }

    fn export(&self, audio: &AudioBuffer, path: &Path) -> AssemblyResult<()> {
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.arg("-v")
            .arg("error")
            .arg("-y")
            .arg("-f")
            .arg("f64le")
            .arg("-ar")
            .arg(audio.sample_rate().to_string())
            .arg("-ac")
            .arg(audio.channels().to_string())
            .arg("-i")
            .arg("pipe:0")
            .arg(path);

        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        tracing::debug!("Running FFmpeg (export): {:?}", cmd);

        let mut child = cmd.spawn().map_err(|e| self.map_spawn_error(e))?;

        let Some(mut stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(AssemblyError::export(path, "failed to open ffmpeg stdin"));
        };
        let written = stdin.write_all(&audio.to_f64le_bytes());
        // Closing stdin lets ffmpeg see EOF before we wait on it
        drop(stdin);

        let output = child
            .wait_with_output()
            .map_err(|e| AssemblyError::export(path, format!("ffmpeg process error: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AssemblyError::export(
                path,
                format!(
                    "ffmpeg exited with code {:?}: {}",
                    output.status.code(),
                    stderr.trim()
                ),
            ));
        }

        written.map_err(|e| AssemblyError::export(path, format!("writing PCM: {}", e)))?;

        Ok(())
    }
}
