//! Settings struct with TOML-based sections.
//!
//! Each section maps to one TOML table and can be rewritten on its own.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::assembly::{AssemblyConfig, FfmpegBackend};
use crate::denoise::DenoiseConfig;
use crate::logging::LogLevel;
use crate::models::AssemblyMode;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub assembly: AssemblySettings,

    #[serde(default)]
    pub denoise: DenoiseSettings,
}

impl Settings {
    /// Assembler configuration from the `[assembly]` section.
    pub fn to_assembly_config(&self) -> AssemblyConfig {
        AssemblyConfig {
            mode: self.assembly.mode,
            gap_ms: self.assembly.gap_ms,
            export_format: self.assembly.export_format.clone(),
        }
    }

    /// FFmpeg decode/export backend matching `[assembly]` and `[denoise]`.
    pub fn to_ffmpeg_backend(&self) -> FfmpegBackend {
        FfmpegBackend::new(
            self.denoise.ffmpeg_path.clone(),
            self.assembly.sample_rate,
            self.assembly.channels,
        )
    }

    /// Cleanup configuration, falling back to `RNNOISE_MODEL_PATH` for the model.
    pub fn to_denoise_config(&self) -> DenoiseConfig {
        self.to_denoise_config_with(|key| std::env::var(key).ok())
    }

    /// Like [`Self::to_denoise_config`] with an explicit variable lookup.
    pub fn to_denoise_config_with(&self, lookup: impl Fn(&str) -> Option<String>) -> DenoiseConfig {
        let model_path = self
            .denoise
            .model_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        DenoiseConfig {
            model_path,
            ffmpeg_path: self.denoise.ffmpeg_path.clone(),
            ffprobe_path: self.denoise.ffprobe_path.clone(),
            workers: self.denoise.workers.max(1),
        }
        .with_env_fallback(lookup)
    }
}

/// Output and log directories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSettings {
    /// Per-language clip and track output root.
    #[serde(default = "default_outputs_folder")]
    pub outputs_folder: String,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_outputs_folder() -> String {
    "outputs".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            outputs_folder: default_outputs_folder(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub level: LogLevel,

    /// Also write a daily log file under `paths.logs_folder`.
    #[serde(default)]
    pub log_to_file: bool,
}

/// Track assembly settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblySettings {
    #[serde(default)]
    pub mode: AssemblyMode,

    /// Silence between clips in sequential mode.
    #[serde(default = "default_gap_ms")]
    pub gap_ms: u64,

    #[serde(default = "default_export_format")]
    pub export_format: String,

    /// Rate clips are decoded at before mixing.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    #[serde(default = "default_channels")]
    pub channels: u16,
}

fn default_gap_ms() -> u64 {
    1000
}

fn default_export_format() -> String {
    "mp3".to_string()
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_channels() -> u16 {
    1
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            mode: AssemblyMode::default(),
            gap_ms: default_gap_ms(),
            export_format: default_export_format(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
        }
    }
}

/// Clip cleanup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenoiseSettings {
    /// RNNoise model file. Unset means `RNNOISE_MODEL_PATH`, then no suppression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,

    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    /// Files cleaned concurrently in batch mode.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_workers() -> usize {
    1
}

impl Default for DenoiseSettings {
    fn default() -> Self {
        Self {
            model_path: None,
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            workers: default_workers(),
        }
    }
}

/// Config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Logging,
    Assembly,
    Denoise,
}

impl ConfigSection {
    /// TOML table name.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
            ConfigSection::Assembly => "assembly",
            ConfigSection::Denoise => "denoise",
        }
    }

    pub fn all() -> [ConfigSection; 4] {
        [
            ConfigSection::Paths,
            ConfigSection::Logging,
            ConfigSection::Assembly,
            ConfigSection::Denoise,
        ]
    }
}
