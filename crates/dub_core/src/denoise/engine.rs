//! Single-file cleanup pipeline.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::{Builder, NamedTempFile};

use super::filter_chain::{chain_variants, resolve_model_path, FilterChainSpec};
use super::types::{
    CleanResult, DenoiseConfig, DenoiseError, CONVERSION_SAMPLE_RATE, WORKING_EXTENSION,
};
use super::validation::validate_paths;
use crate::models::DenoiseResult;
use crate::tools::{probe_duration, ProcessRunner, ToolResult, ToolRunner};

/// What a successful pipeline run measured.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CleanOutcome {
    pub input_duration: f64,
    pub output_duration: Option<f64>,
    pub noise_suppressed: bool,
    pub precise_fade: bool,
}

/// A failed pipeline run, with the input duration if it was measured.
#[derive(Debug)]
pub(crate) struct CleanFailure {
    pub error: DenoiseError,
    pub input_duration: Option<f64>,
}

impl CleanFailure {
    fn after_probe(error: DenoiseError, input_duration: f64) -> Self {
        Self {
            error,
            input_duration: Some(input_duration),
        }
    }
}

impl From<DenoiseError> for CleanFailure {
    fn from(error: DenoiseError) -> Self {
        Self {
            error,
            input_duration: None,
        }
    }
}

/// Cleans TTS clips with an ffmpeg filter chain.
///
/// Every failure is reported through the return value; nothing here panics
/// or returns an error to the caller.
pub struct DenoiseEngine {
    runner: Arc<dyn ToolRunner>,
    config: DenoiseConfig,
}

impl DenoiseEngine {
    /// Engine that runs the real ffmpeg/ffprobe binaries.
    pub fn new(config: DenoiseConfig) -> Self {
        Self::with_runner(Arc::new(ProcessRunner::new()), config)
    }

    pub fn with_runner(runner: Arc<dyn ToolRunner>, config: DenoiseConfig) -> Self {
        Self { runner, config }
    }

    pub fn config(&self) -> &DenoiseConfig {
        &self.config
    }

    /// Clean `input` into `output` (which may be the same path).
    pub fn clean(&self, input: &Path, output: &Path) -> bool {
        self.process(input, output, None).success
    }

    /// Like [`Self::clean`] with an explicit RNNoise model.
    pub fn clean_with_model(&self, input: &Path, output: &Path, model: &Path) -> bool {
        self.process(input, output, Some(model)).success
    }

    /// Clean one file and report durations.
    pub fn clean_file(&self, input: &Path, output: &Path) -> DenoiseResult {
        self.process(input, output, None)
    }

    pub(crate) fn process(&self, input: &Path, output: &Path, model: Option<&Path>) -> DenoiseResult {
        if let Err(e) = validate_paths(input, output) {
            tracing::warn!("[Denoise] {}", e);
            return DenoiseResult::failed(input, output, e.kind(), e.to_string());
        }

        match self.run_pipeline(input, output, model) {
            Ok(outcome) => {
                tracing::debug!(
                    "[Denoise] {}: noise suppression {}, precise fade {}",
                    output.display(),
                    if outcome.noise_suppressed { "on" } else { "off" },
                    if outcome.precise_fade { "applied" } else { "skipped" }
                );
                DenoiseResult::succeeded(
                    input,
                    output,
                    Some(outcome.input_duration),
                    outcome.output_duration,
                )
            }
            Err(CleanFailure {
                error,
                input_duration,
            }) => {
                tracing::error!("[Denoise] {}: {}", input.display(), error);
                DenoiseResult::failed(input, output, error.kind(), error.to_string())
                    .with_input_duration(input_duration)
            }
        }
    }

    pub(crate) fn run_pipeline(
        &self,
        input: &Path,
        output: &Path,
        model: Option<&Path>,
    ) -> Result<CleanOutcome, CleanFailure> {
        let model = resolve_model_path(model.or(self.config.model_path.as_deref()));

        // Held until the end so the converted copy outlives every pass
        let converted = if is_working_format(input) {
            None
        } else {
            tracing::info!(
                "[Denoise] Non-WAV input detected ({}), converting to WAV first",
                input.display()
            );
            Some(self.convert_to_working_format(input)?)
        };
        let working = converted.as_ref().map_or(input, |tmp| tmp.path());

        let input_duration = probe_duration(&*self.runner, &self.config.ffprobe_path, working)
            .map_err(DenoiseError::probe)?;

        let failed = |error| CleanFailure::after_probe(error, input_duration);
        let (trimmed, noise_suppressed) = self
            .run_filter_pass(working, output, model.as_deref(), input_duration)
            .map_err(failed)?;

        let (final_tmp, precise_fade) = match self.precise_fade(trimmed.path(), output) {
            Some(faded) => (faded, true),
            None => (trimmed, false),
        };

        self.publish(final_tmp, output).map_err(failed)?;

        let output_duration =
            match probe_duration(&*self.runner, &self.config.ffprobe_path, output) {
                Ok(d) => {
                    tracing::info!(
                        "[Denoise] Complete: {:.2}s -> {:.2}s (saved {:.2}s)",
                        input_duration,
                        d,
                        input_duration - d
                    );
                    Some(d)
                }
                Err(e) => {
                    tracing::info!(
                        "[Denoise] Complete (could not measure output duration: {})",
                        e
                    );
                    None
                }
            };

        Ok(CleanOutcome {
            input_duration,
            output_duration,
            noise_suppressed,
            precise_fade,
        })
    }

    /// Convert to 16-bit 44.1kHz WAV in the system temp directory.
    fn convert_to_working_format(&self, input: &Path) -> CleanResult<NamedTempFile> {
        let tmp = Builder::new()
            .prefix("dub-convert-")
            .suffix(&format!(".{}", WORKING_EXTENSION))
            .tempfile()
            .map_err(|e| DenoiseError::io("creating conversion temp file", e))?;

        let args: Vec<OsString> = vec![
            "-i".into(),
            input.as_os_str().to_owned(),
            "-acodec".into(),
            "pcm_s16le".into(),
            "-ar".into(),
            CONVERSION_SAMPLE_RATE.to_string().into(),
            "-y".into(),
            tmp.path().as_os_str().to_owned(),
        ];

        self.runner
            .run(&self.config.ffmpeg_path, &args)
            .map_err(|e| DenoiseError::tool("WAV conversion", e))?;

        Ok(tmp)
    }

    /// First pass: try each chain variant until one succeeds.
    ///
    /// A missing ffmpeg ends the attempt immediately.
    fn run_filter_pass(
        &self,
        working: &Path,
        output: &Path,
        model: Option<&Path>,
        duration_secs: f64,
    ) -> CleanResult<(NamedTempFile, bool)> {
        let tmp = working_temp(output)?;
        let variants = chain_variants(model, duration_secs);
        let mut last_error = None;

        for (idx, chain) in variants.iter().enumerate() {
            match self.run_ffmpeg_filter(working, tmp.path(), chain) {
                Ok(()) => return Ok((tmp, chain.has_noise_suppression())),
                Err(e) if e.is_missing() => {
                    return Err(DenoiseError::tool("filter pass", e));
                }
                Err(e) => {
                    if idx + 1 < variants.len() {
                        tracing::warn!(
                            "[Denoise] arnndn filter failed, retrying without RNNoise denoise: {}",
                            e
                        );
                    }
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(DenoiseError::tool("ffmpeg filter chain", e)),
            None => Err(DenoiseError::FilterExecution {
                stage: "ffmpeg filter chain".to_string(),
                message: "no filter chain to run".to_string(),
            }),
        }
    }

    /// Second pass: re-fade at the trimmed length. `None` means keep the first-pass file.
    fn precise_fade(&self, trimmed: &Path, output: &Path) -> Option<NamedTempFile> {
        let trimmed_duration =
            match probe_duration(&*self.runner, &self.config.ffprobe_path, trimmed) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!("[Denoise] Could not probe trimmed clip, fade skipped: {}", e);
                    return None;
                }
            };

        let tmp = match working_temp(output) {
            Ok(tmp) => tmp,
            Err(e) => {
                tracing::warn!("[Denoise] Fade skipped: {}", e);
                return None;
            }
        };

        let chain = FilterChainSpec::fade_only(trimmed_duration);
        match self.run_ffmpeg_filter(trimmed, tmp.path(), &chain) {
            Ok(()) => Some(tmp),
            Err(e) => {
                tracing::warn!("[Denoise] Precision fade failed, keeping trimmed output: {}", e);
                None
            }
        }
    }

    /// Move the finished working file to `output`.
    ///
    /// A WAV destination is a rename. Any other extension is encoded from the
    /// working file exactly once, into a temp beside `output`, then renamed.
    fn publish(&self, working: NamedTempFile, output: &Path) -> CleanResult<()> {
        let publish_err = |e: tempfile::PersistError| {
            DenoiseError::io(format!("publishing {}", output.display()), e.error)
        };

        if is_working_format(output) {
            return working.persist(output).map(|_| ()).map_err(publish_err);
        }

        let encoded = temp_beside(output, &output_suffix(output))?;
        let args: Vec<OsString> = vec![
            "-i".into(),
            working.path().as_os_str().to_owned(),
            "-y".into(),
            encoded.path().as_os_str().to_owned(),
        ];
        self.runner
            .run(&self.config.ffmpeg_path, &args)
            .map_err(|e| DenoiseError::tool("output encode", e))?;

        encoded.persist(output).map(|_| ()).map_err(publish_err)
    }

    fn run_ffmpeg_filter(
        &self,
        input: &Path,
        output: &Path,
        chain: &FilterChainSpec,
    ) -> ToolResult<()> {
        let args: Vec<OsString> = vec![
            "-i".into(),
            input.as_os_str().to_owned(),
            "-af".into(),
            chain.render().into(),
            "-y".into(),
            output.as_os_str().to_owned(),
        ];

        tracing::debug!("[Denoise] Filter chain: {}", chain.render());
        self.runner.run(&self.config.ffmpeg_path, &args).map(|_| ())
    }
}

/// Whether `path` already has the working format's extension.
fn is_working_format(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(WORKING_EXTENSION))
}

/// WAV temp beside `output`, so the final rename stays on one filesystem.
fn working_temp(output: &Path) -> CleanResult<NamedTempFile> {
    temp_beside(output, &format!(".{}", WORKING_EXTENSION))
}

fn output_suffix(output: &Path) -> String {
    output
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

fn temp_beside(output: &Path, suffix: &str) -> CleanResult<NamedTempFile> {
    let dir: PathBuf = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Builder::new()
        .prefix(".dub-clean-")
        .suffix(suffix)
        .tempfile_in(&dir)
        .map_err(|e| DenoiseError::io(format!("creating temp file in {}", dir.display()), e))
}
