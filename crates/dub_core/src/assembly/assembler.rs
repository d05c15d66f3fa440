//! Timeline assembler: clips in, one exported track out.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::backend::AudioBackend;
use super::buffer::AudioBuffer;
use super::timeline::{Segment, Timeline};
use super::types::{AssemblyConfig, AssemblyError, AssemblyReport, AssemblyResult};
use crate::models::{AssemblyMode, ClipRef};

/// A rendered (not yet exported) track and the timeline it came from.
#[derive(Debug, Clone)]
pub struct RenderedTrack {
    pub audio: AudioBuffer,
    pub timeline: Timeline,
}

/// Builds one audio track per language from timestamped clips.
pub struct TimelineAssembler<B: AudioBackend> {
    backend: B,
    config: AssemblyConfig,
}

impl<B: AudioBackend> TimelineAssembler<B> {
    pub fn new(backend: B, config: AssemblyConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Export path for a language: `<outputs>/<lang>/<lang>_<mode>.<ext>`.
    pub fn output_path(&self, outputs_dir: &Path, language: &str) -> PathBuf {
        outputs_dir.join(language).join(format!(
            "{}_{}.{}",
            language,
            self.config.mode.file_suffix(),
            self.config.export_format
        ))
    }

    /// Decode every clip and lay them out according to the configured mode.
    ///
    /// A clip that fails to decode aborts the whole render.
    pub fn render(&self, clips: &[ClipRef]) -> AssemblyResult<RenderedTrack> {
        if clips.is_empty() {
            return Err(AssemblyError::NoClips);
        }

        let (segments, format) = self.decode_all(clips)?;
        let timeline = Timeline::new(segments);

        match self.config.mode {
            AssemblyMode::Synced => Ok(render_synced(&timeline, format)),
            AssemblyMode::Sequential => {
                Ok(render_sequential(timeline, format, self.config.gap_ms))
            }
        }
    }

    /// Render and export to `output`.
    pub fn build(&self, clips: &[ClipRef], output: &Path) -> AssemblyResult<AssemblyReport> {
        tracing::info!(
            "[Assembler] Building {} track from {} clips ({})",
            self.config.mode.file_suffix(),
            clips.len(),
            self.config.mode
        );

        let rendered = self.render(clips)?;

        tracing::info!("[Assembler] Saving {}", output.display());
        self.backend.export(&rendered.audio, output)?;

        let report = AssemblyReport {
            output_path: output.to_path_buf(),
            mode: self.config.mode,
            track_ms: rendered.audio.duration_ms(),
            segment_count: rendered.timeline.len(),
            truncated: rendered.timeline.truncated_count(),
            skipped: rendered.timeline.skipped_count(),
        };

        tracing::info!(
            "[Assembler] Exported {}ms track ({} truncated, {} skipped)",
            report.track_ms,
            report.truncated,
            report.skipped
        );

        Ok(report)
    }

    /// Build the per-language export under `outputs_dir`.
    pub fn build_for_language(
        &self,
        outputs_dir: &Path,
        language: &str,
        clips: &[ClipRef],
    ) -> AssemblyResult<AssemblyReport> {
        let output = self.output_path(outputs_dir, language);
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AssemblyError::io(format!("creating {}", parent.display()), e))?;
        }
        self.build(clips, &output)
    }

    /// Decode every clip; also returns the shared sample rate and channel count.
    fn decode_all(&self, clips: &[ClipRef]) -> AssemblyResult<(Vec<Segment>, (u32, u16))> {
        let mut segments: Vec<Segment> = Vec::with_capacity(clips.len());
        let mut format: Option<(u32, u16)> = None;

        for clip in clips {
            let audio = self.backend.decode(&clip.path)?;

            let clip_format = (audio.sample_rate(), audio.channels());
            match format {
                None => format = Some(clip_format),
                Some(expected) if expected != clip_format => {
                    return Err(AssemblyError::decode(
                        &clip.path,
                        format!(
                            "format {}Hz/{}ch differs from {}Hz/{}ch",
                            clip_format.0, clip_format.1, expected.0, expected.1
                        ),
                    ));
                }
                Some(_) => {}
            }

            let segment = Segment::new(clip.start_ms, Arc::new(audio), clip.path.clone());
            tracing::debug!(
                "[Assembler] Prepared {} at {}ms with duration {}ms",
                clip.path.display(),
                segment.start_ms(),
                segment.duration_ms()
            );
            segments.push(segment);
        }

        match format {
            Some(format) => Ok((segments, format)),
            None => Err(AssemblyError::NoClips),
        }
    }
}

/// Overlay every non-empty segment onto a silent base at its start time.
fn render_synced(timeline: &Timeline, (rate, channels): (u32, u16)) -> RenderedTrack {
    let resolved = timeline.resolve_overlaps();
    let mut base = AudioBuffer::silent(resolved.track_length_ms(), rate, channels);

    for segment in resolved.segments().iter().filter(|s| !s.is_skipped()) {
        base.overlay(&segment.render(), segment.start_ms());
    }

    RenderedTrack {
        audio: base,
        timeline: resolved,
    }
}

/// Concatenate segments in start order with `gap_ms` of silence between each pair.
fn render_sequential(
    timeline: Timeline,
    (rate, channels): (u32, u16),
    gap_ms: u64,
) -> RenderedTrack {
    let mut out = AudioBuffer::silent(0, rate, channels);

    for (i, segment) in timeline.segments().iter().enumerate() {
        if i > 0 {
            out.append_silence(gap_ms);
        }
        out.append(&segment.render());
    }

    RenderedTrack {
        audio: out,
        timeline,
    }
}
