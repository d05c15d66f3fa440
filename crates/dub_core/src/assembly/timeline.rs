//! Segments and overlap resolution.
//!
//! A [`Timeline`] is the set of decoded clips for one language, ordered by
//! start time. Resolution is a single left-to-right fold: each segment is
//! compared against the start of the segment after it and, if it runs past
//! that start, replaced by a shortened copy (with a short fade) or by an
//! empty placeholder. Truncation only ever shortens a segment's own tail, so
//! one pass leaves no residual overlap.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::buffer::AudioBuffer;
use super::types::{OVERLAP_GUARD_MS, TRUNCATION_FADE_MS};

/// One decoded clip placed on the timeline.
#[derive(Debug, Clone)]
pub struct Segment {
    start_ms: u64,
    duration_ms: u64,
    fade_out_ms: Option<u64>,
    audio: Arc<AudioBuffer>,
    source: PathBuf,
}

impl Segment {
    /// Create a segment; the duration is taken from the decoded audio.
    pub fn new(start_ms: u64, audio: Arc<AudioBuffer>, source: impl Into<PathBuf>) -> Self {
        Self {
            start_ms,
            duration_ms: audio.duration_ms(),
            fade_out_ms: None,
            audio,
            source: source.into(),
        }
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.duration_ms
    }

    /// Fade-out attached by truncation, if any.
    pub fn fade_out_ms(&self) -> Option<u64> {
        self.fade_out_ms
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Whether this segment contributes nothing to the output.
    pub fn is_skipped(&self) -> bool {
        self.duration_ms == 0
    }

    /// Shortened copy with a fade-out at the new tail.
    pub fn truncated_to(&self, duration_ms: u64, fade_ms: u64) -> Segment {
        Segment {
            duration_ms: duration_ms.min(self.duration_ms),
            fade_out_ms: Some(fade_ms),
            ..self.clone()
        }
    }

    /// Zero-length placeholder that keeps the segment's slot.
    pub fn skipped(&self) -> Segment {
        Segment {
            duration_ms: 0,
            fade_out_ms: None,
            ..self.clone()
        }
    }

    /// The audio this segment contributes, after truncation and fade.
    pub fn render(&self) -> AudioBuffer {
        let audio = if self.duration_ms < self.audio.duration_ms() {
            self.audio.truncated(self.duration_ms)
        } else {
            (*self.audio).clone()
        };

        match self.fade_out_ms {
            Some(fade_ms) => audio.with_fade_out(fade_ms),
            None => audio,
        }
    }
}

/// Ordered segments for one target language.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    segments: Vec<Segment>,
}

impl Timeline {
    /// Build a timeline, sorting by start time (stable on ties).
    pub fn new(mut segments: Vec<Segment>) -> Self {
        segments.sort_by_key(|s| s.start_ms);
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Resolve overlaps into a new timeline.
    ///
    /// For each adjacent pair where `end[i] > start[i+1]`, segment `i` is cut
    /// to `start[i+1] - start[i] - 50ms` with a 30ms fade, or skipped when
    /// that leaves nothing.
    pub fn resolve_overlaps(&self) -> Timeline {
        let mut resolved = Vec::with_capacity(self.segments.len());
        let last = self.segments.iter().fold(None::<Segment>, |pending, next| {
            if let Some(prev) = pending {
                resolved.push(resolve_pair(&prev, next));
            }
            Some(next.clone())
        });
        resolved.extend(last);

        Timeline { segments: resolved }
    }

    /// Synced track length: the latest segment end.
    pub fn track_length_ms(&self) -> u64 {
        self.segments.iter().map(Segment::end_ms).max().unwrap_or(0)
    }

    /// Sequential track length: all durations plus a gap between each pair.
    pub fn sequential_length_ms(&self, gap_ms: u64) -> u64 {
        let total: u64 = self.segments.iter().map(Segment::duration_ms).sum();
        let gaps = self.segments.len().saturating_sub(1) as u64 * gap_ms;
        total + gaps
    }

    /// Whether every adjacent pair is free of overlap.
    pub fn is_overlap_free(&self) -> bool {
        self.segments
            .windows(2)
            .all(|pair| pair[0].end_ms() <= pair[1].start_ms())
    }

    pub fn truncated_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.fade_out_ms.is_some() && !s.is_skipped())
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_skipped()).count()
    }
}

/// Resolve `current` against the segment that follows it.
fn resolve_pair(current: &Segment, next: &Segment) -> Segment {
    if current.end_ms() <= next.start_ms {
        return current.clone();
    }

    let overlap_ms = current.end_ms() - next.start_ms;
    let allowed_ms = next.start_ms as i64 - current.start_ms as i64 - OVERLAP_GUARD_MS as i64;

    if allowed_ms > 0 {
        tracing::debug!(
            "[Assembler] Overlap of {}ms: truncating {} from {}ms to {}ms",
            overlap_ms,
            current.source.display(),
            current.duration_ms,
            allowed_ms
        );
        current.truncated_to(allowed_ms as u64, TRUNCATION_FADE_MS)
    } else {
        tracing::warn!(
            "[Assembler] {} starts with {}; skipping it",
            current.source.display(),
            next.source.display()
        );
        current.skipped()
    }
}
