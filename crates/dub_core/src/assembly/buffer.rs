//! In-memory PCM buffers.

/// Interleaved `f64` PCM audio.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f64>,
    sample_rate: u32,
    channels: u16,
}

impl AudioBuffer {
    /// Create a buffer from interleaved samples.
    pub fn new(samples: Vec<f64>, sample_rate: u32, channels: u16) -> Self {
        let channels = channels.max(1);
        debug_assert!(samples.len() % channels as usize == 0);
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Create a silent buffer of the given length.
    pub fn silent(duration_ms: u64, sample_rate: u32, channels: u16) -> Self {
        let channels = channels.max(1);
        let frames = ms_to_frames(duration_ms, sample_rate);
        Self::new(vec![0.0; frames * channels as usize], sample_rate, channels)
    }

    /// Decode little-endian `f64` bytes (trailing partial samples are dropped).
    pub fn from_f64le_bytes(bytes: &[u8], sample_rate: u32, channels: u16) -> Self {
        let channels = channels.max(1);
        let mut samples: Vec<f64> = bytes
            .chunks_exact(8)
            .map(|chunk| {
                let mut arr = [0u8; 8];
                arr.copy_from_slice(chunk);
                f64::from_le_bytes(arr)
            })
            .collect();
        samples.truncate(samples.len() - samples.len() % channels as usize);
        Self::new(samples, sample_rate, channels)
    }

    /// Encode as little-endian `f64` bytes, clamped to [-1, 1].
    pub fn to_f64le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.samples.len() * 8);
        for sample in &self.samples {
            bytes.extend_from_slice(&sample.clamp(-1.0, 1.0).to_le_bytes());
        }
        bytes
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in milliseconds, rounded to the nearest millisecond.
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        let frames = self.frames() as u64;
        let rate = u64::from(self.sample_rate);
        (frames * 1000 + rate / 2) / rate
    }

    /// Whether `other` can be mixed into or appended to this buffer.
    pub fn same_format(&self, other: &AudioBuffer) -> bool {
        self.sample_rate == other.sample_rate && self.channels == other.channels
    }

    /// Copy of the first `duration_ms` of this buffer.
    pub fn truncated(&self, duration_ms: u64) -> AudioBuffer {
        let frames = ms_to_frames(duration_ms, self.sample_rate).min(self.frames());
        let end = frames * self.channels as usize;
        Self::new(self.samples[..end].to_vec(), self.sample_rate, self.channels)
    }

    /// Copy with a linear fade to silence over the last `fade_ms`.
    pub fn with_fade_out(&self, fade_ms: u64) -> AudioBuffer {
        let mut out = self.clone();
        let total = out.frames();
        let fade_frames = ms_to_frames(fade_ms, self.sample_rate).min(total);
        if fade_frames == 0 {
            return out;
        }

        let channels = out.channels as usize;
        let fade_start = total - fade_frames;
        for k in 0..fade_frames {
            let gain = (fade_frames - k - 1) as f64 / fade_frames as f64;
            let base = (fade_start + k) * channels;
            for sample in &mut out.samples[base..base + channels] {
                *sample *= gain;
            }
        }
        out
    }

    /// Mix `other` into this buffer starting at `at_ms`.
    ///
    /// Samples are summed; anything past the end of this buffer is dropped.
    pub fn overlay(&mut self, other: &AudioBuffer, at_ms: u64) {
        debug_assert!(self.same_format(other));
        let channels = self.channels as usize;
        let start = ms_to_frames(at_ms, self.sample_rate) * channels;
        if start >= self.samples.len() {
            return;
        }

        for (dst, src) in self.samples[start..].iter_mut().zip(other.samples.iter()) {
            *dst += *src;
        }
    }

    /// Append another buffer's samples.
    pub fn append(&mut self, other: &AudioBuffer) {
        debug_assert!(self.same_format(other));
        self.samples.extend_from_slice(&other.samples);
    }

    /// Append `duration_ms` of silence.
    pub fn append_silence(&mut self, duration_ms: u64) {
        let frames = ms_to_frames(duration_ms, self.sample_rate);
        let new_len = self.samples.len() + frames * self.channels as usize;
        self.samples.resize(new_len, 0.0);
    }
}

/// Convert milliseconds to a frame count, rounding to nearest.
pub(crate) fn ms_to_frames(duration_ms: u64, sample_rate: u32) -> usize {
    ((duration_ms * u64::from(sample_rate) + 500) / 1000) as usize
}
