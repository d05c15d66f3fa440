//! Dub Core - voice-over assembly and TTS clip cleanup.
//!
//! This crate contains the engineering core of the dubbing pipeline:
//! - Timeline assembly of timestamped speech clips (synced or sequential)
//! - Multi-stage ffmpeg cleanup of TTS clips with automatic fallback
//!
//! Transcription, translation and speech synthesis are external
//! collaborators; they hand finished clip files to this crate.

pub mod assembly;
pub mod config;
pub mod denoise;
pub mod logging;
pub mod manifest;
pub mod models;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_support;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
