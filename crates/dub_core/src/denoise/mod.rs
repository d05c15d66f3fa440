//! TTS clip cleanup.
//!
//! TTS engines tend to leave low-level hiss or breathing at the end of each
//! clip. Cleanup runs the clip through ffmpeg:
//!
//! 1. Optional RNNoise suppression (`arnndn`), when a model file is available
//! 2. Trailing silence trim (`silenceremove`)
//! 3. 30ms tail fade-out (`afade`)
//!
//! If the chain with suppression fails it is retried once without it. After
//! the trim, the clip is re-probed and faded again at its real length. The
//! result replaces the destination only when a usable file exists.

mod batch;
mod engine;
mod filter_chain;
mod types;
mod validation;

pub use engine::DenoiseEngine;
pub use filter_chain::{chain_variants, fade_start, resolve_model_path, FilterChainSpec, FilterStage};
pub use types::{
    CleanResult, DenoiseConfig, DenoiseError, CONVERSION_SAMPLE_RATE, FADE_DURATION_SECS,
    MODEL_ENV_VAR, WORKING_EXTENSION,
};
pub use validation::validate_paths;
