//! Audio track assembly from timestamped speech clips.
//!
//! Two layouts are supported:
//!
//! - **Synced**: every clip is overlaid onto a silent base at its video
//!   timestamp. Where a clip would run into the next one it is cut 50ms
//!   before the next start with a 30ms fade, or dropped if the starts are
//!   too close.
//! - **Sequential**: clips are concatenated in timestamp order with a fixed
//!   silent gap between them; timestamps only decide the order.
//!
//! Decoding and encoding go through an [`AudioBackend`]; [`FfmpegBackend`]
//! is the production implementation.

mod assembler;
mod backend;
mod buffer;
mod timeline;
mod types;

pub use assembler::{RenderedTrack, TimelineAssembler};
pub use backend::{AudioBackend, FfmpegBackend};
pub use buffer::AudioBuffer;
pub use timeline::{Segment, Timeline};
pub use types::{
    AssemblyConfig, AssemblyError, AssemblyReport, AssemblyResult, OVERLAP_GUARD_MS,
    TRUNCATION_FADE_MS,
};
