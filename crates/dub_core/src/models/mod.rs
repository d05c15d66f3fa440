//! Data models shared across the crate.
//!
//! - Enums for assembly modes and failure categories
//! - Clip references (assembly inputs)
//! - Cleanup results and batch summaries

mod clip;
mod enums;
mod results;

pub use clip::ClipRef;
pub use enums::{AssemblyMode, FailureKind};
pub use results::{BatchSummary, DenoiseResult};
