//! Duration probing with ffprobe.

use std::ffi::OsString;
use std::path::Path;

use serde::Deserialize;

use super::types::{ToolError, ToolResult};
use super::ToolRunner;

#[derive(Debug, Deserialize)]
struct ProbeDocument {
    format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Get the duration of a media file in seconds.
///
/// Runs `ffprobe -v quiet -print_format json -show_format <path>` and reads
/// `format.duration`, which ffprobe reports as a string.
pub fn probe_duration(runner: &dyn ToolRunner, ffprobe: &str, path: &Path) -> ToolResult<f64> {
    let args: Vec<OsString> = vec![
        "-v".into(),
        "quiet".into(),
        "-print_format".into(),
        "json".into(),
        "-show_format".into(),
        path.as_os_str().to_owned(),
    ];

    let output = runner.run(ffprobe, &args)?;
    parse_duration_json(ffprobe, &output.stdout)
}

/// Parse ffprobe's JSON document into a duration in seconds.
pub(crate) fn parse_duration_json(tool: &str, json: &[u8]) -> ToolResult<f64> {
    let doc: ProbeDocument =
        serde_json::from_slice(json).map_err(|e| ToolError::parse(tool, e.to_string()))?;

    let raw = doc
        .format
        .duration
        .ok_or_else(|| ToolError::parse(tool, "format.duration missing"))?;

    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|e| ToolError::parse(tool, format!("duration '{}': {}", raw, e)))?;

    if !secs.is_finite() || secs < 0.0 {
        return Err(ToolError::parse(tool, format!("duration '{}' out of range", raw)));
    }

    Ok(secs)
}
