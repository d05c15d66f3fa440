//! Result structures for cleanup runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::enums::FailureKind;

/// Outcome of one cleanup attempt on one file.
///
/// Built once per attempt and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenoiseResult {
    pub success: bool,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Input duration in seconds.
    pub input_duration: Option<f64>,
    /// Output duration in seconds.
    pub output_duration: Option<f64>,
    /// `input_duration - output_duration`, when both are known.
    pub duration_saved: Option<f64>,
    pub error: Option<String>,
    pub failure: Option<FailureKind>,
}

impl DenoiseResult {
    /// Create a successful result.
    pub fn succeeded(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        input_duration: Option<f64>,
        output_duration: Option<f64>,
    ) -> Self {
        let duration_saved = match (input_duration, output_duration) {
            (Some(input), Some(output)) => Some(input - output),
            _ => None,
        };
        Self {
            success: true,
            input_path: input_path.into(),
            output_path: output_path.into(),
            input_duration,
            output_duration,
            duration_saved,
            error: None,
            failure: None,
        }
    }

    /// Create a failed result.
    pub fn failed(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        kind: FailureKind,
        error: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            input_path: input_path.into(),
            output_path: output_path.into(),
            input_duration: None,
            output_duration: None,
            duration_saved: None,
            error: Some(error.into()),
            failure: Some(kind),
        }
    }

    /// Attach the input duration measured before a later stage failed.
    pub fn with_input_duration(mut self, input_duration: Option<f64>) -> Self {
        self.input_duration = input_duration;
        self
    }

    /// Whether this failed at validation (no tool was run).
    pub fn is_validation_failure(&self) -> bool {
        self.failure == Some(FailureKind::Validation)
    }
}

/// Aggregate over a batch of cleanup results.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Sum of `duration_saved` over results that have one.
    pub total_saved_secs: f64,
}

impl BatchSummary {
    /// Compute the summary from a complete result set.
    pub fn from_results(results: &[DenoiseResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            total_saved_secs: results.iter().filter_map(|r| r.duration_saved).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_computes_savings() {
        let r = DenoiseResult::succeeded("a.wav", "a.wav", Some(3.0), Some(2.25));
        assert_eq!(r.duration_saved, Some(0.75));
        assert!(r.error.is_none());
    }

    #[test]
    fn success_without_output_duration_has_no_savings() {
        let r = DenoiseResult::succeeded("a.wav", "a.wav", Some(3.0), None);
        assert_eq!(r.duration_saved, None);
    }

    #[test]
    fn failure_keeps_measured_input_duration() {
        let r = DenoiseResult::failed("a.wav", "a.wav", FailureKind::FilterExecution, "boom")
            .with_input_duration(Some(2.0));
        assert_eq!(r.input_duration, Some(2.0));
        assert_eq!(r.duration_saved, None);
        assert!(!r.success);
    }

    #[test]
    fn summary_counts_and_sums() {
        let results = vec![
            DenoiseResult::succeeded("a.wav", "a.wav", Some(3.0), Some(2.5)),
            DenoiseResult::succeeded("b.wav", "b.wav", Some(1.0), Some(0.75)),
            DenoiseResult::failed("c.wav", "c.wav", FailureKind::Probe, "bad"),
        ];
        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert!((summary.total_saved_secs - 0.75).abs() < 1e-9);
    }

    #[test]
    fn empty_summary_is_zero() {
        assert_eq!(BatchSummary::from_results(&[]), BatchSummary::default());
    }
}
