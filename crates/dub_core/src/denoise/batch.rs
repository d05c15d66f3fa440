//! In-place batch cleanup over a glob pattern.

use std::path::PathBuf;

use rayon::prelude::*;

use super::engine::DenoiseEngine;
use crate::models::{BatchSummary, DenoiseResult};

impl DenoiseEngine {
    /// Clean every file matching `pattern` in place.
    ///
    /// `**` matches across directories. Results come back in sorted path
    /// order regardless of how many workers ran. No matches (or an invalid
    /// pattern) gives an empty list.
    pub fn clean_many(&self, pattern: &str) -> Vec<DenoiseResult> {
        let files = match expand_pattern(pattern) {
            Ok(files) => files,
            Err(e) => {
                tracing::error!("[Batch] Invalid pattern '{}': {}", pattern, e);
                return Vec::new();
            }
        };

        if files.is_empty() {
            tracing::warn!("[Batch] No files matched pattern: {}", pattern);
            return Vec::new();
        }

        tracing::info!(
            "[Batch] Processing {} files matching '{}'",
            files.len(),
            pattern
        );

        let results = self.run_batch(&files);

        let summary = Self::summarize(&results);
        tracing::info!(
            "[Batch] Complete: {}/{} succeeded, {:.2}s total saved",
            summary.succeeded,
            summary.total,
            summary.total_saved_secs
        );
        if summary.failed > 0 {
            tracing::warn!("[Batch] {} files failed", summary.failed);
        }

        results
    }

    /// Aggregate counts and total time saved.
    pub fn summarize(results: &[DenoiseResult]) -> BatchSummary {
        BatchSummary::from_results(results)
    }

    fn run_batch(&self, files: &[PathBuf]) -> Vec<DenoiseResult> {
        let clean_one = |path: &PathBuf| {
            tracing::info!("[Batch] Processing: {}", path.display());
            self.clean_file(path, path)
        };

        let workers = self.config().workers;
        if workers <= 1 {
            return files.iter().map(clean_one).collect();
        }

        match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(|| files.par_iter().map(clean_one).collect()),
            Err(e) => {
                tracing::warn!(
                    "[Batch] Could not start {} workers ({}), cleaning sequentially",
                    workers,
                    e
                );
                files.iter().map(clean_one).collect()
            }
        }
    }
}

/// Sorted regular files matching `pattern`.
fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, glob::PatternError> {
    let mut files: Vec<PathBuf> = glob::glob(pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("[Batch] Skipping unreadable path: {}", e);
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}
