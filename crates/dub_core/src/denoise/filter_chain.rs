//! ffmpeg `-af` filter chain construction.

use std::fmt;
use std::path::{Path, PathBuf};

use super::types::FADE_DURATION_SECS;

/// Trailing-silence trim: only stop periods, 200ms at -35dB or quieter.
const SILENCE_TRIM: &str =
    "silenceremove=start_periods=0:stop_periods=-1:stop_duration=0.2:stop_threshold=-35dB";

/// One stage of the cleanup filter chain.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterStage {
    /// RNNoise suppression with the given model file.
    NoiseSuppression { model: PathBuf },
    /// Trailing silence removal.
    SilenceTrim,
    /// Linear fade to silence.
    FadeOut { start_secs: f64, duration_secs: f64 },
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterStage::NoiseSuppression { model } => {
                write!(f, "arnndn=m={}", escape_filter_value(&model.to_string_lossy()))
            }
            FilterStage::SilenceTrim => f.write_str(SILENCE_TRIM),
            FilterStage::FadeOut {
                start_secs,
                duration_secs,
            } => write!(f, "afade=t=out:st={:.4}:d={}", start_secs, duration_secs),
        }
    }
}

/// Ordered list of filter stages.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChainSpec {
    stages: Vec<FilterStage>,
}

impl FilterChainSpec {
    /// Suppression (when a model is given), silence trim, then tail fade.
    pub fn full(model: Option<&Path>, duration_secs: f64) -> Self {
        let mut stages = Vec::with_capacity(3);
        if let Some(model) = model {
            stages.push(FilterStage::NoiseSuppression {
                model: model.to_path_buf(),
            });
        }
        stages.push(FilterStage::SilenceTrim);
        stages.push(fade_stage(duration_secs));
        Self { stages }
    }

    /// Tail fade only, for the precision re-pass.
    pub fn fade_only(duration_secs: f64) -> Self {
        Self {
            stages: vec![fade_stage(duration_secs)],
        }
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    pub fn has_noise_suppression(&self) -> bool {
        self.stages
            .iter()
            .any(|s| matches!(s, FilterStage::NoiseSuppression { .. }))
    }

    /// Comma-joined `-af` argument.
    pub fn render(&self) -> String {
        self.stages
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Chains to try in order: with suppression then without, or just without.
pub fn chain_variants(model: Option<&Path>, duration_secs: f64) -> Vec<FilterChainSpec> {
    match model {
        Some(model) => vec![
            FilterChainSpec::full(Some(model), duration_secs),
            FilterChainSpec::full(None, duration_secs),
        ],
        None => vec![FilterChainSpec::full(None, duration_secs)],
    }
}

/// Where the tail fade starts for a clip of `duration_secs`.
pub fn fade_start(duration_secs: f64) -> f64 {
    (duration_secs - FADE_DURATION_SECS).max(0.0)
}

fn fade_stage(duration_secs: f64) -> FilterStage {
    FilterStage::FadeOut {
        start_secs: fade_start(duration_secs),
        duration_secs: FADE_DURATION_SECS,
    }
}

/// Resolve the model to use: `candidate` only if it names an existing file.
///
/// A configured but missing model is logged and treated as no model.
pub fn resolve_model_path(candidate: Option<&Path>) -> Option<PathBuf> {
    let path = candidate?;
    if path.is_file() {
        Some(path.to_path_buf())
    } else {
        tracing::warn!(
            "[Denoise] RNNoise model not found at {}, skipping noise suppression",
            path.display()
        );
        None
    }
}

/// Backslash-escape characters that ffmpeg's filter parser treats specially.
fn escape_filter_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | ':' | ',' | '\'') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_start_positions() {
        assert!((fade_start(2.0) - 1.97).abs() < 1e-9);
        assert_eq!(fade_start(0.01), 0.0);
        assert_eq!(FilterChainSpec::fade_only(2.0).render(), "afade=t=out:st=1.9700:d=0.03");
        assert_eq!(FilterChainSpec::fade_only(0.01).render(), "afade=t=out:st=0.0000:d=0.03");
    }

    #[test]
    fn full_chain_with_model() {
        let chain = FilterChainSpec::full(Some(Path::new("/models/sh.rnnn")), 2.0);
        assert!(chain.has_noise_suppression());
        assert_eq!(
            chain.render(),
            "arnndn=m=/models/sh.rnnn,\
             silenceremove=start_periods=0:stop_periods=-1:stop_duration=0.2:stop_threshold=-35dB,\
             afade=t=out:st=1.9700:d=0.03"
        );
    }

    #[test]
    fn full_chain_without_model_has_no_suppression() {
        let chain = FilterChainSpec::full(None, 3.5);
        assert!(!chain.has_noise_suppression());
        assert!(!chain.render().contains("arnndn"));
        assert_eq!(chain.stages().len(), 2);
    }

    #[test]
    fn variants_drop_suppression_on_fallback() {
        let variants = chain_variants(Some(Path::new("/m.rnnn")), 1.0);
        assert_eq!(variants.len(), 2);
        assert!(variants[0].has_noise_suppression());
        assert!(!variants[1].has_noise_suppression());

        let variants = chain_variants(None, 1.0);
        assert_eq!(variants.len(), 1);
        assert!(!variants[0].has_noise_suppression());
    }

    #[test]
    fn model_path_special_chars_are_escaped() {
        let stage = FilterStage::NoiseSuppression {
            model: PathBuf::from("C:\\models\\a,b'c.rnnn"),
        };
        assert_eq!(stage.to_string(), "arnndn=m=C\\:\\\\models\\\\a\\,b\\'c.rnnn");
    }

    #[test]
    fn resolve_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("sh.rnnn");
        assert_eq!(resolve_model_path(Some(&model)), None);

        std::fs::write(&model, b"model").unwrap();
        assert_eq!(resolve_model_path(Some(&model)), Some(model.clone()));
        assert_eq!(resolve_model_path(None), None);
    }
}
