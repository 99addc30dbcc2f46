//! Similarity scorer
//!
//! Runs the engine in a dual-input comparison mode: both inputs are
//! normalized to the output canvas, fed through the structural-similarity
//! filter, and the frame-averaged score is parsed from the diagnostic
//! stream. An absent score is "unknown", never a processing failure.

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::ProcessingConfig;
use crate::engine::{discovery, run_captured};
use crate::filters::video;

/// Measures perceptual similarity between an original and a processed clip
pub struct SimilarityScorer {
    config: ProcessingConfig,
    engine: String,
}

fn score_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"SSIM.*?All:\s*([0-9.]+)").expect("similarity pattern is valid")
    })
}

impl SimilarityScorer {
    /// Create a scorer using the discovered engine
    pub fn new(config: ProcessingConfig) -> Self {
        Self {
            engine: discovery::engine_path(),
            config,
        }
    }

    /// Override the engine binary location
    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Compare two clips, returning a 0-100 score or `None` when the score
    /// cannot be measured (missing pattern, timeout, or engine trouble)
    pub fn score(&self, original: &Path, processed: &Path) -> Option<f64> {
        let normalize = video::normalize(&self.config);
        let graph = format!("[0:v]{normalize}[v0];[1:v]{normalize}[v1];[v0][v1]ssim");

        let mut command = Command::new(&self.engine);
        command
            .arg("-i")
            .arg(original)
            .arg("-i")
            .arg(processed)
            .arg("-filter_complex")
            .arg(&graph)
            .args(["-f", "null", "-"]);

        let budget = Duration::from_secs(self.config.ssim_timeout_secs);
        let output = match run_captured(command, Some(budget)) {
            Ok(output) => output,
            Err(err) => {
                warn!("Similarity measurement could not start: {}", err);
                return None;
            }
        };
        if output.timed_out {
            warn!(
                "Similarity measurement timed out after {}s",
                self.config.ssim_timeout_secs
            );
            return None;
        }

        match Self::parse_score(&output.stderr) {
            Some(percent) => {
                debug!("Similarity score: {:.2}%", percent);
                Some(percent)
            }
            None => {
                warn!("Similarity pattern not found in engine diagnostics");
                None
            }
        }
    }

    /// Extract the frame-averaged score from the diagnostic stream and scale
    /// it to 0-100
    pub fn parse_score(diagnostics: &str) -> Option<f64> {
        score_pattern()
            .captures(diagnostics)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .map(|value| value * 100.0)
    }
}
