//! Batch orchestrator
//!
//! Iterates a list of videos sequentially, resolving options per clip,
//! invoking the transform engine, and scoring successful outputs. Per-file
//! failures are tallied and the batch continues; only the missing-engine
//! condition aborts the run. One engine invocation runs to completion before
//! the next begins.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::rngs::SmallRng;
use rand::Rng;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::config::ProcessingConfig;
use crate::domain::model::{BatchReport, ProcessingResult, VideoOptions};
use crate::domain::rules::{BatchRules, InputRules};
use crate::engine::{SimilarityScorer, TransformExecutor};
use crate::error::{RevidError, RevidResult};
use crate::planner::PipelineComposer;

pub mod staging;

pub use staging::{archive_outputs, StagedOutput};

/// Name of the machine-readable report written next to the outputs
pub const REPORT_FILENAME: &str = "report.json";

/// Supplies the options record for each clip: one shared record for the
/// whole batch, or one per video
pub trait OptionsResolver {
    fn resolve(&self, index: usize, input: &Path) -> VideoOptions;
}

/// One options record applied to every clip in the batch
pub struct SharedOptions(pub VideoOptions);

impl OptionsResolver for SharedOptions {
    fn resolve(&self, _index: usize, _input: &Path) -> VideoOptions {
        self.0.clone()
    }
}

/// Per-video options computed by a closure over the clip index and path
pub struct PerVideoOptions<F>(pub F)
where
    F: Fn(usize, &Path) -> VideoOptions;

impl<F> OptionsResolver for PerVideoOptions<F>
where
    F: Fn(usize, &Path) -> VideoOptions,
{
    fn resolve(&self, index: usize, input: &Path) -> VideoOptions {
        (self.0)(index, input)
    }
}

/// Drives a whole batch through composition, transform, and scoring
pub struct BatchOrchestrator<R: Rng = SmallRng> {
    config: ProcessingConfig,
    composer: PipelineComposer<R>,
    scorer: SimilarityScorer,
}

impl BatchOrchestrator<SmallRng> {
    /// Create an orchestrator with entropy-seeded jitter
    pub fn new(config: ProcessingConfig) -> Self {
        Self {
            composer: PipelineComposer::new(config.clone()),
            scorer: SimilarityScorer::new(config.clone()),
            config,
        }
    }
}

impl<R: Rng> BatchOrchestrator<R> {
    /// Create an orchestrator with injected parts, for deterministic tests
    pub fn with_parts(
        config: ProcessingConfig,
        composer: PipelineComposer<R>,
        scorer: SimilarityScorer,
    ) -> Self {
        Self {
            config,
            composer,
            scorer,
        }
    }

    /// Process every video in the list.
    ///
    /// Validates the batch ceiling before any invocation, stages outputs in a
    /// scratch directory, and swaps them into the destination once the batch
    /// completes. Returns the aggregate report; the only error that aborts
    /// the batch mid-way is the fatal missing-engine condition.
    pub fn run_batch<E: TransformExecutor>(
        &mut self,
        executor: &mut E,
        videos: &[PathBuf],
        resolver: &dyn OptionsResolver,
    ) -> RevidResult<BatchReport> {
        BatchRules::check_batch_size(videos.len(), self.config.max_batch_size)?;

        let started_at = Utc::now();
        let staged = StagedOutput::begin(&self.config.output_dir)?;
        let mut results: Vec<ProcessingResult> = Vec::with_capacity(videos.len());

        for (index, input) in videos.iter().enumerate() {
            let filename = display_name(input);
            let options = resolver.resolve(index, input);
            info!(
                "Processing '{}' ({}/{})",
                filename,
                index + 1,
                videos.len()
            );

            match self.process_one(executor, staged.path(), input, &options) {
                Ok(result) => {
                    info!("Successfully processed '{}'", filename);
                    results.push(result);
                }
                Err(err @ RevidError::EngineMissing { .. }) => {
                    error!("Halting batch: {}", err);
                    return Err(err);
                }
                Err(err) => {
                    error!("Failed to process '{}': {}", filename, err);
                    results.push(ProcessingResult::failed(filename, err.to_string()));
                }
            }
        }

        let delivered = staged.commit()?;
        let report = BatchReport::new(started_at, results);
        self.write_report(&delivered, &report)?;
        info!(
            "Batch complete: {} processed, {} failed",
            report.processed, report.failed
        );
        Ok(report)
    }

    fn process_one<E: TransformExecutor>(
        &mut self,
        executor: &mut E,
        staging_dir: &Path,
        input: &Path,
        options: &VideoOptions,
    ) -> RevidResult<ProcessingResult> {
        let filename = display_name(input);
        let spec = self.composer.compose(options)?;
        let output = staging_dir.join(format!("{}{}", self.config.output_prefix, filename));

        executor.transform(&spec, input, &output)?;

        let ssim = self.scorer.score(input, &output);
        if ssim.is_none() {
            warn!("Similarity score unavailable for '{}'", filename);
        }
        Ok(ProcessingResult::succeeded(filename, output).with_ssim(ssim))
    }

    fn write_report(&self, delivered: &Path, report: &BatchReport) -> RevidResult<()> {
        let path = delivered.join(REPORT_FILENAME);
        let json = serde_json::to_string_pretty(report).map_err(|e| RevidError::Staging {
            message: format!("report serialization failed: {}", e),
        })?;
        std::fs::write(&path, json)?;
        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Collect the videos a run should process: either one explicitly-named file
/// inside the input folder, or every supported file in it
pub fn discover_inputs(input_dir: &Path, specific: Option<&str>) -> RevidResult<Vec<PathBuf>> {
    if let Some(name) = specific {
        let path = input_dir.join(name);
        InputRules::check_input_file(&path)?;
        return Ok(vec![path]);
    }

    if !input_dir.is_dir() {
        return Err(RevidError::Validation {
            message: format!(
                "Input folder '{}' not found. Create it and place your .mp4 videos inside, \
                 or select a single file with --file",
                input_dir.display()
            ),
        });
    }

    let mut inputs: Vec<PathBuf> = WalkDir::new(input_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| InputRules::is_supported_input(path))
        .collect();
    inputs.sort();
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_finds_only_supported_files() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("b.mp4"), b"x").unwrap();
        std::fs::write(root.path().join("a.MP4"), b"x").unwrap();
        std::fs::write(root.path().join("notes.txt"), b"x").unwrap();

        let inputs = discover_inputs(root.path(), None).unwrap();
        let names: Vec<String> = inputs.iter().map(|p| display_name(p)).collect();
        assert_eq!(names, vec!["a.MP4", "b.mp4"]);
    }

    #[test]
    fn discover_rejects_missing_folder() {
        let result = discover_inputs(Path::new("definitely/not/here"), None);
        assert!(matches!(result, Err(RevidError::Validation { .. })));
    }

    #[test]
    fn discover_validates_specific_file() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("clip.mp4"), b"x").unwrap();

        let found = discover_inputs(root.path(), Some("clip.mp4")).unwrap();
        assert_eq!(found.len(), 1);

        assert!(discover_inputs(root.path(), Some("missing.mp4")).is_err());
        assert!(discover_inputs(root.path(), Some("clip.avi")).is_err());
    }
}
