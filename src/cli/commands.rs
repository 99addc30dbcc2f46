//! Command implementations

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::batch::{archive_outputs, discover_inputs, BatchOrchestrator, SharedOptions};
use crate::cli::args::{ProcessArgs, ScoreArgs};
use crate::config::ProcessingConfig;
use crate::domain::model::{TextPosition, TextSpec, VideoOptions};
use crate::domain::rules::OptionRules;
use crate::engine::{FfmpegInvoker, SimilarityScorer};

/// Execute the process command
pub fn process(args: ProcessArgs) -> Result<()> {
    let mut config = ProcessingConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load configuration '{}'", args.config.display()))?;
    if let Some(input_dir) = &args.input_dir {
        config.input_dir = input_dir.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }

    OptionRules::check_speed(args.speed).map_err(|e| anyhow::anyhow!("{}", e))?;

    let options = build_options(&args, &config)?;
    options
        .validate()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let inputs = discover_inputs(&config.input_dir, args.file.as_deref())
        .context("Could not resolve input videos")?;
    if inputs.is_empty() {
        warn!("No .mp4 files found in '{}'", config.input_dir.display());
        return Ok(());
    }
    info!("Found {} video(s) to process", inputs.len());

    let mut invoker = FfmpegInvoker::new(config.clone());
    let mut orchestrator = BatchOrchestrator::new(config.clone());
    let report = orchestrator
        .run_batch(&mut invoker, &inputs, &SharedOptions(options))
        .context("Batch processing failed")?;

    info!("Successfully processed: {} file(s)", report.processed);
    info!("Skipped/Failed: {} file(s)", report.failed);
    if report.failed > 0 {
        warn!("Check the log output above for error details on failed files");
    }
    for result in &report.results {
        match (&result.success, result.ssim_percent) {
            (true, Some(percent)) => {
                info!("  {} -> similarity {:.2}%", result.filename, percent)
            }
            (true, None) => info!("  {} -> similarity unknown", result.filename),
            (false, _) => info!("  {} -> FAILED", result.filename),
        }
    }
    info!("Processed videos are in: {}", config.output_dir.display());

    if args.archive && report.processed > 0 {
        let archive_path = config.output_dir.with_extension("zip");
        archive_outputs(&config.output_dir, &archive_path)
            .context("Failed to archive outputs")?;
    }

    Ok(())
}

/// Execute the score command
pub fn score(args: ScoreArgs) -> Result<()> {
    let config = ProcessingConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load configuration '{}'", args.config.display()))?;

    let scorer = SimilarityScorer::new(config);
    match scorer.score(&args.original, &args.processed) {
        Some(percent) => {
            info!(
                "Similarity between '{}' and '{}': {:.2}%",
                args.original.display(),
                args.processed.display(),
                percent
            );
            println!("{:.2}", percent);
        }
        None => {
            warn!("Similarity score unavailable");
            println!("unknown");
        }
    }
    Ok(())
}

/// Assemble the per-clip options record from CLI flags
fn build_options(args: &ProcessArgs, config: &ProcessingConfig) -> Result<VideoOptions> {
    let mut options = VideoOptions::new()
        .with_horizontal_flip(args.hflip)
        .with_rotation_degrees(args.rotate)
        .with_playback_speed(args.speed)
        .with_trim_edges(args.trim_edges);

    if let Some(zoom) = args.zoom {
        options = options.with_zoom_end_scale(zoom);
    }

    if let Some(content) = &args.text {
        let position =
            TextPosition::parse(&args.text_position).map_err(|e| anyhow::anyhow!("{}", e))?;
        let spec = TextSpec::new(
            content.clone(),
            position,
            args.font_size,
            args.text_color.clone(),
            args.text_bg.clone(),
            args.bold,
            args.italic,
        )
        .map_err(|e| anyhow::anyhow!("{}", e))?;
        options = options.with_text_overlay(spec);
    }

    if !args.no_noise {
        if let Some(noise) = &args.noise {
            if !noise.is_file() {
                anyhow::bail!("Noise audio file '{}' not found", noise.display());
            }
            options = options.with_noise_audio(noise.clone());
        } else if config.default_noise_path.is_file() {
            info!(
                "Background noise file found: {}. It will be mixed in.",
                config.default_noise_path.display()
            );
            options = options.with_noise_audio(config.default_noise_path.clone());
        } else {
            info!(
                "No background noise file at '{}', proceeding without it",
                config.default_noise_path.display()
            );
        }
    }

    Ok(options)
}
