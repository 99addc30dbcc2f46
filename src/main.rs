//! Revid batch video re-encoder
//!
//! A command-line tool that takes short vertical videos, applies a pipeline
//! of visual/audio perturbations (normalize/pad, zoom ramp, rotation, hue and
//! grain jitter, lens distortion, speed change, captions, background-noise
//! mixing), and reports how similar each output still is to its source.
//!
//! # Usage
//!
//! ```bash
//! revid process --hflip --speed 1.05
//! revid process --file clip.mp4 --text "Hello" --text-position top
//! revid score --original videos/clip.mp4 --processed treated/tt_clip.mp4
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use revid_cli::cli::{commands, Cli, Commands};

/// Main entry point for the Revid CLI application
fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting Revid batch re-encoder");

    // Parse command line arguments
    let cli = Cli::parse();

    // Execute the requested command
    match cli.command {
        Commands::Process(args) => {
            info!("Executing process command");
            commands::process(args)?;
        }
        Commands::Score(args) => {
            info!("Executing score command");
            commands::score(args)?;
        }
    }

    info!("Revid completed successfully");
    Ok(())
}
