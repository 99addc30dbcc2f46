//! CLI module for Revid
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// Revid batch video re-encoder
///
/// Strips metadata, normalizes to a vertical canvas, applies a chain of
/// visual/audio perturbations, and reports how similar each output still is
/// to its source.
#[derive(Parser)]
#[command(name = "revid")]
#[command(about = "Revid - batch perturbation re-encoder for short vertical videos")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Re-encode a folder of videos (or one file) with perturbations
    Process(args::ProcessArgs),
    /// Measure the similarity between an original and a processed clip
    Score(args::ScoreArgs),
}
