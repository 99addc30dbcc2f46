//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Process a single file from the input folder instead of every .mp4
    #[arg(short, long)]
    pub file: Option<String>,

    /// Horizontally flip the video
    #[arg(long)]
    pub hflip: bool,

    /// Playback speed multiplier (0.5-1.5)
    #[arg(long, default_value_t = 1.0)]
    pub speed: f64,

    /// Rotation in degrees (-45 to 45)
    #[arg(long, default_value_t = 0.0)]
    pub rotate: f64,

    /// Zoom ramp end scale (above 1.0, up to 2.0); omit for the default ramp
    #[arg(long)]
    pub zoom: Option<f64>,

    /// Crop away edge padding left behind by a previous pass
    #[arg(long)]
    pub trim_edges: bool,

    /// Background-noise audio file to loop and mix in
    #[arg(long)]
    pub noise: Option<PathBuf>,

    /// Skip background-noise mixing even when the default file exists
    #[arg(long)]
    pub no_noise: bool,

    /// Caption to draw over the video
    #[arg(long)]
    pub text: Option<String>,

    /// Caption anchor: top, middle, or bottom
    #[arg(long, default_value = "bottom")]
    pub text_position: String,

    /// Caption font size in points (10-200)
    #[arg(long, default_value_t = 24)]
    pub font_size: u32,

    /// Caption color (e.g. white, #FF0000)
    #[arg(long, default_value = "white")]
    pub text_color: String,

    /// Caption background color (e.g. black@0.5, none)
    #[arg(long, default_value = "black@0.5")]
    pub text_bg: String,

    /// Use a bold font for the caption
    #[arg(long)]
    pub bold: bool,

    /// Use an italic font for the caption
    #[arg(long)]
    pub italic: bool,

    /// Folder scanned for input videos
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Folder the outputs are delivered to (recreated per batch)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Bundle the delivered outputs into a zip next to the output folder
    #[arg(long)]
    pub archive: bool,

    /// Configuration file
    #[arg(long, default_value = "revid.toml")]
    pub config: PathBuf,
}

/// Arguments for the score command
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// The original clip
    #[arg(short, long)]
    pub original: PathBuf,

    /// The processed clip to compare against it
    #[arg(short, long)]
    pub processed: PathBuf,

    /// Configuration file
    #[arg(long, default_value = "revid.toml")]
    pub config: PathBuf,
}
