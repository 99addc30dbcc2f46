// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Anchor point for an overlay caption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextPosition {
    /// Centered horizontally, 20px below the top edge
    TopCenter,
    /// Dead center of the frame
    MiddleCenter,
    /// Centered horizontally, 20px above the bottom edge
    BottomCenter,
}

impl TextPosition {
    /// Parse a position name as given on the command line or in a form
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_lowercase().as_str() {
            "top" | "top-center" | "top center" => Ok(TextPosition::TopCenter),
            "middle" | "middle-center" | "middle center" | "center" => {
                Ok(TextPosition::MiddleCenter)
            }
            "bottom" | "bottom-center" | "bottom center" => Ok(TextPosition::BottomCenter),
            other => Err(DomainError::BadArgs(format!(
                "Unknown text position '{}'. Supported: top, middle, bottom",
                other
            ))),
        }
    }
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextPosition::TopCenter => "top-center",
            TextPosition::MiddleCenter => "middle-center",
            TextPosition::BottomCenter => "bottom-center",
        };
        write!(f, "{}", name)
    }
}

/// Overlay caption description
///
/// Content is validated at construction and sanitized again when the drawtext
/// fragment is built, so a spec that reaches the composer is always embeddable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpec {
    pub content: String,
    pub position: TextPosition,
    pub font_size_pt: u32,
    pub color: String,
    /// Box color behind the text; "none" or "transparent" disables the box
    pub background_color: String,
    pub bold: bool,
    pub italic: bool,
}

impl TextSpec {
    /// Minimum accepted font size in points
    pub const MIN_FONT_SIZE: u32 = 10;
    /// Maximum accepted font size in points
    pub const MAX_FONT_SIZE: u32 = 200;

    /// Create a new text spec with validation
    pub fn new(
        content: impl Into<String>,
        position: TextPosition,
        font_size_pt: u32,
        color: impl Into<String>,
        background_color: impl Into<String>,
        bold: bool,
        italic: bool,
    ) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::BadArgs(
                "Overlay text cannot be empty".to_string(),
            ));
        }
        if !(Self::MIN_FONT_SIZE..=Self::MAX_FONT_SIZE).contains(&font_size_pt) {
            return Err(DomainError::BadArgs(format!(
                "Font size {} is out of range ({}-{})",
                font_size_pt,
                Self::MIN_FONT_SIZE,
                Self::MAX_FONT_SIZE
            )));
        }
        let color = color.into();
        if color.trim().is_empty() {
            return Err(DomainError::BadArgs(
                "Text color cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            content,
            position,
            font_size_pt,
            color,
            background_color: background_color.into(),
            bold,
            italic,
        })
    }

    /// Whether a background box should be drawn behind the text
    pub fn has_background(&self) -> bool {
        let bg = self.background_color.trim().to_lowercase();
        !bg.is_empty() && bg != "none" && bg != "transparent"
    }
}

/// Per-clip processing options, immutable once built
///
/// Built from CLI/form input, consumed by the pipeline composer, discarded
/// after the pipeline for the clip has been assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoOptions {
    /// Mirror the video horizontally
    pub horizontal_flip: bool,
    /// Rotation in degrees, [-45, 45]; magnitudes near zero disable the stage
    pub rotation_degrees: f64,
    /// Playback speed multiplier, [0.5, 1.5]; 1.0 disables the stage
    pub playback_speed: f64,
    /// Zoom ramp end scale in (1.0, 2.0]; `None` selects the default mild ramp
    pub zoom_end_scale: Option<f64>,
    /// Crop away edge padding left behind by an earlier processing pass
    pub trim_edges: bool,
    /// Optional overlay caption
    pub text_overlay: Option<TextSpec>,
    /// Optional background-noise track to loop and mix in
    pub noise_audio_path: Option<PathBuf>,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            horizontal_flip: false,
            rotation_degrees: 0.0,
            playback_speed: 1.0,
            zoom_end_scale: None,
            trim_edges: false,
            text_overlay: None,
            noise_audio_path: None,
        }
    }
}

impl VideoOptions {
    /// Minimum accepted playback speed
    pub const MIN_SPEED: f64 = 0.5;
    /// Maximum accepted playback speed
    pub const MAX_SPEED: f64 = 1.5;
    /// Maximum accepted rotation magnitude in degrees
    pub const MAX_ROTATION_DEG: f64 = 45.0;
    /// Maximum accepted zoom end scale
    pub const MAX_ZOOM: f64 = 2.0;

    /// Create options with all perturbations at their neutral defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable horizontal mirroring
    pub fn with_horizontal_flip(mut self, flip: bool) -> Self {
        self.horizontal_flip = flip;
        self
    }

    /// Set the rotation angle in degrees
    pub fn with_rotation_degrees(mut self, degrees: f64) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    /// Set the playback speed multiplier
    pub fn with_playback_speed(mut self, speed: f64) -> Self {
        self.playback_speed = speed;
        self
    }

    /// Set an explicit zoom ramp end scale
    pub fn with_zoom_end_scale(mut self, scale: f64) -> Self {
        self.zoom_end_scale = Some(scale);
        self
    }

    /// Enable the crop-trim stage
    pub fn with_trim_edges(mut self, trim: bool) -> Self {
        self.trim_edges = trim;
        self
    }

    /// Attach an overlay caption
    pub fn with_text_overlay(mut self, spec: TextSpec) -> Self {
        self.text_overlay = Some(spec);
        self
    }

    /// Attach a background-noise track
    pub fn with_noise_audio(mut self, path: PathBuf) -> Self {
        self.noise_audio_path = Some(path);
        self
    }

    /// Validate every field against its documented range
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.rotation_degrees.abs() > Self::MAX_ROTATION_DEG {
            return Err(DomainError::ValidationFailed(format!(
                "Rotation {}° is out of range (±{}°)",
                self.rotation_degrees,
                Self::MAX_ROTATION_DEG
            )));
        }
        if !(Self::MIN_SPEED..=Self::MAX_SPEED).contains(&self.playback_speed) {
            return Err(DomainError::ValidationFailed(format!(
                "Playback speed {} is out of range ({}-{})",
                self.playback_speed,
                Self::MIN_SPEED,
                Self::MAX_SPEED
            )));
        }
        if let Some(scale) = self.zoom_end_scale {
            if scale <= 1.0 || scale > Self::MAX_ZOOM {
                return Err(DomainError::ValidationFailed(format!(
                    "Zoom end scale {} is out of range (1.0, {}]",
                    scale,
                    Self::MAX_ZOOM
                )));
            }
        }
        Ok(())
    }
}

/// Resolved audio specification for one invocation
#[derive(Debug, Clone, PartialEq)]
pub enum AudioSpec {
    /// Single linear filter chain on the primary track
    Chain(String),
    /// Two labeled branches merged by a mix node; requires the secondary
    /// noise input to be declared on the command line
    Graph { filter_complex: String },
}

/// Resolved, ordered pipeline for one invocation
///
/// Derived and transient: exists only between composition and execution.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSpec {
    /// Comma-joined video filter chain
    pub video_chain: String,
    /// Audio chain or branching graph
    pub audio: AudioSpec,
    /// Secondary noise input to loop, when the audio spec is a graph
    pub noise_input: Option<PathBuf>,
}

impl PipelineSpec {
    /// Whether this pipeline declares a secondary noise input
    pub fn uses_noise(&self) -> bool {
        self.noise_input.is_some()
    }
}

/// Outcome of processing one clip, kept for the batch report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub filename: String,
    pub success: bool,
    pub output_path: Option<PathBuf>,
    /// Frame-averaged similarity against the source, 0-100; `None` means the
    /// score could not be measured, not that processing failed
    pub ssim_percent: Option<f64>,
    pub error_detail: Option<String>,
}

impl ProcessingResult {
    /// Record a successful transform
    pub fn succeeded(filename: impl Into<String>, output_path: PathBuf) -> Self {
        Self {
            filename: filename.into(),
            success: true,
            output_path: Some(output_path),
            ssim_percent: None,
            error_detail: None,
        }
    }

    /// Record a per-file failure with the full diagnostic detail
    pub fn failed(filename: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            success: false,
            output_path: None,
            ssim_percent: None,
            error_detail: Some(detail.into()),
        }
    }

    /// Attach a measured similarity score
    pub fn with_ssim(mut self, percent: Option<f64>) -> Self {
        self.ssim_percent = percent;
        self
    }
}

/// Aggregate report for one batch run, serialized alongside the outputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub processed: usize,
    pub failed: usize,
    pub results: Vec<ProcessingResult>,
}

impl BatchReport {
    /// Build a report from collected per-file results
    pub fn new(started_at: DateTime<Utc>, results: Vec<ProcessingResult>) -> Self {
        let processed = results.iter().filter(|r| r.success).count();
        let failed = results.len() - processed;
        Self {
            started_at,
            processed,
            failed,
            results,
        }
    }
}

#[cfg(test)]
mod tests;
