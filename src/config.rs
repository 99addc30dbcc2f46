//! Processing configuration
//!
//! Every tunable the pipeline uses is a named field here rather than an inline
//! constant: canvas geometry, codec/quality targets, the audio disguise
//! constants, and the jitter bands the stochastic stages draw from. Defaults
//! match the historical behaviour; a `revid.toml` file can override any field.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::error::{RevidError, RevidResult};

/// Complete configuration for one processing run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Output canvas width in pixels
    pub frame_width: u32,
    /// Output canvas height in pixels
    pub frame_height: u32,
    /// Hard cap on output duration in seconds
    pub output_duration_secs: u32,
    /// Output frame rate assumed by the zoom ramp
    pub output_fps: u32,

    /// Fixed video bitrate (e.g. "6000k"); `None` selects jittered CRF mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_bitrate: Option<String>,
    /// Lowest CRF drawn when no fixed bitrate is configured
    pub crf_min: u8,
    /// Highest CRF drawn when no fixed bitrate is configured
    pub crf_max: u8,
    /// Video codec passed to the engine
    pub video_codec: String,
    /// Audio codec passed to the engine
    pub audio_codec: String,
    /// Audio bitrate passed to the engine
    pub audio_bitrate: String,

    /// Audio resample rate in Hz
    pub audio_sample_rate: u32,
    /// Small pitch/rate multiplier applied to every output's audio
    pub audio_rate_shift: f64,
    /// Initial delay applied to both audio channels, in milliseconds
    pub audio_delay_ms: u32,
    /// Attenuation applied to the background-noise branch before mixing
    pub noise_volume: f64,

    /// Fraction of width/height kept by the crop-trim stage
    pub crop_keep_ratio: f64,
    /// Zoom ramp target used when no explicit end scale is requested
    pub zoom_default_end: f64,
    /// Maximum pan offset as a fraction of the available travel per axis
    pub pan_jitter_max: f64,
    /// Maximum magnitude of the per-run hue rotation, in degrees
    pub hue_jitter_max_deg: f64,
    /// Lowest grain strength drawn per run
    pub grain_min: u8,
    /// Highest grain strength drawn per run
    pub grain_max: u8,
    /// Maximum magnitude of the lens-distortion coefficient drawn per run
    pub lens_jitter_max: f64,
    /// Brightness lift applied by the color-trim stage
    pub color_brightness: f64,
    /// Contrast factor applied by the color-trim stage
    pub color_contrast: f64,

    /// Rotation magnitudes below this many degrees are treated as no rotation
    pub rotation_epsilon_deg: f64,
    /// Playback-speed deviations from 1.0 below this are treated as disabled
    pub speed_epsilon: f64,
    /// Tempo factors closer to 1.0 than this are dropped from the chain
    pub tempo_epsilon: f64,

    /// Maximum number of videos accepted per batch
    pub max_batch_size: usize,
    /// Prefix prepended to every output filename
    pub output_prefix: String,
    /// Folder scanned for input videos
    pub input_dir: PathBuf,
    /// Folder the processed videos are delivered to (recreated per batch)
    pub output_dir: PathBuf,
    /// Background-noise file mixed in when present on disk
    pub default_noise_path: PathBuf,

    /// Time budget for a similarity measurement, in seconds
    pub ssim_timeout_secs: u64,
    /// Optional time budget for the primary transform; `None` is unbounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform_timeout_secs: Option<u64>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            frame_width: 1080,
            frame_height: 1920,
            output_duration_secs: 29,
            output_fps: 30,
            video_bitrate: None,
            crf_min: 21,
            crf_max: 26,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
            audio_sample_rate: 48000,
            audio_rate_shift: 1.03,
            audio_delay_ms: 200,
            noise_volume: 0.02,
            crop_keep_ratio: 0.97,
            zoom_default_end: 1.10,
            pan_jitter_max: 0.30,
            hue_jitter_max_deg: 5.0,
            grain_min: 2,
            grain_max: 8,
            lens_jitter_max: 0.03,
            color_brightness: 0.005,
            color_contrast: 1.005,
            rotation_epsilon_deg: 0.05,
            speed_epsilon: 0.01,
            tempo_epsilon: 1e-3,
            max_batch_size: 10,
            output_prefix: "tt_".to_string(),
            input_dir: PathBuf::from("videos"),
            output_dir: PathBuf::from("treated"),
            default_noise_path: PathBuf::from("sounds/background_noise.mp3"),
            ssim_timeout_secs: 60,
            transform_timeout_secs: None,
        }
    }
}

impl ProcessingConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> RevidResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw).map_err(|e| RevidError::Config {
            message: format!("failed to parse {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist
    pub fn load_or_default(path: &Path) -> RevidResult<Self> {
        if path.is_file() {
            tracing::info!("Loading configuration from: {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate internal consistency of the configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(DomainError::BadArgs(
                "Frame dimensions cannot be zero".to_string(),
            ));
        }
        if self.output_duration_secs == 0 || self.output_fps == 0 {
            return Err(DomainError::BadArgs(
                "Output duration and frame rate must be positive".to_string(),
            ));
        }
        if self.crf_min > self.crf_max || self.crf_max > 51 {
            return Err(DomainError::BadArgs(format!(
                "CRF band {}..={} is invalid (must be ordered, within 0-51)",
                self.crf_min, self.crf_max
            )));
        }
        if self.grain_min > self.grain_max {
            return Err(DomainError::BadArgs(format!(
                "Grain band {}..={} is invalid",
                self.grain_min, self.grain_max
            )));
        }
        if self.crop_keep_ratio <= 0.0 || self.crop_keep_ratio > 1.0 {
            return Err(DomainError::BadArgs(format!(
                "Crop keep ratio {} must be in (0, 1]",
                self.crop_keep_ratio
            )));
        }
        if self.zoom_default_end <= 1.0 || self.zoom_default_end > 2.0 {
            return Err(DomainError::BadArgs(format!(
                "Default zoom end scale {} must be in (1.0, 2.0]",
                self.zoom_default_end
            )));
        }
        if self.max_batch_size == 0 {
            return Err(DomainError::BadArgs(
                "Batch size ceiling must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Total number of frames in the capped output, as seen by the zoom ramp
    pub fn output_frame_count(&self) -> u32 {
        self.output_fps * self.output_duration_secs
    }
}
