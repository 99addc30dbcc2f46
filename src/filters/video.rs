//! Video stage fragment builders
//!
//! Pure functions: parameters in, one self-contained filter fragment out.
//! Randomized parameters are sampled by the composer and passed in here, so
//! every builder is deterministic and directly testable.

use crate::config::ProcessingConfig;

/// Scale to fit the output canvas preserving aspect ratio, then pad to the
/// exact canvas size, centered
pub fn normalize(config: &ProcessingConfig) -> String {
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2",
        w = config.frame_width,
        h = config.frame_height,
    )
}

/// Centered crop keeping `crop_keep_ratio` of each dimension
pub fn crop_trim(config: &ProcessingConfig) -> String {
    let r = format!("{:.2}", config.crop_keep_ratio);
    format!("crop=iw*{r}:ih*{r}:(iw-iw*{r})/2:(ih-ih*{r})/2")
}

/// Sampled parameters for the zoom ramp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomPanParams {
    /// Scale reached at the end of the clip, in (1.0, 2.0]
    pub end_scale: f64,
    /// Pan offset as a signed fraction of the available horizontal travel
    pub pan_x: f64,
    /// Pan offset as a signed fraction of the available vertical travel
    pub pan_y: f64,
}

impl ZoomPanParams {
    /// The default mild ramp: subtle zoom, centered pan
    pub fn default_ramp(config: &ProcessingConfig) -> Self {
        Self {
            end_scale: config.zoom_default_end,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

/// Per-frame zoom ramp from 1.0 to the end scale over the capped duration
pub fn zoom_pan(config: &ProcessingConfig, params: ZoomPanParams) -> String {
    let frames = config.output_frame_count().max(1);
    let step = (params.end_scale - 1.0) / frames as f64;
    let x = pan_expr("iw", params.pan_x);
    let y = pan_expr("ih", params.pan_y);
    format!(
        "zoompan=z='min(max(1,zoom)+{step:.6},{end:.2})':x='{x}':y='{y}':s={w}x{h}:d=1:fps={fps}",
        end = params.end_scale,
        w = config.frame_width,
        h = config.frame_height,
        fps = config.output_fps,
    )
}

fn pan_expr(dim: &str, offset: f64) -> String {
    // Centered expression, optionally displaced by a fraction of the travel
    // available at the current zoom
    if offset == 0.0 {
        format!("{dim}/2-({dim}/zoom/2)")
    } else {
        format!("{dim}/2-({dim}/zoom/2)+({dim}-{dim}/zoom)/2*{offset:.4}")
    }
}

/// Rotation by `degrees`, exposed corners filled with a solid color
pub fn rotate(degrees: f64) -> String {
    format!("rotate={:.5}:bilinear=0:fillcolor=black", degrees.to_radians())
}

/// Small fixed corner marker
pub fn marker_box() -> String {
    "drawbox=x=2:y=2:w=2:h=2:color=white@0.9:t=fill".to_string()
}

/// Horizontal mirror
pub fn flip() -> String {
    "hflip".to_string()
}

/// Fixed small brightness/contrast lift; also pins the sample aspect ratio
pub fn color_trim(config: &ProcessingConfig) -> String {
    format!(
        "setsar=1,eq=brightness={}:contrast={}",
        config.color_brightness, config.color_contrast
    )
}

/// Hue rotation by the sampled number of degrees
pub fn hue_jitter(degrees: f64) -> String {
    format!("hue=h={:.2}", degrees)
}

/// Temporal film grain at the sampled strength
pub fn grain(strength: u8) -> String {
    format!("noise=alls={}:allf=t", strength)
}

/// Symmetric barrel/pincushion distortion, equal on both coefficients
pub fn lens_distortion(coefficient: f64) -> String {
    format!("lenscorrection=k1={0:.4}:k2={0:.4}", coefficient)
}

/// Presentation-timestamp rescale relative to the first frame's timestamp.
/// Rescaling against STARTPTS rather than raw zero avoids a leading
/// blank/duplicate frame on inputs that do not start at PTS 0.
pub fn speed(multiplier: f64) -> String {
    format!("setpts=(PTS-STARTPTS)/{:.4}", multiplier)
}
