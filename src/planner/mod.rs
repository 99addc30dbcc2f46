//! Pipeline composer
//!
//! Turns one immutable [`VideoOptions`] record into a [`PipelineSpec`]:
//! a single ordered video-filter chain plus an audio chain or, when a noise
//! bed is attached, a two-branch graph merged by a mix node. Conditional
//! stages are resolved here, stochastic defaults are sampled from the
//! injected randomness source, and the final order is computed from the
//! stages' declared predecessors.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::config::ProcessingConfig;
use crate::domain::errors::DomainError;
use crate::domain::model::{AudioSpec, PipelineSpec, VideoOptions};
use crate::filters::video::ZoomPanParams;
use crate::filters::{audio, text, video, FilterKind, FilterStage};
use crate::fonts;

/// Assembles pipelines from per-clip options
pub struct PipelineComposer<R: Rng = SmallRng> {
    config: ProcessingConfig,
    rng: R,
}

impl PipelineComposer<SmallRng> {
    /// Create a composer with an entropy-seeded jitter source
    pub fn new(config: ProcessingConfig) -> Self {
        Self {
            config,
            rng: SmallRng::from_entropy(),
        }
    }
}

impl<R: Rng> PipelineComposer<R> {
    /// Create a composer with an injected jitter source, for deterministic
    /// tests
    pub fn with_rng(config: ProcessingConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Compose the full pipeline for one clip
    pub fn compose(&mut self, options: &VideoOptions) -> Result<PipelineSpec, DomainError> {
        options.validate()?;
        let video_chain = self.compose_video(options)?;
        let (audio_spec, noise_input) = self.compose_audio(options)?;
        Ok(PipelineSpec {
            video_chain,
            audio: audio_spec,
            noise_input,
        })
    }

    fn compose_video(&mut self, options: &VideoOptions) -> Result<String, DomainError> {
        let mut stages = vec![FilterStage::new(
            FilterKind::Normalize,
            video::normalize(&self.config),
        )];

        if options.trim_edges {
            stages.push(FilterStage::new(
                FilterKind::CropTrim,
                video::crop_trim(&self.config),
            ));
        }

        // The ramp always runs; an explicit end scale additionally draws an
        // independent pan offset per axis
        let pan_band = self.config.pan_jitter_max;
        let ramp = match options.zoom_end_scale {
            Some(end_scale) => ZoomPanParams {
                end_scale,
                pan_x: self.rng.gen_range(-pan_band..=pan_band),
                pan_y: self.rng.gen_range(-pan_band..=pan_band),
            },
            None => ZoomPanParams::default_ramp(&self.config),
        };
        stages.push(FilterStage::new(
            FilterKind::ZoomPan,
            video::zoom_pan(&self.config, ramp),
        ));

        if options.rotation_degrees.abs() > self.config.rotation_epsilon_deg {
            stages.push(FilterStage::new(
                FilterKind::Rotate,
                video::rotate(options.rotation_degrees),
            ));
        }

        stages.push(FilterStage::new(FilterKind::MarkerBox, video::marker_box()));

        if options.horizontal_flip {
            stages.push(FilterStage::new(FilterKind::Flip, video::flip()));
        }

        stages.push(FilterStage::new(
            FilterKind::ColorTrim,
            video::color_trim(&self.config),
        ));

        let hue_band = self.config.hue_jitter_max_deg;
        let hue = self.rng.gen_range(-hue_band..=hue_band);
        stages.push(FilterStage::new(FilterKind::HueJitter, video::hue_jitter(hue)));

        let (grain_min, grain_max) = (self.config.grain_min, self.config.grain_max);
        let strength = self.rng.gen_range(grain_min..=grain_max);
        stages.push(FilterStage::new(FilterKind::Grain, video::grain(strength)));

        let lens_band = self.config.lens_jitter_max;
        let coefficient = self.rng.gen_range(-lens_band..=lens_band);
        stages.push(FilterStage::new(
            FilterKind::LensDistortion,
            video::lens_distortion(coefficient),
        ));

        if let Some(spec) = &options.text_overlay {
            if spec.content.trim().is_empty() {
                // Callers should not set an empty overlay; tolerate it as
                // "no text" rather than emitting a broken fragment
                warn!("Ignoring whitespace-only text overlay");
            } else {
                let font = fonts::resolve(spec.bold, spec.italic);
                stages.push(FilterStage::new(
                    FilterKind::DrawText,
                    text::drawtext(spec, font.as_deref()),
                ));
            }
        }

        if self.speed_active(options) {
            stages.push(FilterStage::new(
                FilterKind::Speed,
                video::speed(options.playback_speed),
            ));
        }

        let ordered = crate::filters::order_stages(stages)?;
        Ok(ordered
            .into_iter()
            .map(|stage| stage.fragment)
            .collect::<Vec<_>>()
            .join(","))
    }

    fn compose_audio(
        &mut self,
        options: &VideoOptions,
    ) -> Result<(AudioSpec, Option<std::path::PathBuf>), DomainError> {
        let mut stages = vec![FilterStage::new(
            FilterKind::AudioNormalize,
            audio::pitch_delay_normalize(&self.config),
        )];

        if self.speed_active(options) {
            stages.push(FilterStage::new(
                FilterKind::AudioTempo,
                audio::tempo_chain(options.playback_speed, self.config.tempo_epsilon),
            ));
        }

        if options.noise_audio_path.is_some() {
            stages.push(FilterStage::new(FilterKind::NoiseMix, audio::mix_node()));
        }

        let ordered = crate::filters::order_stages(stages)?;
        let primary_chain = ordered
            .iter()
            .filter(|stage| stage.kind != FilterKind::NoiseMix)
            .map(|stage| stage.fragment.as_str())
            .collect::<Vec<_>>()
            .join(",");

        if let Some(noise_path) = &options.noise_audio_path {
            let mix = ordered
                .last()
                .filter(|stage| stage.kind == FilterKind::NoiseMix)
                .map(|stage| stage.fragment.clone())
                .ok_or_else(|| {
                    DomainError::InternalError("Mix node missing from audio graph".to_string())
                })?;
            let graph = audio::mix_graph(
                &primary_chain,
                &audio::noise_attenuation(&self.config),
                &mix,
            );
            Ok((
                AudioSpec::Graph {
                    filter_complex: graph,
                },
                Some(noise_path.clone()),
            ))
        } else {
            Ok((AudioSpec::Chain(primary_chain), None))
        }
    }

    fn speed_active(&self, options: &VideoOptions) -> bool {
        (options.playback_speed - 1.0).abs() > self.config.speed_epsilon
    }
}
