//! Transform invoker
//!
//! Builds the complete engine invocation from a pipeline spec and runs it to
//! completion. Every invocation strips source metadata, caps the output
//! duration, re-encodes audio to the fixed codec/bitrate, and destructively
//! overwrites the output path. Quality is either a pinned bitrate or a CRF
//! drawn per call from a narrow band to decorrelate outputs across a batch.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error};

use crate::config::ProcessingConfig;
use crate::domain::model::{AudioSpec, PipelineSpec};
use crate::engine::{discovery, run_captured, TransformExecutor};
use crate::error::{RevidError, RevidResult};
use crate::filters::audio::AUDIO_OUT_LABEL;

/// Adapter that drives the external engine binary
pub struct FfmpegInvoker<R: Rng = SmallRng> {
    config: ProcessingConfig,
    engine: String,
    rng: R,
}

impl FfmpegInvoker<SmallRng> {
    /// Create an invoker using the discovered engine and an entropy-seeded
    /// quality jitter source
    pub fn new(config: ProcessingConfig) -> Self {
        Self {
            engine: discovery::engine_path(),
            config,
            rng: SmallRng::from_entropy(),
        }
    }
}

impl<R: Rng> FfmpegInvoker<R> {
    /// Create an invoker with an injected jitter source, for deterministic
    /// tests
    pub fn with_rng(config: ProcessingConfig, rng: R) -> Self {
        Self {
            engine: discovery::engine_path(),
            config,
            rng,
        }
    }

    /// Override the engine binary location
    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Assemble the full argument list for one transform invocation
    fn build_args(&mut self, spec: &PipelineSpec, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-i".into(), input.into()];

        if let Some(noise) = &spec.noise_input {
            // Loop the noise bed indefinitely; the mix node's duration=first
            // keeps the output bounded by the primary track
            args.push("-stream_loop".into());
            args.push("-1".into());
            args.push("-i".into());
            args.push(noise.into());
        }

        args.push("-map_metadata".into());
        args.push("-1".into());
        args.push("-vf".into());
        args.push(spec.video_chain.clone().into());
        args.push("-t".into());
        args.push(self.config.output_duration_secs.to_string().into());
        args.push("-c:v".into());
        args.push(self.config.video_codec.clone().into());

        match &self.config.video_bitrate {
            Some(bitrate) => {
                args.push("-b:v".into());
                args.push(bitrate.clone().into());
            }
            None => {
                let crf = self
                    .rng
                    .gen_range(self.config.crf_min..=self.config.crf_max);
                args.push("-crf".into());
                args.push(crf.to_string().into());
            }
        }

        match &spec.audio {
            AudioSpec::Chain(chain) => {
                args.push("-filter:a".into());
                args.push(chain.clone().into());
            }
            AudioSpec::Graph { filter_complex } => {
                args.push("-filter_complex".into());
                args.push(filter_complex.clone().into());
                args.push("-map".into());
                args.push("0:v".into());
                args.push("-map".into());
                args.push(format!("[{}]", AUDIO_OUT_LABEL).into());
            }
        }

        args.push("-c:a".into());
        args.push(self.config.audio_codec.clone().into());
        args.push("-b:a".into());
        args.push(self.config.audio_bitrate.clone().into());
        args.push("-y".into());
        args.push(output.into());
        args
    }
}

impl<R: Rng> TransformExecutor for FfmpegInvoker<R> {
    fn transform(&mut self, spec: &PipelineSpec, input: &Path, output: &Path) -> RevidResult<()> {
        let filename = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.display().to_string());

        let args = self.build_args(spec, input, output);
        debug!(
            "Engine invocation: {} {}",
            self.engine,
            args.iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut command = Command::new(&self.engine);
        command.args(&args);
        let timeout = self.config.transform_timeout_secs.map(Duration::from_secs);

        match run_captured(command, timeout) {
            Ok(output) if output.timed_out => Err(RevidError::TransformTimeout {
                filename,
                seconds: self.config.transform_timeout_secs.unwrap_or(0),
            }),
            Ok(output) if output.success => Ok(()),
            Ok(output) => {
                error!("Engine diagnostics for '{}':\n{}", filename, output.stderr);
                Err(RevidError::TransformFailed {
                    filename,
                    detail: output.stderr,
                })
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(RevidError::EngineMissing {
                    path: self.engine.clone(),
                })
            }
            Err(err) => Err(RevidError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn spec_with_chain() -> PipelineSpec {
        PipelineSpec {
            video_chain: "scale=1080:1920".to_string(),
            audio: AudioSpec::Chain("anull".to_string()),
            noise_input: None,
        }
    }

    fn args_as_strings(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn chain_invocation_shape() {
        let mut invoker =
            FfmpegInvoker::with_rng(ProcessingConfig::default(), SmallRng::seed_from_u64(7));
        let args = args_as_strings(&invoker.build_args(
            &spec_with_chain(),
            Path::new("in.mp4"),
            Path::new("out/tt_in.mp4"),
        ));
        let joined = args.join(" ");
        assert!(joined.starts_with("-i in.mp4 -map_metadata -1 -vf scale=1080:1920 -t 29"));
        assert!(joined.contains("-c:v libx264 -crf "));
        assert!(joined.contains("-filter:a anull"));
        assert!(joined.ends_with("-c:a aac -b:a 192k -y out/tt_in.mp4"));
        assert!(!joined.contains("-stream_loop"));
    }

    #[test]
    fn noise_graph_adds_looped_input_and_maps() {
        let spec = PipelineSpec {
            video_chain: "scale=1080:1920".to_string(),
            audio: AudioSpec::Graph {
                filter_complex: "[0:a]anull[amain];[1:a]volume=0.02[anoise];[amain][anoise]amix=inputs=2:duration=first[aout]".to_string(),
            },
            noise_input: Some(PathBuf::from("sounds/bed.mp3")),
        };
        let mut invoker =
            FfmpegInvoker::with_rng(ProcessingConfig::default(), SmallRng::seed_from_u64(7));
        let joined = args_as_strings(&invoker.build_args(
            &spec,
            Path::new("in.mp4"),
            Path::new("out.mp4"),
        ))
        .join(" ");
        assert!(joined.contains("-stream_loop -1 -i sounds/bed.mp3"));
        assert!(joined.contains("-filter_complex"));
        assert!(joined.contains("-map 0:v -map [aout]"));
        assert!(!joined.contains("-filter:a"));
    }

    #[test]
    fn pinned_bitrate_suppresses_crf_jitter() {
        let mut config = ProcessingConfig::default();
        config.video_bitrate = Some("6000k".to_string());
        let mut invoker = FfmpegInvoker::with_rng(config, SmallRng::seed_from_u64(7));
        let joined = args_as_strings(&invoker.build_args(
            &spec_with_chain(),
            Path::new("in.mp4"),
            Path::new("out.mp4"),
        ))
        .join(" ");
        assert!(joined.contains("-b:v 6000k"));
        assert!(!joined.contains("-crf"));
    }

    #[test]
    fn crf_jitter_stays_in_band() {
        let config = ProcessingConfig::default();
        let (lo, hi) = (config.crf_min, config.crf_max);
        let mut invoker = FfmpegInvoker::with_rng(config, SmallRng::seed_from_u64(42));
        for _ in 0..32 {
            let args = args_as_strings(&invoker.build_args(
                &spec_with_chain(),
                Path::new("in.mp4"),
                Path::new("out.mp4"),
            ));
            let crf_index = args.iter().position(|a| a == "-crf").unwrap();
            let crf: u8 = args[crf_index + 1].parse().unwrap();
            assert!((lo..=hi).contains(&crf));
        }
    }

    #[test]
    fn missing_engine_is_the_fatal_condition() {
        let mut invoker =
            FfmpegInvoker::with_rng(ProcessingConfig::default(), SmallRng::seed_from_u64(7))
                .with_engine("definitely-not-a-real-binary-name");
        let result = invoker.transform(
            &spec_with_chain(),
            Path::new("in.mp4"),
            Path::new("out.mp4"),
        );
        assert!(matches!(result, Err(RevidError::EngineMissing { .. })));
    }

    #[test]
    fn nonzero_exit_is_a_recoverable_failure() {
        let mut invoker =
            FfmpegInvoker::with_rng(ProcessingConfig::default(), SmallRng::seed_from_u64(7))
                .with_engine("false");
        let result = invoker.transform(
            &spec_with_chain(),
            Path::new("in.mp4"),
            Path::new("out.mp4"),
        );
        assert!(matches!(result, Err(RevidError::TransformFailed { .. })));
    }
}
