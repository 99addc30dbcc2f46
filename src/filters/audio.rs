//! Audio stage fragment builders
//!
//! The primary track always gets the resample/pitch-shift/delay treatment; a
//! tempo chain is appended when the video speed changed, and a secondary
//! noise input turns the chain into a two-branch graph joined by a mix node.

use crate::config::ProcessingConfig;

/// Label the mix graph exposes for output mapping
pub const AUDIO_OUT_LABEL: &str = "aout";

/// Pass-through filter substituted when every tempo factor is dropped;
/// an empty chain is not valid filter syntax
pub const PASSTHROUGH: &str = "anull";

/// Resample, small pitch/rate shift, and fixed delay on both channels
pub fn pitch_delay_normalize(config: &ProcessingConfig) -> String {
    format!(
        "aresample={sr},asetrate={sr}*{shift},aresample={sr},adelay={delay}|{delay}",
        sr = config.audio_sample_rate,
        shift = config.audio_rate_shift,
        delay = config.audio_delay_ms,
    )
}

/// Decompose a tempo multiplier into factors the engine accepts.
///
/// Each elementary tempo stage only supports multipliers in [0.5, 2.0], so an
/// out-of-range rate is split into saturating factors whose product equals
/// the target. The returned factors always multiply back to `rate`.
pub fn tempo_factors(rate: f64) -> Vec<f64> {
    let mut remaining = rate;
    let mut factors = Vec::new();
    while remaining < 0.5 {
        factors.push(0.5);
        remaining /= 0.5;
    }
    while remaining > 2.0 {
        factors.push(2.0);
        remaining /= 2.0;
    }
    factors.push(remaining);
    factors
}

/// Render the tempo chain for `rate`, dropping factors indistinguishable from
/// 1.0 and substituting a pass-through when nothing remains
pub fn tempo_chain(rate: f64, epsilon: f64) -> String {
    let stages: Vec<String> = tempo_factors(rate)
        .into_iter()
        .filter(|factor| (factor - 1.0).abs() > epsilon)
        .map(|factor| format!("atempo={}", trim_factor(factor)))
        .collect();
    if stages.is_empty() {
        PASSTHROUGH.to_string()
    } else {
        stages.join(",")
    }
}

// atempo rejects trailing-garbage formatting, keep factors short but exact
// enough to round-trip a two-decimal speed
fn trim_factor(factor: f64) -> String {
    let formatted = format!("{:.4}", factor);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Attenuation applied to the noise branch before mixing
pub fn noise_attenuation(config: &ProcessingConfig) -> String {
    format!("volume={}", config.noise_volume)
}

/// Mix node joining the two branches. `duration=first` keeps the output as
/// long as the primary (trimmed) track, not the looped noise input.
pub fn mix_node() -> String {
    "amix=inputs=2:duration=first".to_string()
}

/// Assemble the two-branch graph: processed primary track and attenuated
/// noise branch, merged by the mix node
pub fn mix_graph(primary_chain: &str, noise_chain: &str, mix: &str) -> String {
    format!(
        "[0:a]{primary_chain}[amain];[1:a]{noise_chain}[anoise];[amain][anoise]{mix}[{label}]",
        label = AUDIO_OUT_LABEL,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessingConfig;

    const EPSILON: f64 = 1e-3;

    #[test]
    fn normalize_matches_historical_disguise() {
        let config = ProcessingConfig::default();
        assert_eq!(
            pitch_delay_normalize(&config),
            "aresample=48000,asetrate=48000*1.03,aresample=48000,adelay=200|200"
        );
    }

    #[test]
    fn tempo_factors_stay_in_engine_range_and_multiply_back() {
        for rate in [0.5, 0.75, 0.9, 1.0, 1.03, 1.25, 1.5, 0.3, 2.7, 4.2] {
            let factors = tempo_factors(rate);
            assert!(!factors.is_empty());
            let product: f64 = factors.iter().product();
            assert!(
                (product - rate).abs() < 1e-9,
                "factors for {} multiply to {}",
                rate,
                product
            );
            for factor in &factors[..factors.len() - 1] {
                assert!((0.5..=2.0).contains(factor));
            }
            // The final residual factor is in range by construction
            let last = *factors.last().unwrap();
            assert!((0.5..=2.0).contains(&last), "residual {} for rate {}", last, rate);
        }
    }

    #[test]
    fn unit_rate_collapses_to_passthrough_never_empty() {
        assert_eq!(tempo_chain(1.0, EPSILON), PASSTHROUGH);
        assert_eq!(tempo_chain(1.0005, EPSILON), PASSTHROUGH);
    }

    #[test]
    fn in_range_rate_is_a_single_stage() {
        assert_eq!(tempo_chain(1.25, EPSILON), "atempo=1.25");
        assert_eq!(tempo_chain(0.5, EPSILON), "atempo=0.5");
    }

    #[test]
    fn out_of_range_rate_chains_factors() {
        assert_eq!(tempo_chain(0.3, EPSILON), "atempo=0.5,atempo=0.6");
        assert_eq!(tempo_chain(4.0, EPSILON), "atempo=2,atempo=2");
    }

    #[test]
    fn near_unit_residual_factors_are_dropped_from_chains() {
        // 2.001 decomposes to 2.0 and a ~1.0 residual; the residual must go
        assert_eq!(tempo_chain(2.001, EPSILON), "atempo=2");
    }

    #[test]
    fn mix_graph_shape() {
        let config = ProcessingConfig::default();
        let graph = mix_graph(
            &pitch_delay_normalize(&config),
            &noise_attenuation(&config),
            &mix_node(),
        );
        assert!(graph.starts_with("[0:a]aresample=48000,"));
        assert!(graph.contains("[amain];[1:a]volume=0.02[anoise];"));
        assert!(graph.ends_with("[amain][anoise]amix=inputs=2:duration=first[aout]"));
    }
}
