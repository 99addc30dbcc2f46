//! Transform engine discovery
//!
//! Probes an ordered list of candidate install locations with a version
//! check and memoizes the winner for the life of the process. The bare
//! command name is the last resort; it may still fail at invocation time,
//! which the invoker reports as the fatal engine-missing condition.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::{Mutex, OnceLock};

use tracing::{debug, warn};

/// Bare command name used when no candidate answers the probe
pub const DEFAULT_ENGINE: &str = "ffmpeg";

fn cache() -> &'static Mutex<Option<String>> {
    static CACHE: OnceLock<Mutex<Option<String>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(None))
}

/// Locate the transform engine, memoized per process
pub fn engine_path() -> String {
    if let Ok(guard) = cache().lock() {
        if let Some(cached) = guard.as_ref() {
            return cached.clone();
        }
    }
    let resolved = probe_candidates();
    if let Ok(mut guard) = cache().lock() {
        *guard = Some(resolved.clone());
    }
    resolved
}

/// Drop the memoized engine location, forcing a fresh probe on next use
pub fn invalidate_cache() {
    if let Ok(mut guard) = cache().lock() {
        *guard = None;
    }
}

fn probe_candidates() -> String {
    for candidate in candidate_paths() {
        if probe_version(&candidate) {
            debug!("Transform engine found at '{}'", candidate);
            return candidate;
        }
    }
    warn!(
        "Transform engine not found in common locations, falling back to '{}' on PATH",
        DEFAULT_ENGINE
    );
    DEFAULT_ENGINE.to_string()
}

/// Ordered candidates: PATH-relative name first, then OS-conventional
/// install directories
fn candidate_paths() -> Vec<String> {
    let mut candidates = vec![DEFAULT_ENGINE.to_string()];
    if cfg!(windows) {
        candidates.push("C:\\ffmpeg\\bin\\ffmpeg.exe".to_string());
        if let Some(home) = std::env::var_os("USERPROFILE") {
            candidates.push(
                PathBuf::from(home)
                    .join("ffmpeg")
                    .join("bin")
                    .join("ffmpeg.exe")
                    .to_string_lossy()
                    .into_owned(),
            );
        }
    } else {
        candidates.push("/usr/local/bin/ffmpeg".to_string());
        candidates.push("/opt/homebrew/bin/ffmpeg".to_string());
        if let Some(home) = std::env::var_os("HOME") {
            candidates.push(
                PathBuf::from(home)
                    .join("bin")
                    .join("ffmpeg")
                    .to_string_lossy()
                    .into_owned(),
            );
        }
    }
    candidates
}

fn probe_version(path: &str) -> bool {
    Command::new(path)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_lead_with_the_path_relative_name() {
        let candidates = candidate_paths();
        assert_eq!(candidates[0], DEFAULT_ENGINE);
        assert!(candidates.len() >= 2);
    }

    #[test]
    fn probe_rejects_missing_binaries() {
        assert!(!probe_version("definitely-not-a-real-binary-name"));
    }

    #[test]
    fn invalidation_forces_a_fresh_probe() {
        let first = engine_path();
        invalidate_cache();
        let second = engine_path();
        // Environment is stable within one test run
        assert_eq!(first, second);
    }
}
