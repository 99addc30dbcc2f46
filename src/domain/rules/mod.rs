// Domain rules - Input validation policies

use std::path::Path;

use crate::domain::errors::DomainError;
use crate::domain::model::VideoOptions;

/// Policies applied to a batch before any engine invocation
pub struct BatchRules;

impl BatchRules {
    /// Reject batches larger than the configured ceiling.
    ///
    /// This is a pure input-validation guard, not a resource constraint, and
    /// must run before the first invocation so an oversized batch produces no
    /// side effects at all.
    pub fn check_batch_size(count: usize, ceiling: usize) -> Result<(), DomainError> {
        if count > ceiling {
            return Err(DomainError::ValidationFailed(format!(
                "Batch of {} videos exceeds the ceiling of {}",
                count, ceiling
            )));
        }
        Ok(())
    }
}

/// Policies applied to individual input files
pub struct InputRules;

impl InputRules {
    /// Whether a path looks like a supported input container
    pub fn is_supported_input(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("mp4"))
            .unwrap_or(false)
    }

    /// Validate a single explicitly-requested input file
    pub fn check_input_file(path: &Path) -> Result<(), DomainError> {
        if !Self::is_supported_input(path) {
            return Err(DomainError::InvalidFormat(format!(
                "'{}' is not an .mp4 file",
                path.display()
            )));
        }
        if !path.is_file() {
            return Err(DomainError::FileNotFound(format!(
                "'{}' does not exist",
                path.display()
            )));
        }
        Ok(())
    }
}

/// Policies applied to CLI-supplied option values before options are built
pub struct OptionRules;

impl OptionRules {
    /// Reject speeds that are non-positive or outside the supported band
    pub fn check_speed(speed: f64) -> Result<(), DomainError> {
        if speed <= 0.0 {
            return Err(DomainError::BadArgs(
                "Playback speed must be positive".to_string(),
            ));
        }
        if !(VideoOptions::MIN_SPEED..=VideoOptions::MAX_SPEED).contains(&speed) {
            return Err(DomainError::BadArgs(format!(
                "Playback speed {} is out of range ({}-{})",
                speed,
                VideoOptions::MIN_SPEED,
                VideoOptions::MAX_SPEED
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
