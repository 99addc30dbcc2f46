// Unit tests for input validation policies

use std::path::Path;

use super::*;

#[test]
fn batch_size_within_ceiling_accepted() {
    assert!(BatchRules::check_batch_size(0, 10).is_ok());
    assert!(BatchRules::check_batch_size(10, 10).is_ok());
}

#[test]
fn batch_size_over_ceiling_rejected() {
    assert!(BatchRules::check_batch_size(11, 10).is_err());
}

#[test]
fn supported_input_extension_is_case_insensitive() {
    assert!(InputRules::is_supported_input(Path::new("clip.mp4")));
    assert!(InputRules::is_supported_input(Path::new("CLIP.MP4")));
    assert!(!InputRules::is_supported_input(Path::new("clip.mov")));
    assert!(!InputRules::is_supported_input(Path::new("clip")));
}

#[test]
fn missing_input_file_rejected() {
    let err = InputRules::check_input_file(Path::new("definitely/not/here.mp4"));
    assert!(err.is_err());
}

#[test]
fn wrong_extension_rejected_before_existence_check() {
    let err = InputRules::check_input_file(Path::new("clip.avi")).unwrap_err();
    assert!(err.to_string().contains("not an .mp4"));
}

#[test]
fn speed_rules() {
    assert!(OptionRules::check_speed(1.0).is_ok());
    assert!(OptionRules::check_speed(0.5).is_ok());
    assert!(OptionRules::check_speed(1.5).is_ok());
    assert!(OptionRules::check_speed(0.0).is_err());
    assert!(OptionRules::check_speed(-1.0).is_err());
    assert!(OptionRules::check_speed(0.49).is_err());
    assert!(OptionRules::check_speed(1.51).is_err());
}
