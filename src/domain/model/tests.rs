// Unit tests for domain models

use super::*;

#[test]
fn text_position_parses_common_spellings() {
    assert_eq!(
        TextPosition::parse("Top Center").unwrap(),
        TextPosition::TopCenter
    );
    assert_eq!(
        TextPosition::parse("middle").unwrap(),
        TextPosition::MiddleCenter
    );
    assert_eq!(
        TextPosition::parse("bottom-center").unwrap(),
        TextPosition::BottomCenter
    );
    assert!(TextPosition::parse("left").is_err());
}

#[test]
fn text_spec_rejects_empty_content() {
    let result = TextSpec::new(
        "   ",
        TextPosition::BottomCenter,
        24,
        "white",
        "black@0.5",
        false,
        false,
    );
    assert!(result.is_err());
}

#[test]
fn text_spec_rejects_out_of_range_font_size() {
    for size in [9, 201] {
        let result = TextSpec::new(
            "hello",
            TextPosition::BottomCenter,
            size,
            "white",
            "none",
            false,
            false,
        );
        assert!(result.is_err(), "font size {} should be rejected", size);
    }
}

#[test]
fn text_spec_background_detection() {
    let with_box = TextSpec::new(
        "hi",
        TextPosition::TopCenter,
        24,
        "white",
        "black@0.5",
        false,
        false,
    )
    .unwrap();
    assert!(with_box.has_background());

    let no_box = TextSpec::new(
        "hi",
        TextPosition::TopCenter,
        24,
        "white",
        "none",
        false,
        false,
    )
    .unwrap();
    assert!(!no_box.has_background());

    let transparent = TextSpec::new(
        "hi",
        TextPosition::TopCenter,
        24,
        "white",
        "Transparent",
        false,
        false,
    )
    .unwrap();
    assert!(!transparent.has_background());
}

#[test]
fn default_options_are_neutral_and_valid() {
    let options = VideoOptions::default();
    assert!(!options.horizontal_flip);
    assert_eq!(options.rotation_degrees, 0.0);
    assert_eq!(options.playback_speed, 1.0);
    assert!(options.zoom_end_scale.is_none());
    assert!(options.text_overlay.is_none());
    assert!(options.noise_audio_path.is_none());
    assert!(options.validate().is_ok());
}

#[test]
fn options_validation_enforces_ranges() {
    assert!(VideoOptions::new()
        .with_rotation_degrees(46.0)
        .validate()
        .is_err());
    assert!(VideoOptions::new()
        .with_rotation_degrees(-45.0)
        .validate()
        .is_ok());
    assert!(VideoOptions::new()
        .with_playback_speed(0.4)
        .validate()
        .is_err());
    assert!(VideoOptions::new()
        .with_playback_speed(1.6)
        .validate()
        .is_err());
    assert!(VideoOptions::new()
        .with_zoom_end_scale(1.0)
        .validate()
        .is_err());
    assert!(VideoOptions::new()
        .with_zoom_end_scale(2.0)
        .validate()
        .is_ok());
    assert!(VideoOptions::new()
        .with_zoom_end_scale(2.1)
        .validate()
        .is_err());
}

#[test]
fn batch_report_tallies_results() {
    let results = vec![
        ProcessingResult::succeeded("a.mp4", PathBuf::from("out/tt_a.mp4")),
        ProcessingResult::failed("b.mp4", "engine exited with status 1"),
        ProcessingResult::succeeded("c.mp4", PathBuf::from("out/tt_c.mp4")).with_ssim(Some(93.5)),
    ];
    let report = BatchReport::new(Utc::now(), results);
    assert_eq!(report.processed, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.results.len(), 3);
}

#[test]
fn processing_result_serializes() {
    let result = ProcessingResult::succeeded("a.mp4", PathBuf::from("out/tt_a.mp4"))
        .with_ssim(Some(91.25));
    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"success\":true"));
    assert!(json.contains("91.25"));
}
