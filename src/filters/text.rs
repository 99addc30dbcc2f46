//! Drawtext fragment builder and text sanitization

use std::path::Path;

use crate::domain::model::{TextPosition, TextSpec};

/// Vertical margin from the top/bottom edge for the edge anchors, in pixels
const EDGE_MARGIN_PX: u32 = 20;
/// Padding around the optional background box, in pixels
const BOX_PADDING_PX: u32 = 10;

/// Neutralize characters that would break out of the filter description:
/// backslashes, single quotes, colons, and percent signs
pub fn sanitize(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "'\\''")
        .replace(':', "\\:")
        .replace('%', "\\%")
}

/// Escape a font path for embedding in a filter description. Windows drive
/// colons and backslashes would otherwise terminate the option early.
pub fn escape_font_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").replace(':', "\\:")
}

/// Build the drawtext fragment for a caption.
///
/// `font_file` is the resolved font, if any; without one the engine is left
/// to pick its own default.
pub fn drawtext(spec: &TextSpec, font_file: Option<&Path>) -> String {
    let mut fragment = format!(
        "drawtext=text='{}':fontcolor={}:fontsize={}",
        sanitize(&spec.content),
        spec.color,
        spec.font_size_pt,
    );

    if let Some(font) = font_file {
        fragment.push_str(&format!(":fontfile='{}'", escape_font_path(font)));
    }

    match spec.position {
        TextPosition::TopCenter => {
            fragment.push_str(&format!(":x=(w-text_w)/2:y={}", EDGE_MARGIN_PX));
        }
        TextPosition::MiddleCenter => {
            fragment.push_str(":x=(w-text_w)/2:y=(h-text_h)/2");
        }
        TextPosition::BottomCenter => {
            fragment.push_str(&format!(":x=(w-text_w)/2:y=h-th-{}", EDGE_MARGIN_PX));
        }
    }

    if spec.has_background() {
        fragment.push_str(&format!(
            ":box=1:boxcolor={}:boxborderw={}",
            spec.background_color, BOX_PADDING_PX
        ));
    }

    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{TextPosition, TextSpec};

    fn spec(content: &str, position: TextPosition, bg: &str) -> TextSpec {
        TextSpec::new(content, position, 24, "white", bg, false, false).unwrap()
    }

    #[test]
    fn sanitize_neutralizes_filter_delimiters() {
        assert_eq!(sanitize("50% off: don't"), "50\\% off\\: don'\\''t");
    }

    #[test]
    fn sanitize_escapes_backslash_first() {
        assert_eq!(sanitize("a\\:b"), "a\\\\\\:b");
    }

    #[test]
    fn hostile_content_yields_well_formed_fragment() {
        let fragment = drawtext(&spec("it's 100%: sale", TextPosition::BottomCenter, "none"), None);
        // Every delimiter inside the quoted value must arrive escaped
        assert!(fragment.contains("text='it'\\''s 100\\%\\: sale'"));
        assert!(!fragment.contains("100%"));
        assert!(!fragment.contains("%:"));
    }

    #[test]
    fn positions_anchor_with_fixed_margin() {
        let top = drawtext(&spec("hi", TextPosition::TopCenter, "none"), None);
        assert!(top.contains(":x=(w-text_w)/2:y=20"));

        let middle = drawtext(&spec("hi", TextPosition::MiddleCenter, "none"), None);
        assert!(middle.contains(":x=(w-text_w)/2:y=(h-text_h)/2"));

        let bottom = drawtext(&spec("hi", TextPosition::BottomCenter, "none"), None);
        assert!(bottom.contains(":x=(w-text_w)/2:y=h-th-20"));
    }

    #[test]
    fn background_box_only_when_requested() {
        let boxed = drawtext(&spec("hi", TextPosition::BottomCenter, "black@0.5"), None);
        assert!(boxed.contains(":box=1:boxcolor=black@0.5:boxborderw=10"));

        let plain = drawtext(&spec("hi", TextPosition::BottomCenter, "none"), None);
        assert!(!plain.contains("box=1"));
    }

    #[test]
    fn font_path_is_escaped_for_windows_drives() {
        let fragment = drawtext(
            &spec("hi", TextPosition::BottomCenter, "none"),
            Some(Path::new("C:\\Windows\\Fonts\\arial.ttf")),
        );
        assert!(fragment.contains(":fontfile='C\\:/Windows/Fonts/arial.ttf'"));
    }
}
