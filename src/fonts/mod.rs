//! Font discovery
//!
//! Resolves a font file for a requested style through a fallback chain:
//! styled project font, regular project font, OS default, then none (the
//! engine picks its own). Results are memoized per style in a process-scoped
//! cache; `invalidate_cache` drops it when the working directory changes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tracing::warn;

/// Regular project font looked for in the working directory
pub const FONT_REGULAR: &str = "font.ttf";
/// Bold project font
pub const FONT_BOLD: &str = "font-bold.ttf";
/// Italic project font
pub const FONT_ITALIC: &str = "font-italic.ttf";
/// Bold-italic project font
pub const FONT_BOLD_ITALIC: &str = "font-bolditalic.ttf";

#[cfg(target_os = "macos")]
const SYSTEM_FONT: &str = "/System/Library/Fonts/Helvetica.ttc";
#[cfg(target_os = "windows")]
const SYSTEM_FONT: &str = "C:/Windows/Fonts/arial.ttf";
#[cfg(all(unix, not(target_os = "macos")))]
const SYSTEM_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

type StyleKey = (bool, bool);

fn cache() -> &'static Mutex<HashMap<StyleKey, Option<PathBuf>>> {
    static CACHE: OnceLock<Mutex<HashMap<StyleKey, Option<PathBuf>>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Resolve a font file for the requested style, memoized per style
pub fn resolve(bold: bool, italic: bool) -> Option<PathBuf> {
    let key = (bold, italic);
    if let Ok(guard) = cache().lock() {
        if let Some(cached) = guard.get(&key) {
            return cached.clone();
        }
    }
    let resolved = probe(bold, italic);
    if let Ok(mut guard) = cache().lock() {
        guard.insert(key, resolved.clone());
    }
    resolved
}

/// Drop every memoized resolution, forcing fresh probes on the next lookup
pub fn invalidate_cache() {
    if let Ok(mut guard) = cache().lock() {
        guard.clear();
    }
}

fn styled_candidate(bold: bool, italic: bool) -> Option<&'static str> {
    match (bold, italic) {
        (true, true) => Some(FONT_BOLD_ITALIC),
        (true, false) => Some(FONT_BOLD),
        (false, true) => Some(FONT_ITALIC),
        (false, false) => None,
    }
}

fn probe(bold: bool, italic: bool) -> Option<PathBuf> {
    let styled = styled_candidate(bold, italic);

    if let Some(candidate) = styled {
        let path = Path::new(candidate);
        if path.is_file() {
            return Some(path.to_path_buf());
        }
    }

    let regular = Path::new(FONT_REGULAR);
    if regular.is_file() {
        if let Some(candidate) = styled {
            warn!(
                "Styled font '{}' not found, falling back to '{}'",
                candidate, FONT_REGULAR
            );
        }
        return Some(regular.to_path_buf());
    }

    let system = Path::new(SYSTEM_FONT);
    if system.is_file() {
        warn!(
            "No project font found, falling back to system font '{}'",
            SYSTEM_FONT
        );
        return Some(system.to_path_buf());
    }

    warn!(
        "No usable font found (tried {:?}, '{}', '{}'); the engine will pick its own default",
        styled, FONT_REGULAR, SYSTEM_FONT
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styled_candidates_cover_every_combination() {
        assert_eq!(styled_candidate(true, true), Some(FONT_BOLD_ITALIC));
        assert_eq!(styled_candidate(true, false), Some(FONT_BOLD));
        assert_eq!(styled_candidate(false, true), Some(FONT_ITALIC));
        assert_eq!(styled_candidate(false, false), None);
    }

    #[test]
    fn cache_invalidation_clears_entries() {
        // Seed the cache, then make sure invalidation empties it
        let _ = resolve(false, false);
        invalidate_cache();
        let guard = cache().lock().unwrap();
        assert!(guard.is_empty());
    }
}
