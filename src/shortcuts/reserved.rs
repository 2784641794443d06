//! Browser and OS reserved shortcuts.
//!
//! Matching is advisory: the settings screen warns before saving one of these
//! but the user may still override it.

use std::sync::OnceLock;

use crate::platform::PlatformProvider;

use super::normalize::normalize_for;

/// Reserved combinations, in lookup order. `mod` is resolved per platform.
const RESERVED_SHORTCUTS: &[(&str, &str)] = &[
    ("mod+w", "Close tab"),
    ("mod+t", "New tab"),
    ("mod+shift+t", "Reopen closed tab"),
    ("mod+n", "New window"),
    ("mod+shift+n", "New private window"),
    ("mod+q", "Quit browser"),
    ("ctrl+tab", "Next tab"),
    ("ctrl+shift+tab", "Previous tab"),
    ("mod+l", "Focus address bar"),
    ("mod+r", "Reload page"),
    ("mod+shift+r", "Hard reload"),
    ("f5", "Reload page"),
    ("mod+p", "Print page"),
    ("mod+s", "Save page"),
    ("mod+f", "Find in page"),
    ("mod+d", "Bookmark page"),
    ("mod+h", "History"),
    ("mod+j", "Downloads"),
    ("mod+u", "View page source"),
    ("mod+shift+delete", "Clear browsing data"),
    ("mod+shift+i", "Developer tools"),
    ("mod+shift+j", "JavaScript console"),
    ("f12", "Developer tools"),
    ("f11", "Toggle full screen"),
    ("mod+=", "Zoom in"),
    ("mod++", "Zoom in"),
    ("mod+-", "Zoom out"),
    ("mod+0", "Reset zoom"),
    ("mod+c", "Copy"),
    ("mod+v", "Paste"),
    ("mod+x", "Cut"),
    ("mod+z", "Undo"),
    ("mod+a", "Select all"),
    ("alt+f4", "Close window"),
    ("alt+left", "Back"),
    ("alt+right", "Forward"),
    ("meta+tab", "Switch applications"),
    ("meta+space", "Spotlight search"),
    ("meta+m", "Minimize window"),
];

static APPLE_TABLE: OnceLock<Vec<(String, &'static str)>> = OnceLock::new();
static OTHER_TABLE: OnceLock<Vec<(String, &'static str)>> = OnceLock::new();

fn table_for(platform: &dyn PlatformProvider) -> &'static [(String, &'static str)] {
    let cell = if platform.is_apple_platform() {
        &APPLE_TABLE
    } else {
        &OTHER_TABLE
    };
    cell.get_or_init(|| {
        RESERVED_SHORTCUTS
            .iter()
            .map(|(keys, description)| (normalize_for(keys, platform), *description))
            .collect()
    })
}

/// Return the description of the reserved shortcut `candidate` collides with, if any.
pub fn check_reserved(candidate: &str, platform: &dyn PlatformProvider) -> Option<&'static str> {
    let normalized = normalize_for(candidate, platform);
    if normalized.is_empty() {
        return None;
    }
    table_for(platform)
        .iter()
        .find(|(keys, _)| *keys == normalized)
        .map(|(_, description)| *description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;

    #[test]
    fn matches_regardless_of_order_and_case() {
        assert_eq!(check_reserved("Ctrl+W", &Platform::Other), Some("Close tab"));
        assert_eq!(
            check_reserved("shift+ctrl+t", &Platform::Other),
            Some("Reopen closed tab")
        );
    }

    #[test]
    fn mod_resolves_per_platform() {
        assert_eq!(check_reserved("mod+w", &Platform::Apple), Some("Close tab"));
        assert_eq!(check_reserved("cmd+w", &Platform::Apple), Some("Close tab"));
        assert_eq!(check_reserved("meta+w", &Platform::Other), None);
        assert_eq!(check_reserved("ctrl+w", &Platform::Apple), None);
    }

    #[test]
    fn platform_specific_entries() {
        assert_eq!(check_reserved("alt+f4", &Platform::Other), Some("Close window"));
        assert_eq!(
            check_reserved("cmd+space", &Platform::Apple),
            Some("Spotlight search")
        );
    }

    #[test]
    fn first_match_wins() {
        // "f5" and "mod+r" share a description but are separate entries.
        assert_eq!(check_reserved("f5", &Platform::Other), Some("Reload page"));
    }

    #[test]
    fn plus_key_matches_zoom() {
        assert_eq!(check_reserved("ctrl++", &Platform::Other), Some("Zoom in"));
        assert_eq!(check_reserved("cmd+plus", &Platform::Apple), Some("Zoom in"));
        assert_eq!(check_reserved("ctrl", &Platform::Other), None);
    }

    #[test]
    fn unreserved_and_empty() {
        assert_eq!(check_reserved("n", &Platform::Other), None);
        assert_eq!(check_reserved("g>u", &Platform::Other), None);
        assert_eq!(check_reserved("", &Platform::Other), None);
    }
}
