//! Merge definitions with user customizations.

use super::types::{HotkeyDefinition, HotkeyPreferences, ResolvedHotkey};

/// Produce the effective hotkey list, in definition order.
///
/// Customizations whose id has no definition are ignored.
pub fn resolve(definitions: &[HotkeyDefinition], prefs: &HotkeyPreferences) -> Vec<ResolvedHotkey> {
    definitions
        .iter()
        .map(|definition| {
            let customization = prefs.get(&definition.id);
            let custom_keys = customization.and_then(|c| c.keys.clone());
            let is_enabled = customization
                .and_then(|c| c.enabled)
                .unwrap_or_else(|| definition.default_enabled());
            let is_customized = custom_keys
                .as_deref()
                .is_some_and(|keys| keys != definition.keys);

            ResolvedHotkey {
                definition: definition.clone(),
                custom_keys,
                is_customized,
                is_enabled,
            }
        })
        .collect()
}
