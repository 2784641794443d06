//! Pure transforms over the preferences document.
//!
//! Each function takes the current document and returns the next one. None of
//! them validate the new keys; callers run conflict and reserved checks first.
//! Entries that no longer differ from the definition are pruned so the stored
//! document stays minimal.

use super::types::{HotkeyCustomization, HotkeyDefinition, HotkeyPreferences, Scope};

/// Override (or clear, with `None`) the keys of one hotkey.
pub fn set_custom_keys(
    prefs: &HotkeyPreferences,
    definition: &HotkeyDefinition,
    keys: Option<&str>,
) -> HotkeyPreferences {
    let mut next = prefs.clone();
    let mut entry = next
        .customizations
        .remove(&definition.id)
        .unwrap_or_default();

    entry.keys = keys
        .filter(|keys| *keys != definition.keys)
        .map(str::to_string);

    upsert_unless_redundant(&mut next, definition, entry);
    next
}

/// Override the enabled state of one hotkey.
pub fn toggle_hotkey(
    prefs: &HotkeyPreferences,
    definition: &HotkeyDefinition,
    enabled: bool,
) -> HotkeyPreferences {
    let mut next = prefs.clone();
    let mut entry = next
        .customizations
        .remove(&definition.id)
        .unwrap_or_default();

    entry.enabled = Some(enabled);

    upsert_unless_redundant(&mut next, definition, entry);
    next
}

/// Drop every customization for `id`.
pub fn reset_hotkey(prefs: &HotkeyPreferences, id: &str) -> HotkeyPreferences {
    let mut next = prefs.clone();
    next.customizations.remove(id);
    next
}

/// Drop the customizations of every hotkey defined in `scope`.
pub fn reset_scope(
    prefs: &HotkeyPreferences,
    definitions: &[HotkeyDefinition],
    scope: Scope,
) -> HotkeyPreferences {
    let mut next = prefs.clone();
    for definition in definitions.iter().filter(|d| d.scope == scope) {
        next.customizations.remove(&definition.id);
    }
    next
}

/// A fresh document at the current schema with no customizations.
pub fn reset_all() -> HotkeyPreferences {
    HotkeyPreferences::default()
}

/// Keep only customizations that refer to a known hotkey and change something.
pub fn prune(prefs: &HotkeyPreferences, definitions: &[HotkeyDefinition]) -> HotkeyPreferences {
    let mut next = prefs.clone();
    next.customizations.retain(|id, customization| {
        definitions
            .iter()
            .find(|d| d.id == *id)
            .is_some_and(|definition| !customization.is_redundant_for(definition))
    });
    next
}

fn upsert_unless_redundant(
    prefs: &mut HotkeyPreferences,
    definition: &HotkeyDefinition,
    entry: HotkeyCustomization,
) {
    if !entry.is_redundant_for(definition) {
        prefs.customizations.insert(definition.id.clone(), entry);
    }
}

#[cfg(test)]
#[path = "mutations_tests.rs"]
mod tests;
