//! Conflict detection between hotkeys.
//!
//! Two hotkeys conflict when both are enabled, their effective keys normalize
//! to the same combination, and their scopes can be live together:
//! - A page-scoped candidate is compared with its own scope and the
//!   always-active scopes (`global`, `*`)
//! - An always-active candidate is compared with always-active scopes only
//! - Two different page scopes never conflict

use crate::platform::PlatformProvider;

use super::normalize::normalize_for;
use super::types::{HotkeyConflict, ResolvedHotkey, Scope};

/// Whether a hotkey in `other` is in the comparison set of a candidate in `candidate`.
pub fn in_comparison_set(candidate: Scope, other: Scope) -> bool {
    if candidate.is_always_active() {
        other.is_always_active()
    } else {
        other == candidate || other.is_always_active()
    }
}

/// Find enabled hotkeys that would collide with `candidate_keys` in `scope`.
///
/// Returns at most one record, listing every colliding id in resolved order.
/// An empty list means the candidate is safe to save.
pub fn detect_conflicts(
    resolved: &[ResolvedHotkey],
    candidate_keys: &str,
    scope: Scope,
    exclude_id: Option<&str>,
    platform: &dyn PlatformProvider,
) -> Vec<HotkeyConflict> {
    let normalized = normalize_for(candidate_keys, platform);
    if normalized.is_empty() {
        return Vec::new();
    }

    let conflicts_with: Vec<String> = resolved
        .iter()
        .filter(|hotkey| exclude_id != Some(hotkey.id()))
        .filter(|hotkey| hotkey.is_enabled)
        .filter(|hotkey| in_comparison_set(scope, hotkey.scope()))
        .filter(|hotkey| normalize_for(hotkey.effective_keys(), platform) == normalized)
        .map(|hotkey| hotkey.id().to_string())
        .collect();

    if conflicts_with.is_empty() {
        return Vec::new();
    }

    tracing::debug!(
        hotkey_id = exclude_id.unwrap_or(""),
        scope = %scope,
        keys = candidate_keys,
        conflicts = conflicts_with.len(),
        "Hotkey conflict detected"
    );

    vec![HotkeyConflict {
        hotkey_id: exclude_id.unwrap_or_default().to_string(),
        conflicts_with,
        scope,
        keys: candidate_keys.to_string(),
    }]
}

/// Audit every enabled hotkey against the rest of the list.
///
/// Produces one record per hotkey that has at least one conflict. A collision
/// between a page scope and an always-active scope is reported from the page
/// side only.
pub fn find_all_conflicts(
    resolved: &[ResolvedHotkey],
    platform: &dyn PlatformProvider,
) -> Vec<HotkeyConflict> {
    resolved
        .iter()
        .filter(|hotkey| hotkey.is_enabled)
        .flat_map(|hotkey| {
            detect_conflicts(
                resolved,
                hotkey.effective_keys(),
                hotkey.scope(),
                Some(hotkey.id()),
                platform,
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "conflicts_tests.rs"]
mod tests;
