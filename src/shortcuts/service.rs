//! Hotkey preference service.
//!
//! Owns the local copy of one user's preferences and orchestrates every
//! change as read-current -> compute-next -> persist -> update local copy.
//!
//! # Concurrency
//!
//! Only one change may be saving at a time. A second call made while a save
//! is in flight fails with `HotkeyError::SaveInProgress` without touching the
//! store. The local copy is replaced only after the store confirms the write,
//! so a failed save leaves it unchanged. Edits from another session are not
//! reconciled: each change re-reads the store, and the last writer wins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::error::{HotkeyError, Result, ResultExt};
use crate::platform::PlatformProvider;

use super::conflicts::detect_conflicts;
use super::dispatch::{dispatch_bindings, DispatchBinding, HotkeyDispatcher};
use super::migration::{load_stored, migrate, parse_stored};
use super::mutations;
use super::persistence::PreferenceStore;
use super::registry::HotkeyRegistry;
use super::reserved::check_reserved;
use super::resolver::resolve;
use super::types::{HotkeyConflict, HotkeyDefinition, HotkeyPreferences, ResolvedHotkey, Scope};

/// Callback invoked with the recomputed hotkey list after every confirmed change.
pub type HotkeyListener = Box<dyn Fn(&[ResolvedHotkey]) + Send + Sync>;

/// Outcome of checking a candidate combination before saving it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Validation {
    pub conflicts: Vec<HotkeyConflict>,
    /// Description of the browser/OS shortcut the candidate shadows. Advisory only.
    pub reserved: Option<&'static str>,
}

impl Validation {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// True when there is nothing to warn about.
    pub fn is_clear(&self) -> bool {
        self.conflicts.is_empty() && self.reserved.is_none()
    }
}

/// Releases the saving flag when dropped.
struct SavingGuard<'a>(&'a AtomicBool);

impl<'a> SavingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SavingGuard(flag))
    }
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct HotkeyService<S: PreferenceStore> {
    registry: Arc<HotkeyRegistry>,
    store: S,
    platform: Arc<dyn PlatformProvider>,
    prefs: RwLock<HotkeyPreferences>,
    saving: AtomicBool,
    listeners: Mutex<Vec<HotkeyListener>>,
}

impl<S: PreferenceStore> HotkeyService<S> {
    pub fn new(registry: Arc<HotkeyRegistry>, store: S, platform: Arc<dyn PlatformProvider>) -> Self {
        Self {
            registry,
            store,
            platform,
            prefs: RwLock::new(HotkeyPreferences::default()),
            saving: AtomicBool::new(false),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn registry(&self) -> &HotkeyRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn platform(&self) -> &dyn PlatformProvider {
        self.platform.as_ref()
    }

    /// Read the stored document into the local copy.
    ///
    /// When the store cannot be read the last confirmed document is kept
    /// (the defaults before the first successful load) and listeners are not
    /// called.
    #[instrument(skip(self))]
    pub fn load(&self) -> HotkeyPreferences {
        let Some(stored) = self.store.fetch().warn_on_err() else {
            return self.preferences();
        };
        let prefs = load_stored(stored.as_ref());
        *self.prefs.write() = prefs.clone();
        info!(
            event_type = "hotkeys_loaded",
            customizations = prefs.len(),
            schema_version = prefs.schema_version,
            "Loaded hotkey preferences"
        );
        self.notify(&prefs);
        prefs
    }

    /// The last confirmed document.
    pub fn preferences(&self) -> HotkeyPreferences {
        self.prefs.read().clone()
    }

    /// Effective hotkeys computed from the last confirmed document.
    pub fn resolved(&self) -> Vec<ResolvedHotkey> {
        resolve(self.registry.definitions(), &self.prefs.read())
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    /// Check a candidate combination for conflicts and reserved shortcuts.
    pub fn validate(&self, candidate: &str, scope: Scope, exclude_id: Option<&str>) -> Validation {
        let resolved = self.resolved();
        Validation {
            conflicts: detect_conflicts(&resolved, candidate, scope, exclude_id, self.platform()),
            reserved: check_reserved(candidate, self.platform()),
        }
    }

    /// Register a listener for recomputed hotkey lists.
    ///
    /// Listeners run while the listener list is locked and must not subscribe.
    pub fn subscribe(&self, listener: HotkeyListener) {
        self.listeners.lock().push(listener);
    }

    /// Bindings for the runtime dispatcher, from the last confirmed document.
    pub fn bindings(&self) -> Vec<DispatchBinding> {
        dispatch_bindings(&self.resolved(), self.platform())
    }

    pub fn push_to(&self, dispatcher: &mut dyn HotkeyDispatcher) {
        dispatcher.register_all(&self.bindings());
    }

    /// Override the keys of `id`, or restore the default with `None`.
    ///
    /// Does not validate; call `validate` first.
    pub fn set_custom_keys(&self, id: &str, keys: Option<&str>) -> Result<HotkeyPreferences> {
        let definition = self.definition(id)?;
        self.apply("set_custom_keys", id, |current| {
            Ok(mutations::set_custom_keys(current, definition, keys))
        })
    }

    pub fn toggle_hotkey(&self, id: &str, enabled: bool) -> Result<HotkeyPreferences> {
        let definition = self.definition(id)?;
        self.apply("toggle_hotkey", id, |current| {
            Ok(mutations::toggle_hotkey(current, definition, enabled))
        })
    }

    pub fn reset_hotkey(&self, id: &str) -> Result<HotkeyPreferences> {
        self.apply("reset_hotkey", id, |current| Ok(mutations::reset_hotkey(current, id)))
    }

    pub fn reset_scope(&self, scope: Scope) -> Result<HotkeyPreferences> {
        let definitions = self.registry.definitions();
        self.apply("reset_scope", scope.as_str(), |current| {
            Ok(mutations::reset_scope(current, definitions, scope))
        })
    }

    pub fn reset_all(&self) -> Result<HotkeyPreferences> {
        self.apply("reset_all", "*", |_| Ok(mutations::reset_all()))
    }

    /// The last confirmed document as JSON.
    pub fn export_preferences(&self) -> Value {
        serde_json::to_value(&*self.prefs.read()).unwrap_or(Value::Null)
    }

    /// Replace the user's preferences with an exported document.
    ///
    /// Corrupt entries, unknown ids and redundant entries are dropped.
    pub fn import_preferences(&self, document: &Value) -> Result<HotkeyPreferences> {
        let imported = parse_stored(document).ok_or_else(|| {
            HotkeyError::InvalidImport("expected a JSON object".to_string())
        })?;
        let imported = mutations::prune(&migrate(Some(imported)), self.registry.definitions());
        self.apply("import_preferences", "*", move |_| Ok(imported))
    }

    fn definition(&self, id: &str) -> Result<&HotkeyDefinition> {
        self.registry
            .get(id)
            .ok_or_else(|| HotkeyError::UnknownHotkey(id.to_string()))
    }

    fn apply<F>(&self, action: &'static str, subject: &str, compute: F) -> Result<HotkeyPreferences>
    where
        F: FnOnce(&HotkeyPreferences) -> Result<HotkeyPreferences>,
    {
        let Some(_guard) = SavingGuard::acquire(&self.saving) else {
            warn!(action, subject, "Rejected hotkey change while another save is in flight");
            return Err(HotkeyError::SaveInProgress);
        };

        let current = load_stored(self.store.fetch()?.as_ref());
        let next = compute(&current)?;

        if let Err(e) = self.store.persist(&next) {
            warn!(action, subject, error = %e, "Failed to persist hotkey preferences");
            return Err(e.into());
        }

        *self.prefs.write() = next.clone();
        info!(
            event_type = "hotkeys_saved",
            action,
            subject,
            customizations = next.len(),
            "Saved hotkey preferences"
        );
        self.notify(&next);
        Ok(next)
    }

    fn notify(&self, prefs: &HotkeyPreferences) {
        let listeners = self.listeners.lock();
        if listeners.is_empty() {
            return;
        }
        let resolved = resolve(self.registry.definitions(), prefs);
        for listener in listeners.iter() {
            listener(resolved.as_slice());
        }
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
