//! Tests for the hotkey preference service.

use super::*;
use crate::platform::Platform;
use crate::shortcuts::persistence::{MemoryStore, PersistenceError};
use crate::shortcuts::types::CURRENT_SCHEMA_VERSION;
use serde_json::json;
use std::sync::atomic::AtomicUsize;
use std::sync::mpsc;
use std::thread;

fn service_with(store: MemoryStore) -> HotkeyService<MemoryStore> {
    HotkeyService::new(
        Arc::new(HotkeyRegistry::builtin().clone()),
        store,
        Arc::new(Platform::Other),
    )
}

fn service() -> HotkeyService<MemoryStore> {
    service_with(MemoryStore::new())
}

fn find<'a>(resolved: &'a [ResolvedHotkey], id: &str) -> &'a ResolvedHotkey {
    resolved.iter().find(|h| h.id() == id).unwrap()
}

#[test]
fn load_without_document_yields_default() {
    let svc = service();
    let prefs = svc.load();
    assert_eq!(prefs, HotkeyPreferences::default());
    assert_eq!(svc.resolved().len(), svc.registry().len());
}

#[test]
fn load_migrates_and_skips_corrupt_entries() {
    let svc = service_with(MemoryStore::with_document(json!({
        "schemaVersion": 0,
        "customizations": {
            "users.invite-user": { "enabled": false },
            "users.new-user": { "keys": ["n"] }
        }
    })));
    let prefs = svc.load();
    assert_eq!(prefs.schema_version, CURRENT_SCHEMA_VERSION);
    assert_eq!(prefs.len(), 1);
    assert!(!find(&svc.resolved(), "users.invite-user").is_enabled);
}

#[test]
fn load_keeps_last_document_when_store_is_unreadable() {
    let svc = service_with(MemoryStore::with_document(json!({
        "schemaVersion": 1,
        "customizations": { "users.invite-user": { "enabled": false } }
    })));
    svc.store().fail_next_read("offline");
    assert_eq!(svc.load(), HotkeyPreferences::default());
    assert!(find(&svc.resolved(), "users.invite-user").is_enabled);

    let loaded = svc.load();
    assert_eq!(loaded.len(), 1);

    svc.store().fail_next_read("offline again");
    assert_eq!(svc.load(), loaded);
    assert!(!find(&svc.resolved(), "users.invite-user").is_enabled);
}

#[test]
fn failed_read_aborts_a_change() {
    let svc = service();
    svc.store().fail_next_read("offline");
    let err = svc.toggle_hotkey("users.invite-user", false).unwrap_err();
    assert!(matches!(
        err,
        HotkeyError::Persistence(PersistenceError::Unavailable(_))
    ));
    assert_eq!(svc.store().write_count(), 0);
    assert!(!svc.is_saving());
}

#[test]
fn set_custom_keys_persists_and_updates_cache() {
    let svc = service();
    svc.load();
    let prefs = svc.set_custom_keys("accounts.new-account", Some("ctrl+n")).unwrap();

    assert_eq!(svc.preferences(), prefs);
    assert_eq!(svc.store().write_count(), 1);
    let stored: HotkeyPreferences = serde_json::from_value(svc.store().document().unwrap()).unwrap();
    assert_eq!(stored, prefs);

    let account = find(&svc.resolved(), "accounts.new-account").clone();
    assert!(account.is_customized);
    assert_eq!(account.effective_keys(), "ctrl+n");
    assert_eq!(find(&svc.resolved(), "users.new-user").effective_keys(), "n");
}

#[test]
fn setting_default_keys_prunes_stored_entry() {
    let svc = service();
    svc.set_custom_keys("global.command-palette", Some("mod+p")).unwrap();
    let prefs = svc.set_custom_keys("global.command-palette", Some("mod+k")).unwrap();
    assert!(prefs.get("global.command-palette").is_none());
    assert!(!find(&svc.resolved(), "global.command-palette").is_customized);
}

#[test]
fn failed_write_leaves_local_state_unchanged() {
    let svc = service();
    svc.set_custom_keys("users.new-user", Some("shift+n")).unwrap();
    let before = svc.preferences();

    svc.store().fail_next_write("network down");
    let err = svc.toggle_hotkey("users.new-user", false).unwrap_err();
    assert!(matches!(
        err,
        HotkeyError::Persistence(PersistenceError::Unavailable(_))
    ));
    assert_eq!(svc.preferences(), before);
    assert!(find(&svc.resolved(), "users.new-user").is_enabled);
    assert!(!svc.is_saving());
}

#[test]
fn unknown_id_is_rejected_before_touching_store() {
    let svc = service();
    let err = svc.set_custom_keys("nope", Some("x")).unwrap_err();
    assert!(matches!(err, HotkeyError::UnknownHotkey(ref id) if id == "nope"));
    let err = svc.toggle_hotkey("nope", true).unwrap_err();
    assert!(matches!(err, HotkeyError::UnknownHotkey(_)));
    assert_eq!(svc.store().write_count(), 0);
}

#[test]
fn reset_operations() {
    let svc = service();
    svc.toggle_hotkey("users.invite-user", false).unwrap();
    svc.toggle_hotkey("accounts.edit-account", false).unwrap();
    svc.set_custom_keys("global.search", Some("mod+/")).unwrap();

    let prefs = svc.reset_scope(Scope::Users).unwrap();
    assert!(prefs.get("users.invite-user").is_none());
    assert!(prefs.get("accounts.edit-account").is_some());

    let prefs = svc.reset_hotkey("accounts.edit-account").unwrap();
    assert_eq!(prefs.len(), 1);

    let first = svc.reset_all().unwrap();
    let second = svc.reset_all().unwrap();
    assert_eq!(first, second);
    assert_eq!(first, HotkeyPreferences::default());
}

#[test]
fn mutations_reread_the_store() {
    let svc = service();
    svc.load();
    // Another session saved a change after this one loaded.
    svc.store().overwrite(json!({
        "schemaVersion": 1,
        "customizations": { "users.invite-user": { "enabled": false } }
    }));

    let prefs = svc.toggle_hotkey("accounts.edit-account", false).unwrap();
    assert!(prefs.get("users.invite-user").is_some());
    assert!(prefs.get("accounts.edit-account").is_some());
}

#[test]
fn changes_keep_fields_from_a_newer_schema() {
    let svc = service_with(MemoryStore::with_document(json!({
        "schemaVersion": 99,
        "layout": "compact",
        "customizations": {
            "users.new-user": { "keys": "shift+n", "priority": 3 }
        }
    })));
    svc.toggle_hotkey("users.invite-user", false).unwrap();

    assert_eq!(
        svc.store().document().unwrap(),
        json!({
            "schemaVersion": 99,
            "layout": "compact",
            "customizations": {
                "users.new-user": { "keys": "shift+n", "priority": 3 },
                "users.invite-user": { "enabled": false }
            }
        })
    );

    // Clearing the keys leaves an entry that still carries an unknown field.
    let prefs = svc.set_custom_keys("users.new-user", None).unwrap();
    let entry = prefs.get("users.new-user").unwrap();
    assert_eq!(entry.keys, None);
    assert_eq!(entry.extra.get("priority"), Some(&json!(3)));
    assert_eq!(find(&svc.resolved(), "users.new-user").effective_keys(), "n");
}

#[test]
fn validate_reports_conflicts_and_reserved() {
    let svc = service();
    let validation = svc.validate("ctrl+k", Scope::Users, Some("users.new-user"));
    assert!(validation.has_conflicts());
    assert_eq!(
        validation.conflicts[0].conflicts_with,
        vec!["global.command-palette".to_string()]
    );
    assert_eq!(validation.reserved, None);

    let validation = svc.validate("ctrl+w", Scope::Users, Some("users.new-user"));
    assert!(!validation.has_conflicts());
    assert_eq!(validation.reserved, Some("Close tab"));

    assert!(svc.validate("shift+n", Scope::Users, Some("users.new-user")).is_clear());
}

#[test]
fn disabling_frees_keys_for_another_hotkey() {
    let svc = service();
    svc.toggle_hotkey("global.toggle-sidebar", false).unwrap();
    assert!(svc.validate("mod+b", Scope::Accounts, Some("accounts.edit-account")).conflicts.is_empty());
}

#[test]
fn listeners_receive_recomputed_list() {
    let svc = service();
    let calls = Arc::new(AtomicUsize::new(0));
    let last_enabled = Arc::new(Mutex::new(None));
    {
        let calls = Arc::clone(&calls);
        let last_enabled = Arc::clone(&last_enabled);
        svc.subscribe(Box::new(move |resolved: &[ResolvedHotkey]| {
            calls.fetch_add(1, Ordering::SeqCst);
            let hotkey = resolved.iter().find(|h| h.id() == "quotes.new-quote").unwrap();
            *last_enabled.lock() = Some(hotkey.is_enabled);
        }));
    }

    svc.load();
    svc.toggle_hotkey("quotes.new-quote", false).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(*last_enabled.lock(), Some(false));

    svc.store().fail_next_write("offline");
    assert!(svc.toggle_hotkey("quotes.new-quote", true).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn export_import_round_trip() {
    let source = service();
    source.set_custom_keys("global.command-palette", Some("mod+p")).unwrap();
    source.toggle_hotkey("quotes.convert-to-invoice", true).unwrap();
    let exported = source.export_preferences();

    let target = service();
    let imported = target.import_preferences(&exported).unwrap();
    assert_eq!(imported, source.preferences());
    assert_eq!(target.resolved(), source.resolved());
}

#[test]
fn import_drops_unknown_and_redundant_entries() {
    let svc = service();
    let prefs = svc
        .import_preferences(&json!({
            "schemaVersion": 1,
            "customizations": {
                "ghost.hotkey": { "keys": "x" },
                "users.new-user": { "keys": "n", "enabled": true },
                "users.invite-user": { "keys": "shift+i" }
            }
        }))
        .unwrap();
    let ids: Vec<&str> = prefs.customizations.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["users.invite-user"]);
}

#[test]
fn import_rejects_non_objects() {
    let svc = service();
    let err = svc.import_preferences(&json!("ctrl+k")).unwrap_err();
    assert!(matches!(err, HotkeyError::InvalidImport(_)));
    assert_eq!(svc.store().write_count(), 0);
}

#[test]
fn dispatcher_receives_effective_bindings() {
    struct Capture(Vec<DispatchBinding>);
    impl HotkeyDispatcher for Capture {
        fn register_all(&mut self, bindings: &[DispatchBinding]) {
            self.0 = bindings.to_vec();
        }
    }

    let svc = service();
    svc.set_custom_keys("global.command-palette", Some("mod+p")).unwrap();
    let mut capture = Capture(Vec::new());
    svc.push_to(&mut capture);

    let palette = capture.0.iter().find(|b| b.id == "global.command-palette").unwrap();
    assert_eq!(palette.keys, "ctrl+p");
    assert_eq!(palette.scope, Scope::Global);
    assert!(palette.enabled);
    assert_eq!(capture.0.len(), svc.registry().len());
}

/// Store whose writes block until the test releases them.
struct GatedStore {
    inner: MemoryStore,
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl PreferenceStore for GatedStore {
    fn fetch(&self) -> std::result::Result<Option<Value>, PersistenceError> {
        self.inner.fetch()
    }

    fn persist(&self, prefs: &HotkeyPreferences) -> std::result::Result<(), PersistenceError> {
        let _ = self.entered.lock().send(());
        let _ = self.release.lock().recv();
        self.inner.persist(prefs)
    }
}

#[test]
fn concurrent_change_is_rejected_while_saving() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let svc = Arc::new(HotkeyService::new(
        Arc::new(HotkeyRegistry::builtin().clone()),
        GatedStore {
            inner: MemoryStore::new(),
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        },
        Arc::new(Platform::Other),
    ));

    let worker = {
        let svc = Arc::clone(&svc);
        thread::spawn(move || svc.set_custom_keys("users.new-user", Some("shift+n")))
    };

    entered_rx.recv().unwrap();
    assert!(svc.is_saving());
    let err = svc.toggle_hotkey("users.invite-user", false).unwrap_err();
    assert!(matches!(err, HotkeyError::SaveInProgress));

    release_tx.send(()).unwrap();
    let prefs = worker.join().unwrap().unwrap();
    assert!(prefs.get("users.new-user").is_some());
    assert!(prefs.get("users.invite-user").is_none());
    assert!(!svc.is_saving());
    assert_eq!(svc.store().inner.write_count(), 1);
}
