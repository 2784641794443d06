//! Hotkey resolution and conflict detection.
//!
//! This module provides:
//! - The built-in hotkey registry
//! - Key-combination normalization and platform-aware display
//! - Resolution of defaults plus one user's customizations
//! - Scope-aware conflict detection and reserved-shortcut warnings
//! - Pure preference mutations with redundant-entry pruning
//! - Schema migration and store adapters
//! - A service that orchestrates read -> compute -> persist -> update
//!
//! # Scopes
//!
//! Hotkeys belong to one scope. `global` and `*` are always active; page
//! scopes are only active on their page. A page hotkey can conflict with its
//! own page and with always-active hotkeys, never with another page.
//!
//! # Example
//!
//! ```ignore
//! use bizops_hotkeys::shortcuts::{HotkeyRegistry, HotkeyService, MemoryStore, Scope};
//!
//! let service = HotkeyService::new(registry, MemoryStore::new(), platform);
//! service.load();
//! let check = service.validate("shift+n", Scope::Accounts, Some("accounts.new-account"));
//! if !check.has_conflicts() {
//!     service.set_custom_keys("accounts.new-account", Some("shift+n"))?;
//! }
//! ```

mod conflicts;
mod dispatch;
mod migration;
mod mutations;
mod normalize;
mod persistence;
mod registry;
mod reserved;
mod resolver;
mod service;
mod types;

pub use types::{
    Category, HotkeyConflict, HotkeyCustomization, HotkeyDefinition, HotkeyPreferences,
    ResolvedHotkey, Scope, UnknownScope, CURRENT_SCHEMA_VERSION,
};

pub use normalize::{
    canonicalize_token, display_keys, is_modifier, is_sequence, normalize, normalize_for,
    resolve_platform_modifier, MOD_TOKEN, SEQUENCE_SEP,
};

pub use registry::{default_hotkeys, DuplicateHotkeyId, HotkeyRegistry};

pub use resolver::resolve;

pub use conflicts::{detect_conflicts, find_all_conflicts, in_comparison_set};

pub use reserved::check_reserved;

pub use mutations::{prune, reset_all, reset_hotkey, reset_scope, set_custom_keys, toggle_hotkey};

pub use migration::{load_stored, migrate, parse_stored};

pub use persistence::{
    extract_preferences, patch_body, ApiStore, JsonFileStore, MemoryStore, PersistenceError,
    PreferenceStore,
};

pub use dispatch::{dispatch_bindings, DispatchBinding, HotkeyDispatcher};

pub use service::{HotkeyListener, HotkeyService, Validation};
