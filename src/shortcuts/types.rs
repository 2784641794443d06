//! Core hotkey types.
//!
//! This module provides:
//! - `HotkeyDefinition` - A registered shortcut with its default keys
//! - `Scope` / `Category` - Where a shortcut is live and how it is grouped
//! - `HotkeyCustomization` / `HotkeyPreferences` - The persisted per-user document
//! - `ResolvedHotkey` - A definition merged with its customization
//! - `HotkeyConflict` - A validation result listing colliding hotkeys

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Current schema version of the persisted preferences document.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Error returned when a scope name is not recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown hotkey scope '{0}'")]
pub struct UnknownScope(pub String);

/// Context in which a hotkey is live.
///
/// `Global` and `Wildcard` shortcuts are always live; every other scope is an
/// isolated page context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    Global,
    #[serde(rename = "*")]
    Wildcard,
    Organizations,
    Users,
    Accounts,
    Projects,
    Invoices,
    Inventory,
    Resources,
    Quotes,
}

impl Scope {
    pub const ALL: [Scope; 10] = [
        Scope::Global,
        Scope::Wildcard,
        Scope::Organizations,
        Scope::Users,
        Scope::Accounts,
        Scope::Projects,
        Scope::Invoices,
        Scope::Inventory,
        Scope::Resources,
        Scope::Quotes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Wildcard => "*",
            Self::Organizations => "organizations",
            Self::Users => "users",
            Self::Accounts => "accounts",
            Self::Projects => "projects",
            Self::Invoices => "invoices",
            Self::Inventory => "inventory",
            Self::Resources => "resources",
            Self::Quotes => "quotes",
        }
    }

    /// True for scopes that are live on every page.
    pub fn is_always_active(&self) -> bool {
        matches!(self, Self::Global | Self::Wildcard)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == lower || (lower == "wildcard" && *scope == Scope::Wildcard))
            .ok_or_else(|| UnknownScope(s.to_string()))
    }
}

/// Category for grouping hotkeys in the settings screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    General,
    Navigation,
    Actions,
    View,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Navigation => "Navigation",
            Self::Actions => "Actions",
            Self::View => "View",
        }
    }
}

/// A registered hotkey with its default key combination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HotkeyDefinition {
    pub id: String,
    pub keys: String,
    pub scope: Scope,
    pub category: Category,
    pub description: String,
    /// Default-enabled flag. `None` means enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl HotkeyDefinition {
    pub fn new(
        id: impl Into<String>,
        keys: impl Into<String>,
        scope: Scope,
        category: Category,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            keys: keys.into(),
            scope,
            category,
            description: description.into(),
            enabled: None,
        }
    }

    pub fn disabled_by_default(mut self) -> Self {
        self.enabled = Some(false);
        self
    }

    pub fn default_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// A per-user override for one hotkey. Absent fields fall back to the definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyCustomization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Fields written by a newer schema, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HotkeyCustomization {
    /// True when the override changes nothing relative to `definition`.
    ///
    /// An entry carrying unknown fields is never redundant.
    pub fn is_redundant_for(&self, definition: &HotkeyDefinition) -> bool {
        let keys_default = self.keys.as_deref().map_or(true, |k| k == definition.keys);
        let enabled_default = self
            .enabled
            .map_or(true, |e| e == definition.default_enabled());
        keys_default && enabled_default && self.extra.is_empty()
    }
}

/// The full persisted hotkey document for one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotkeyPreferences {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub customizations: BTreeMap<String, HotkeyCustomization>,
    /// Top-level fields written by a newer schema, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for HotkeyPreferences {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            customizations: BTreeMap::new(),
            extra: Map::new(),
        }
    }
}

impl HotkeyPreferences {
    pub fn get(&self, id: &str) -> Option<&HotkeyCustomization> {
        self.customizations.get(id)
    }

    pub fn len(&self) -> usize {
        self.customizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customizations.is_empty()
    }
}

/// A definition merged with the user's customization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedHotkey {
    #[serde(flatten)]
    pub definition: HotkeyDefinition,
    pub custom_keys: Option<String>,
    /// True only when the effective keys differ from the default.
    pub is_customized: bool,
    pub is_enabled: bool,
}

impl ResolvedHotkey {
    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn scope(&self) -> Scope {
        self.definition.scope
    }

    /// The key combination actually in force.
    pub fn effective_keys(&self) -> &str {
        self.custom_keys.as_deref().unwrap_or(&self.definition.keys)
    }
}

/// Hotkeys that share a normalized combination with a candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotkeyConflict {
    /// The hotkey being edited; empty when not yet assigned.
    pub hotkey_id: String,
    pub conflicts_with: Vec<String>,
    pub scope: Scope,
    pub keys: String,
}
