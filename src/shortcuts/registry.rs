//! Immutable hotkey registry.
//!
//! Uses Vec for deterministic iteration order and HashMap for O(1) lookup.
//! A registry is built once and never mutated afterwards.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use thiserror::Error;

use super::types::{Category, HotkeyDefinition, Scope};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("hotkey id '{0}' is registered more than once")]
pub struct DuplicateHotkeyId(pub String);

/// Central, read-only table of hotkey definitions.
#[derive(Clone, Debug, Default)]
pub struct HotkeyRegistry {
    definitions: Vec<HotkeyDefinition>,
    id_to_index: HashMap<String, usize>,
}

static BUILTIN: OnceLock<HotkeyRegistry> = OnceLock::new();

impl HotkeyRegistry {
    pub fn new(definitions: Vec<HotkeyDefinition>) -> Result<Self, DuplicateHotkeyId> {
        let mut id_to_index = HashMap::with_capacity(definitions.len());
        for (index, definition) in definitions.iter().enumerate() {
            if id_to_index.insert(definition.id.clone(), index).is_some() {
                return Err(DuplicateHotkeyId(definition.id.clone()));
            }
        }
        Ok(Self {
            definitions,
            id_to_index,
        })
    }

    /// The application's built-in hotkeys, loaded once per process.
    pub fn builtin() -> &'static HotkeyRegistry {
        BUILTIN.get_or_init(|| {
            Self::new(builtin_definitions()).unwrap_or_else(|e| {
                crate::debug_panic!("built-in hotkeys are invalid: {}", e);
                // Keep the first definition of each id.
                let mut seen = HashSet::new();
                let unique = builtin_definitions()
                    .into_iter()
                    .filter(|d| seen.insert(d.id.clone()))
                    .collect();
                Self::new(unique).unwrap_or_default()
            })
        })
    }

    pub fn get(&self, id: &str) -> Option<&HotkeyDefinition> {
        self.id_to_index
            .get(id)
            .and_then(|&i| self.definitions.get(i))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_to_index.contains_key(id)
    }

    pub fn definitions(&self) -> &[HotkeyDefinition] {
        &self.definitions
    }

    pub fn by_scope(&self, scope: Scope) -> Vec<&HotkeyDefinition> {
        self.definitions.iter().filter(|d| d.scope == scope).collect()
    }

    pub fn by_category(&self, category: Category) -> Vec<&HotkeyDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Default hotkeys of the application, in registration order.
pub fn default_hotkeys() -> &'static [HotkeyDefinition] {
    HotkeyRegistry::builtin().definitions()
}

fn builtin_definitions() -> Vec<HotkeyDefinition> {
    use Category::*;
    use Scope::*;

    vec![
        // Global
        HotkeyDefinition::new("global.command-palette", "mod+k", Global, General, "Open command palette"),
        HotkeyDefinition::new("global.search", "/", Global, General, "Focus search"),
        HotkeyDefinition::new("global.shortcuts-help", "shift+?", Global, General, "Show keyboard shortcuts"),
        HotkeyDefinition::new("global.toggle-sidebar", "mod+b", Global, View, "Toggle sidebar"),
        HotkeyDefinition::new("global.preferences", "mod+,", Global, General, "Open preferences"),
        HotkeyDefinition::new("global.go-dashboard", "g>d", Global, Navigation, "Go to dashboard"),
        HotkeyDefinition::new("global.go-organizations", "g>o", Global, Navigation, "Go to organizations"),
        HotkeyDefinition::new("global.go-users", "g>u", Global, Navigation, "Go to users"),
        HotkeyDefinition::new("global.go-accounts", "g>a", Global, Navigation, "Go to accounts"),
        HotkeyDefinition::new("global.go-projects", "g>p", Global, Navigation, "Go to projects"),
        HotkeyDefinition::new("global.go-invoices", "g>i", Global, Navigation, "Go to invoices"),
        HotkeyDefinition::new("global.go-inventory", "g>v", Global, Navigation, "Go to inventory"),
        HotkeyDefinition::new("global.go-resources", "g>r", Global, Navigation, "Go to resources"),
        HotkeyDefinition::new("global.go-quotes", "g>q", Global, Navigation, "Go to quotes"),
        // Active on every page, including inside dialogs
        HotkeyDefinition::new("any.close-dialog", "escape", Wildcard, General, "Close dialog"),
        // Organizations
        HotkeyDefinition::new("organizations.new-organization", "n", Organizations, Actions, "New organization"),
        HotkeyDefinition::new("organizations.edit-organization", "e", Organizations, Actions, "Edit organization"),
        // Users
        HotkeyDefinition::new("users.new-user", "n", Users, Actions, "New user"),
        HotkeyDefinition::new("users.invite-user", "i", Users, Actions, "Invite user"),
        HotkeyDefinition::new("users.deactivate-user", "shift+d", Users, Actions, "Deactivate user")
            .disabled_by_default(),
        // Accounts
        HotkeyDefinition::new("accounts.new-account", "n", Accounts, Actions, "New account"),
        HotkeyDefinition::new("accounts.edit-account", "e", Accounts, Actions, "Edit account"),
        HotkeyDefinition::new("accounts.delete-account", "shift+d", Accounts, Actions, "Delete account")
            .disabled_by_default(),
        // Projects
        HotkeyDefinition::new("projects.new-project", "n", Projects, Actions, "New project"),
        HotkeyDefinition::new("projects.archive-project", "shift+a", Projects, Actions, "Archive project"),
        // Invoices
        HotkeyDefinition::new("invoices.new-invoice", "n", Invoices, Actions, "New invoice"),
        HotkeyDefinition::new("invoices.send-invoice", "mod+shift+s", Invoices, Actions, "Send invoice"),
        HotkeyDefinition::new("invoices.mark-paid", "shift+p", Invoices, Actions, "Mark invoice as paid"),
        // Inventory
        HotkeyDefinition::new("inventory.new-item", "n", Inventory, Actions, "New inventory item"),
        HotkeyDefinition::new("inventory.adjust-stock", "a", Inventory, Actions, "Adjust stock"),
        // Resources
        HotkeyDefinition::new("resources.new-resource", "n", Resources, Actions, "New resource"),
        HotkeyDefinition::new("resources.book-resource", "b", Resources, Actions, "Book resource"),
        // Quotes
        HotkeyDefinition::new("quotes.new-quote", "n", Quotes, Actions, "New quote"),
        HotkeyDefinition::new("quotes.convert-to-invoice", "c", Quotes, Actions, "Convert quote to invoice")
            .disabled_by_default(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_matches_a_registry_built_from_the_same_table() {
        let registry = HotkeyRegistry::builtin();
        let rebuilt = HotkeyRegistry::new(builtin_definitions()).unwrap();
        assert!(!registry.is_empty());
        assert_eq!(registry.definitions(), rebuilt.definitions());
        for definition in rebuilt.definitions() {
            assert_eq!(registry.get(&definition.id), Some(definition));
        }
    }

    #[test]
    fn default_registry_is_empty() {
        let registry = HotkeyRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.get("global.command-palette").is_none());
    }

    #[test]
    fn new_rejects_duplicate_ids() {
        let defs = vec![
            HotkeyDefinition::new("a", "x", Scope::Global, Category::General, "A"),
            HotkeyDefinition::new("a", "y", Scope::Users, Category::General, "A again"),
        ];
        assert_eq!(
            HotkeyRegistry::new(defs).unwrap_err(),
            DuplicateHotkeyId("a".to_string())
        );
    }

    #[test]
    fn lookup_by_id() {
        let registry = HotkeyRegistry::builtin();
        let def = registry.get("accounts.new-account").unwrap();
        assert_eq!(def.keys, "n");
        assert_eq!(def.scope, Scope::Accounts);
        assert!(registry.get("nope").is_none());
        assert!(!registry.contains("nope"));
    }

    #[test]
    fn filters_keep_registration_order() {
        let registry = HotkeyRegistry::builtin();
        let accounts: Vec<&str> = registry
            .by_scope(Scope::Accounts)
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(
            accounts,
            vec![
                "accounts.new-account",
                "accounts.edit-account",
                "accounts.delete-account"
            ]
        );
        assert!(registry
            .by_category(Category::Navigation)
            .iter()
            .all(|d| d.scope == Scope::Global));
    }

    #[test]
    fn disabled_by_default_flag() {
        let registry = HotkeyRegistry::builtin();
        assert!(!registry.get("quotes.convert-to-invoice").unwrap().default_enabled());
        assert!(registry.get("quotes.new-quote").unwrap().default_enabled());
    }
}
