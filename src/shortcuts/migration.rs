//! Schema migration and lenient parsing of stored preference documents.
//!
//! A stored document must never break resolution. Corrupt customization
//! entries are dropped with a warning, and documents written by a newer
//! schema are read best-effort.

use serde_json::Value;
use tracing::{debug, warn};

use super::types::{HotkeyCustomization, HotkeyPreferences, CURRENT_SCHEMA_VERSION};

type MigrationStep = fn(&mut HotkeyPreferences);

/// `(target version, step)` pairs in ascending order. Version 1 is the first schema.
const MIGRATIONS: &[(u32, MigrationStep)] = &[];

/// Bring a stored document up to the current schema.
///
/// Absent documents become a fresh default. Documents from a newer schema are
/// returned untouched.
pub fn migrate(stored: Option<HotkeyPreferences>) -> HotkeyPreferences {
    let Some(mut prefs) = stored else {
        return HotkeyPreferences::default();
    };

    if prefs.schema_version > CURRENT_SCHEMA_VERSION {
        debug!(
            stored_version = prefs.schema_version,
            current_version = CURRENT_SCHEMA_VERSION,
            "Hotkey preferences come from a newer schema, reading best-effort"
        );
        return prefs;
    }

    for (target, step) in MIGRATIONS {
        if prefs.schema_version < *target {
            step(&mut prefs);
            prefs.schema_version = *target;
        }
    }
    prefs.schema_version = CURRENT_SCHEMA_VERSION;
    prefs
}

/// Parse a stored JSON value, skipping anything that does not fit the schema.
///
/// Returns `None` for `null` and for values that are not objects.
pub fn parse_stored(value: &Value) -> Option<HotkeyPreferences> {
    let object = match value {
        Value::Null => return None,
        Value::Object(object) => object,
        other => {
            warn!(kind = json_kind(other), "Ignoring hotkey preferences that are not an object");
            return None;
        }
    };

    let schema_version = object
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0);

    let mut prefs = HotkeyPreferences {
        schema_version,
        ..Default::default()
    };
    prefs.extra = object
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "schemaVersion" | "customizations"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    match object.get("customizations") {
        None | Some(Value::Null) => {}
        Some(Value::Object(entries)) => {
            for (id, entry) in entries {
                match serde_json::from_value::<HotkeyCustomization>(entry.clone()) {
                    Ok(customization) => {
                        prefs.customizations.insert(id.clone(), customization);
                    }
                    Err(e) => {
                        warn!(hotkey_id = %id, error = %e, "Dropping corrupt hotkey customization");
                    }
                }
            }
        }
        Some(other) => {
            warn!(kind = json_kind(other), "Ignoring hotkey customizations that are not an object");
        }
    }

    Some(prefs)
}

/// Parse and migrate in one step.
pub fn load_stored(value: Option<&Value>) -> HotkeyPreferences {
    migrate(value.and_then(parse_stored))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_document_becomes_default() {
        let prefs = migrate(None);
        assert_eq!(prefs.schema_version, CURRENT_SCHEMA_VERSION);
        assert!(prefs.is_empty());
    }

    #[test]
    fn old_version_is_stamped() {
        let stored = HotkeyPreferences {
            schema_version: 0,
            ..Default::default()
        };
        assert_eq!(migrate(Some(stored)).schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn migration_is_idempotent() {
        for version in [0, CURRENT_SCHEMA_VERSION, CURRENT_SCHEMA_VERSION + 3] {
            let mut stored = HotkeyPreferences::default();
            stored.schema_version = version;
            stored.customizations.insert(
                "a".to_string(),
                HotkeyCustomization {
                    keys: Some("x".to_string()),
                    enabled: None,
                    ..Default::default()
                },
            );
            let once = migrate(Some(stored));
            let twice = migrate(Some(once.clone()));
            assert_eq!(once, twice);
        }
        assert_eq!(migrate(Some(migrate(None))), migrate(None));
    }

    #[test]
    fn newer_schema_is_kept() {
        let value = json!({
            "schemaVersion": 99,
            "customizations": { "a": { "keys": "x", "priority": 3 } },
            "layout": "compact"
        });
        let prefs = load_stored(Some(&value));
        assert_eq!(prefs.schema_version, 99);
        assert_eq!(prefs.get("a").and_then(|c| c.keys.as_deref()), Some("x"));
        assert_eq!(prefs.extra.get("layout"), Some(&json!("compact")));
        assert_eq!(prefs.get("a").unwrap().extra.get("priority"), Some(&json!(3)));
        assert_eq!(serde_json::to_value(&prefs).unwrap(), value);
    }

    #[test]
    fn corrupt_entries_are_dropped() {
        let value = json!({
            "schemaVersion": 1,
            "customizations": {
                "good": { "enabled": false },
                "bad-keys": { "keys": 42 },
                "bad-shape": "ctrl+k"
            }
        });
        let prefs = parse_stored(&value).unwrap();
        assert_eq!(prefs.len(), 1);
        assert_eq!(prefs.get("good").unwrap().enabled, Some(false));
    }

    #[test]
    fn non_objects_are_ignored() {
        assert_eq!(parse_stored(&Value::Null), None);
        assert_eq!(parse_stored(&json!("prefs")), None);
        assert_eq!(load_stored(Some(&json!([1, 2]))), HotkeyPreferences::default());
        assert_eq!(load_stored(None), HotkeyPreferences::default());
    }

    #[test]
    fn missing_version_means_zero() {
        let prefs = parse_stored(&json!({ "customizations": {} })).unwrap();
        assert_eq!(prefs.schema_version, 0);
        assert_eq!(migrate(Some(prefs)).schema_version, CURRENT_SCHEMA_VERSION);
    }
}
