//! Customization store adapters.
//!
//! The engine reads and writes one document per user. It goes through
//! `PreferenceStore`, which has three implementations:
//! - `MemoryStore` - in-process, used by tests and embedders
//! - `JsonFileStore` - a JSON file on disk
//! - `ApiStore` - the user's profile resource (`attributes.hotkeyPreferences`)
//!
//! Stores move raw JSON on read so a corrupt or newer document can still be
//! interpreted leniently by `migration::parse_stored`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{json, Value};
use thiserror::Error;

use super::types::HotkeyPreferences;

/// Error that can occur when loading/saving hotkey preferences.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("server responded with status {status}")]
    Http { status: u16 },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("API token not found in environment variable '{0}'")]
    MissingToken(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Backend holding one user's hotkey preferences document.
pub trait PreferenceStore: Send + Sync {
    /// Read the stored document. `Ok(None)` when the user has never saved one.
    fn fetch(&self) -> Result<Option<Value>, PersistenceError>;

    /// Replace the stored document. Either the whole document is written or nothing is.
    fn persist(&self, prefs: &HotkeyPreferences) -> Result<(), PersistenceError>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Box<T> {
    fn fetch(&self) -> Result<Option<Value>, PersistenceError> {
        (**self).fetch()
    }

    fn persist(&self, prefs: &HotkeyPreferences) -> Result<(), PersistenceError> {
        (**self).persist(prefs)
    }
}

// ============================================
// MEMORY STORE
// ============================================

#[derive(Debug, Default)]
struct MemoryState {
    document: Option<Value>,
    fail_next_read: Option<String>,
    fail_next_write: Option<String>,
    writes: usize,
}

/// In-memory store. Can be told to fail the next read or write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: Value) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                document: Some(document),
                ..Default::default()
            }),
        }
    }

    /// Make the next `fetch` call fail with `PersistenceError::Unavailable`.
    pub fn fail_next_read(&self, reason: impl Into<String>) {
        self.state.lock().fail_next_read = Some(reason.into());
    }

    /// Make the next `persist` call fail with `PersistenceError::Unavailable`.
    pub fn fail_next_write(&self, reason: impl Into<String>) {
        self.state.lock().fail_next_write = Some(reason.into());
    }

    /// Replace the stored document behind the engine's back (another session writing).
    pub fn overwrite(&self, document: Value) {
        self.state.lock().document = Some(document);
    }

    pub fn document(&self) -> Option<Value> {
        self.state.lock().document.clone()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }
}

impl PreferenceStore for MemoryStore {
    fn fetch(&self) -> Result<Option<Value>, PersistenceError> {
        let mut state = self.state.lock();
        if let Some(reason) = state.fail_next_read.take() {
            return Err(PersistenceError::Unavailable(reason));
        }
        Ok(state.document.clone())
    }

    fn persist(&self, prefs: &HotkeyPreferences) -> Result<(), PersistenceError> {
        let mut state = self.state.lock();
        if let Some(reason) = state.fail_next_write.take() {
            return Err(PersistenceError::Unavailable(reason));
        }
        state.document = Some(serde_json::to_value(prefs)?);
        state.writes += 1;
        Ok(())
    }
}

// ============================================
// JSON FILE STORE
// ============================================

/// Store backed by a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFileStore {
    fn fetch(&self) -> Result<Option<Value>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn persist(&self, prefs: &HotkeyPreferences) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(prefs)?;
        // Write then rename so a failed write never leaves a half-written document.
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

// ============================================
// API STORE
// ============================================

/// Store backed by the authenticated user's profile resource.
///
/// Reads `GET {base}/users/me` and writes
/// `PATCH {base}/users/me {"attributes": {"hotkeyPreferences": ...}}`.
pub struct ApiStore {
    agent: ureq::Agent,
    profile_url: String,
    token: String,
}

impl ApiStore {
    pub fn new(base_url: &str, token: impl Into<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            profile_url: format!("{}/users/me", base_url.trim_end_matches('/')),
            token: token.into(),
        }
    }

    /// Build a store whose bearer token is read from the environment variable `token_env`.
    pub fn from_env(
        base_url: &str,
        token_env: &str,
        timeout: Duration,
    ) -> Result<Self, PersistenceError> {
        let token = std::env::var(token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| PersistenceError::MissingToken(token_env.to_string()))?;
        Ok(Self::new(base_url, token, timeout))
    }

    pub fn profile_url(&self) -> &str {
        &self.profile_url
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Pull `attributes.hotkeyPreferences` out of a profile response.
///
/// Accepts both a bare resource and one wrapped in `{"data": ...}`.
pub fn extract_preferences(profile: &Value) -> Option<Value> {
    ["/data/attributes/hotkeyPreferences", "/attributes/hotkeyPreferences"]
        .iter()
        .find_map(|pointer| profile.pointer(pointer))
        .filter(|value| !value.is_null())
        .cloned()
}

/// Body for the partial profile update that replaces the hotkey document.
pub fn patch_body(prefs: &HotkeyPreferences) -> Value {
    json!({ "attributes": { "hotkeyPreferences": prefs } })
}

fn map_ureq_error(error: ureq::Error) -> PersistenceError {
    match error {
        ureq::Error::StatusCode(status) => PersistenceError::Http { status },
        other => PersistenceError::Transport(other.to_string()),
    }
}

impl PreferenceStore for ApiStore {
    fn fetch(&self) -> Result<Option<Value>, PersistenceError> {
        tracing::debug!(url = %self.profile_url, "Fetching hotkey preferences");

        let response = self
            .agent
            .get(&self.profile_url)
            .header("Accept", "application/json")
            .header("Authorization", &self.authorization())
            .call()
            .map_err(map_ureq_error)?;

        let profile: Value = response
            .into_body()
            .read_json()
            .map_err(map_ureq_error)?;

        Ok(extract_preferences(&profile))
    }

    fn persist(&self, prefs: &HotkeyPreferences) -> Result<(), PersistenceError> {
        tracing::debug!(
            url = %self.profile_url,
            customizations = prefs.len(),
            "Persisting hotkey preferences"
        );

        self.agent
            .patch(&self.profile_url)
            .header("Content-Type", "application/json")
            .header("Authorization", &self.authorization())
            .send_json(patch_body(prefs))
            .map_err(map_ureq_error)?;

        Ok(())
    }
}
