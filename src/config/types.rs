//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::platform::{Platform, PlatformSetting};

use super::defaults::*;

/// Which backend holds the user's hotkey preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    File,
    Api,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Overrides host detection for `mod` resolution and display (default: auto)
    #[serde(default)]
    pub platform: PlatformSetting,
    #[serde(default)]
    pub store: StoreKind,
    /// JSON file used by the file store. `~` is expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences_path: Option<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Name of the environment variable holding the bearer token
    #[serde(default = "default_api_token_env")]
    pub api_token_env: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}
fn default_api_token_env() -> String {
    DEFAULT_API_TOKEN_ENV.to_string()
}
fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            platform: PlatformSetting::default(),
            store: StoreKind::default(),
            preferences_path: None,
            api_base_url: default_api_base_url(),
            api_token_env: default_api_token_env(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl Config {
    pub fn platform(&self) -> Platform {
        self.platform.resolve()
    }

    /// Resolved path of the preferences file, with `~` expanded.
    pub fn preferences_path(&self) -> PathBuf {
        match &self.preferences_path {
            Some(path) => PathBuf::from(shellexpand::tilde(path).as_ref()),
            None => default_preferences_path(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn app_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

/// `<config dir>/bizops-hotkeys/config.json`
pub fn default_config_path() -> PathBuf {
    app_config_dir().join(CONFIG_FILE_NAME)
}

/// `<config dir>/bizops-hotkeys/hotkeys.json`
pub fn default_preferences_path() -> PathBuf {
    app_config_dir().join(PREFERENCES_FILE_NAME)
}
