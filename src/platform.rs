//! Platform detection for modifier resolution and display.
//!
//! The `mod` placeholder in a key combination means Command (`meta`) on Apple
//! platforms and `ctrl` everywhere else. Code that needs to know which one
//! takes a `&dyn PlatformProvider` so it can be exercised without touching
//! the host environment.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Capability answering whether the current session runs on an Apple platform.
pub trait PlatformProvider: Send + Sync {
    fn is_apple_platform(&self) -> bool;

    /// Token that `mod` resolves to.
    fn primary_modifier(&self) -> &'static str {
        if self.is_apple_platform() {
            "meta"
        } else {
            "ctrl"
        }
    }
}

/// Platform family, as far as keyboard modifiers are concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Apple,
    Other,
}

static HOST_PLATFORM: OnceLock<Platform> = OnceLock::new();

impl Platform {
    /// Detect the host platform. Detection runs once per process.
    pub fn current() -> Self {
        *HOST_PLATFORM.get_or_init(|| {
            let detected = if cfg!(any(target_os = "macos", target_os = "ios")) {
                Platform::Apple
            } else {
                Platform::Other
            };
            tracing::debug!(platform = ?detected, "Detected host platform");
            detected
        })
    }
}

impl PlatformProvider for Platform {
    fn is_apple_platform(&self) -> bool {
        matches!(self, Platform::Apple)
    }
}

/// Platform override as written in the config file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformSetting {
    #[default]
    Auto,
    Apple,
    Other,
}

impl PlatformSetting {
    pub fn resolve(self) -> Platform {
        match self {
            PlatformSetting::Auto => Platform::current(),
            PlatformSetting::Apple => Platform::Apple,
            PlatformSetting::Other => Platform::Other,
        }
    }
}
