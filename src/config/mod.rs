//! Configuration module - Host settings for the hotkey engine
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions
//! - `loader` - File system loading and parsing

mod defaults;
mod loader;
mod types;

pub use defaults::{DEFAULT_API_TOKEN_ENV, DEFAULT_REQUEST_TIMEOUT_MS};

pub use types::{default_config_path, default_preferences_path, Config, StoreKind};

pub use loader::load_config;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
