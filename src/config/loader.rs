//! Configuration loading from file system

use std::fs;
use std::path::Path;
use tracing::{info, instrument, warn};

use super::types::Config;

/// Load configuration from a JSON file.
///
/// Returns `Config::default()` if the file is missing or cannot be parsed.
#[instrument(name = "load_config", skip(path), fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Config {
    if !path.exists() {
        info!("Config file not found, using defaults");
        return Config::default();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(error = %e, "Failed to read config file, using defaults");
            return Config::default();
        }
    };

    match serde_json::from_str::<Config>(&content) {
        Ok(config) => {
            info!(store = ?config.store, platform = ?config.platform, "Successfully loaded config");
            config
        }
        Err(e) => {
            let hint = if e.to_string().contains("unknown variant") {
                "\n\nHint: 'store' must be \"file\" or \"api\" and 'platform' must be \"auto\", \"apple\" or \"other\""
            } else {
                ""
            };
            warn!(error = %e, hint = %hint, "Failed to parse config JSON, using defaults");
            Config::default()
        }
    }
}
