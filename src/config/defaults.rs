//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Directory name under the platform config/data dirs
pub const APP_DIR_NAME: &str = "bizops-hotkeys";

/// Config file name inside the app config dir
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Preferences file name for the file store
pub const PREFERENCES_FILE_NAME: &str = "hotkeys.json";

/// Environment variable holding the API bearer token
pub const DEFAULT_API_TOKEN_ENV: &str = "BIZOPS_API_TOKEN";

/// Default API base URL
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api/v1";

/// Default timeout for profile requests
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
