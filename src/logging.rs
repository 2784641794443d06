//! Structured JSONL logging to a file and human-readable stderr output.
//!
//! - **JSONL to file** (`<data dir>/bizops-hotkeys/logs/bizops-hotkeys.jsonl`)
//! - **Compact to stderr**
//!
//! # Usage
//!
//! ```rust,ignore
//! use bizops_hotkeys::logging;
//!
//! // Keep the guard alive for the duration of the program
//! let _guard = logging::init();
//!
//! tracing::info!(event_type = "hotkeys_saved", hotkey_id = "users.new-user", "Saved");
//! ```
//!
//! # JSONL Output Format
//!
//! ```json
//! {"timestamp":"2026-10-19T10:30:45.123Z","level":"INFO","target":"bizops_hotkeys::shortcuts::service","fields":{"message":"Saved hotkey preferences","event_type":"hotkeys_saved","action":"toggle_hotkey","subject":"users.new-user","customizations":2}}
//! ```

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_NAME: &str = "bizops-hotkeys.jsonl";

/// Guard that must be kept alive for the duration of the program.
/// Dropping this guard will flush and close the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize the dual-output logging system.
///
/// Returns a guard that MUST be kept alive for the duration of the program.
/// A second call leaves the already-installed subscriber in place.
pub fn init() -> LoggingGuard {
    let log_dir = log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }

    let log_path = log_dir.join(LOG_FILE_NAME);
    let file: Box<dyn Write + Send> = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => Box::new(file),
        Err(e) => {
            eprintln!("[LOGGING] Failed to open log file: {}", e);
            Box::new(std::io::sink())
        }
    };

    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file);

    // Default to info, allow override via RUST_LOG
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ureq=warn,rustls=warn"));

    let json_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .compact();

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            event_type = "app_lifecycle",
            action = "started",
            log_path = %log_path.display(),
            "Logging initialized"
        );
    }

    LoggingGuard {
        _file_guard: file_guard,
    }
}

/// `<data dir>/bizops-hotkeys/logs`, or a temp dir when there is no data dir.
pub fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("bizops-hotkeys").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("bizops-hotkeys-logs"))
}

/// Path to the JSONL log file
pub fn log_path() -> PathBuf {
    log_dir().join(LOG_FILE_NAME)
}
