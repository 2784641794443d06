use thiserror::Error;
use tracing::warn;

use crate::shortcuts::PersistenceError;

/// Error severity for UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,    // Blue - informational
    Warning, // Yellow - recoverable
    Error,   // Red - operation failed
}

/// Errors raised by hotkey preference operations.
///
/// Validation problems (conflicts, reserved shortcuts) are not errors; they
/// are returned as data by the validation functions.
#[derive(Error, Debug)]
pub enum HotkeyError {
    #[error("unknown hotkey '{0}'")]
    UnknownHotkey(String),

    #[error("another hotkey change is still being saved")]
    SaveInProgress,

    #[error("failed to persist hotkey preferences: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("imported hotkey preferences are invalid: {0}")]
    InvalidImport(String),
}

impl HotkeyError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownHotkey(_) => ErrorSeverity::Error,
            Self::SaveInProgress => ErrorSeverity::Info,
            Self::Persistence(_) => ErrorSeverity::Error,
            Self::InvalidImport(_) => ErrorSeverity::Warning,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownHotkey(id) => format!("There is no shortcut called '{}'", id),
            Self::SaveInProgress => "Please wait for the previous change to finish saving".to_string(),
            Self::Persistence(PersistenceError::Http { status: 401 | 403 }) => {
                "Your session has expired. Sign in again to save shortcuts".to_string()
            }
            Self::Persistence(_) => "Could not save your shortcuts. Please try again".to_string(),
            Self::InvalidImport(msg) => format!("Could not import shortcuts: {}", msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, HotkeyError>;

/// Turns a recoverable failure into `None`, logging a warning at the call site.
///
/// ```ignore
/// use bizops_hotkeys::error::ResultExt;
///
/// let Some(stored) = store.fetch().warn_on_err() else {
///     return self.preferences();
/// };
/// ```
pub trait ResultExt<T> {
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        self.map_err(|error| {
            let caller = std::panic::Location::caller();
            warn!(
                error = %error,
                file = caller.file(),
                line = caller.line(),
                "Continuing without the result of a failed operation"
            );
        })
        .ok()
    }
}

/// Panic in debug mode, log error in release mode.
///
/// Use for "impossible" states that should crash during development
/// but gracefully degrade in production.
#[macro_export]
macro_rules! debug_panic {
    ( $($fmt_arg:tt)* ) => {
        if cfg!(debug_assertions) {
            panic!( $($fmt_arg)* );
        } else {
            tracing::error!("IMPOSSIBLE STATE: {}", format_args!($($fmt_arg)*));
        }
    };
}
