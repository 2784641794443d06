//! BizOps hotkeys - keyboard shortcut resolution and conflict detection
//!
//! Merges the application's default hotkeys with one user's stored
//! customizations, detects scope-aware conflicts before a change is saved,
//! and persists the preference document through a pluggable store.

pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod shortcuts;
