//! Feed for the runtime key-event dispatcher.
//!
//! The engine does not capture key events. It hands the dispatcher one
//! binding per hotkey and the dispatcher owns registration.

use serde::Serialize;

use crate::platform::PlatformProvider;

use super::normalize::resolve_platform_modifier;
use super::types::{ResolvedHotkey, Scope};

/// What the dispatcher needs to register one hotkey.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DispatchBinding {
    pub id: String,
    pub scope: Scope,
    /// Effective keys with `mod` already resolved for the platform.
    pub keys: String,
    pub enabled: bool,
}

/// An external key-binding library.
pub trait HotkeyDispatcher {
    /// Replace every registered binding with `bindings`.
    fn register_all(&mut self, bindings: &[DispatchBinding]);
}

/// Turn the resolved list into dispatcher bindings, preserving order.
pub fn dispatch_bindings(
    resolved: &[ResolvedHotkey],
    platform: &dyn PlatformProvider,
) -> Vec<DispatchBinding> {
    resolved
        .iter()
        .map(|hotkey| DispatchBinding {
            id: hotkey.id().to_string(),
            scope: hotkey.scope(),
            keys: resolve_platform_modifier(hotkey.effective_keys(), platform),
            enabled: hotkey.is_enabled,
        })
        .collect()
}
