//! Key combination normalization and platform-aware display.
//!
//! A combination is one or more steps separated by `>` (`"g>u"`), each step
//! being a chord of tokens joined by `+` or whitespace (`"ctrl+shift+k"`).
//! Normalization canonicalizes every chord independently and keeps the steps
//! in order, so `"Shift+Ctrl+K"` and `"ctrl+shift+k"` compare equal while
//! `"g>u"` and `"u>g"` do not.

use crate::platform::PlatformProvider;

/// Separator between the steps of a sequence shortcut.
pub const SEQUENCE_SEP: char = '>';

/// Logical placeholder for the platform's primary modifier.
pub const MOD_TOKEN: &str = "mod";

const MODIFIERS: [&str; 4] = ["ctrl", "alt", "shift", "meta"];

/// Canonicalize a single token: lowercase it and fold common aliases.
pub fn canonicalize_token(token: &str) -> String {
    let lower = token.trim().to_lowercase();
    match lower.as_str() {
        "cmd" | "command" | "super" | "win" | "⌘" => "meta",
        "control" | "ctl" | "^" | "⌃" => "ctrl",
        "option" | "opt" | "⌥" => "alt",
        "shft" | "⇧" => "shift",
        "esc" => "escape",
        "return" => "enter",
        "del" => "delete",
        "arrowup" => "up",
        "arrowdown" => "down",
        "arrowleft" => "left",
        "arrowright" => "right",
        "pgup" => "pageup",
        "pgdn" | "pgdown" => "pagedown",
        "+" => "plus",
        ">" | "gt" => "greater",
        _ => return lower,
    }
    .to_string()
}

pub fn is_modifier(token: &str) -> bool {
    MODIFIERS.contains(&token)
}

/// True if the combination has more than one step.
pub fn is_sequence(keys: &str) -> bool {
    split_steps(keys).len() > 1
}

/// Split a combination into its steps.
///
/// A `>` directly after a `+` is the `>` key itself (`"shift+>"`), not a
/// step separator.
fn split_steps(keys: &str) -> Vec<&str> {
    let mut steps = Vec::new();
    let mut start = 0;
    for (i, c) in keys.char_indices() {
        if c == SEQUENCE_SEP && !keys[start..i].trim_end().ends_with('+') {
            steps.push(keys[start..i].trim());
            start = i + c.len_utf8();
        }
    }
    steps.push(keys[start..].trim());
    steps.retain(|step| !step.is_empty());
    steps
}

/// Split one chord into raw tokens.
///
/// Tokens are separated by `+` or whitespace. A `+` where a token is expected
/// (`"ctrl++"`, `"ctrl + +"`) is the `+` key itself.
fn raw_tokens(step: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut token_start: Option<usize> = None;
    let mut after_plus = true;
    for (i, c) in step.char_indices() {
        if c == '+' {
            if let Some(start) = token_start.take() {
                tokens.push(&step[start..i]);
                after_plus = true;
            } else if after_plus {
                tokens.push(&step[i..i + 1]);
                after_plus = false;
            } else {
                after_plus = true;
            }
        } else if c.is_whitespace() {
            if let Some(start) = token_start.take() {
                tokens.push(&step[start..i]);
                after_plus = false;
            }
        } else if token_start.is_none() {
            token_start = Some(i);
        }
    }
    if let Some(start) = token_start {
        tokens.push(&step[start..]);
    }
    tokens
}

fn chord_tokens(step: &str, platform: Option<&dyn PlatformProvider>) -> Vec<String> {
    raw_tokens(step)
        .into_iter()
        .map(canonicalize_token)
        .map(|token| match platform {
            Some(platform) if token == MOD_TOKEN => platform.primary_modifier().to_string(),
            _ => token,
        })
        .collect()
}

fn normalize_with(keys: &str, platform: Option<&dyn PlatformProvider>) -> String {
    split_steps(keys)
        .into_iter()
        .map(|step| {
            let mut tokens = chord_tokens(step, platform);
            tokens.sort();
            tokens.dedup();
            tokens.join("+")
        })
        .filter(|chord| !chord.is_empty())
        .collect::<Vec<_>>()
        .join(&SEQUENCE_SEP.to_string())
}

/// Normalize a combination without resolving `mod`.
///
/// Tokens within each step are lowercased, alias-folded, sorted and joined
/// with `+`; steps stay in their original order.
pub fn normalize(keys: &str) -> String {
    normalize_with(keys, None)
}

/// Normalize a combination, replacing `mod` with the platform's primary modifier.
///
/// This is the form used for every comparison between combinations.
pub fn normalize_for(keys: &str, platform: &dyn PlatformProvider) -> String {
    normalize_with(keys, Some(platform))
}

/// Replace `mod` with the platform modifier while keeping the author's token order.
///
/// Used to hand effective keys to the runtime dispatcher.
pub fn resolve_platform_modifier(keys: &str, platform: &dyn PlatformProvider) -> String {
    split_steps(keys)
        .into_iter()
        .map(|step| chord_tokens(step, Some(platform)).join("+"))
        .filter(|chord| !chord.is_empty())
        .collect::<Vec<_>>()
        .join(&SEQUENCE_SEP.to_string())
}

/// Render a combination for humans: `⇧⌘K` on Apple platforms, `Ctrl+Shift+K` elsewhere.
///
/// Sequence steps are separated by a space.
pub fn display_keys(keys: &str, platform: &dyn PlatformProvider) -> String {
    let apple = platform.is_apple_platform();
    split_steps(keys)
        .into_iter()
        .map(|step| {
            let tokens = chord_tokens(step, Some(platform));
            if apple {
                display_step_apple(&tokens)
            } else {
                display_step_other(&tokens)
            }
        })
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn display_step_apple(tokens: &[String]) -> String {
    let mut s = String::new();
    for (modifier, symbol) in [("ctrl", '⌃'), ("alt", '⌥'), ("shift", '⇧'), ("meta", '⌘')] {
        if tokens.iter().any(|t| t == modifier) {
            s.push(symbol);
        }
    }
    for key in tokens.iter().filter(|t| !is_modifier(t)) {
        s.push_str(&key_symbol(key));
    }
    s
}

fn display_step_other(tokens: &[String]) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (modifier, label) in [("ctrl", "Ctrl"), ("alt", "Alt"), ("shift", "Shift"), ("meta", "Meta")] {
        if tokens.iter().any(|t| t == modifier) {
            parts.push(label.to_string());
        }
    }
    parts.extend(tokens.iter().filter(|t| !is_modifier(t)).map(|k| key_text(k)));
    parts.join("+")
}

fn key_symbol(key: &str) -> String {
    match key {
        "enter" => "↵",
        "escape" => "⎋",
        "tab" => "⇥",
        "space" => "␣",
        "backspace" => "⌫",
        "delete" => "⌦",
        "up" => "↑",
        "down" => "↓",
        "left" => "←",
        "right" => "→",
        "plus" => "+",
        "greater" => ">",
        k => return k.to_uppercase(),
    }
    .to_string()
}

fn key_text(key: &str) -> String {
    match key {
        "enter" => "Enter",
        "escape" => "Esc",
        "tab" => "Tab",
        "space" => "Space",
        "backspace" => "Backspace",
        "delete" => "Delete",
        "up" => "Up",
        "down" => "Down",
        "left" => "Left",
        "right" => "Right",
        "pageup" => "PageUp",
        "pagedown" => "PageDown",
        "plus" => "+",
        "greater" => ">",
        k => return k.to_uppercase(),
    }
    .to_string()
}
