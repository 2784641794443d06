//! bizops-hotkeys - inspect and edit a user's hotkey preferences
//!
//! # Usage
//!
//! ```bash
//! bizops-hotkeys list --scope accounts
//! bizops-hotkeys check "shift+n" --scope accounts --exclude accounts.new-account
//! bizops-hotkeys set accounts.new-account "shift+n"
//! bizops-hotkeys audit
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use bizops_hotkeys::config::{self, Config, StoreKind};
use bizops_hotkeys::error::{ErrorSeverity, HotkeyError};
use bizops_hotkeys::logging;
use bizops_hotkeys::platform::PlatformProvider;
use bizops_hotkeys::shortcuts::{
    display_keys, find_all_conflicts, ApiStore, HotkeyConflict, HotkeyRegistry, HotkeyService,
    JsonFileStore, PreferenceStore, Scope, Validation,
};

#[derive(Parser, Debug)]
#[command(name = "bizops-hotkeys")]
#[command(about = "Inspect and edit keyboard shortcut preferences")]
#[command(version)]
struct Cli {
    /// Config file (defaults to <config dir>/bizops-hotkeys/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List effective hotkeys
    List {
        /// Only show hotkeys of this scope
        #[arg(long)]
        scope: Option<Scope>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check a combination for conflicts and reserved shortcuts
    Check {
        keys: String,
        #[arg(long)]
        scope: Scope,
        /// Hotkey being edited, excluded from the comparison
        #[arg(long)]
        exclude: Option<String>,
    },
    /// Assign a custom combination to a hotkey
    Set {
        id: String,
        keys: String,
        /// Save even if the combination conflicts
        #[arg(long)]
        force: bool,
    },
    /// Restore a hotkey's default combination
    Clear { id: String },
    /// Enable a hotkey
    Enable { id: String },
    /// Disable a hotkey
    Disable { id: String },
    /// Drop every customization of a hotkey
    Reset { id: String },
    /// Drop every customization in a scope
    ResetScope { scope: Scope },
    /// Drop every customization
    ResetAll,
    /// Report every conflict among the effective hotkeys
    Audit,
    /// Print the stored preferences as JSON
    Export,
    /// Replace the stored preferences with an exported JSON file
    Import { file: PathBuf },
}

fn main() -> ExitCode {
    let _guard = logging::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<HotkeyError>() {
                Some(hotkey_error) => eprintln!(
                    "{}: {}",
                    severity_label(hotkey_error.severity()),
                    hotkey_error.user_message()
                ),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn severity_label(severity: ErrorSeverity) -> &'static str {
    match severity {
        ErrorSeverity::Info => "note",
        ErrorSeverity::Warning => "warning",
        ErrorSeverity::Error => "error",
    }
}

fn open_store(config: &Config) -> Result<Box<dyn PreferenceStore>> {
    match config.store {
        StoreKind::File => {
            let path = config.preferences_path();
            info!(path = %path.display(), "Using file store");
            Ok(Box::new(JsonFileStore::new(path)))
        }
        StoreKind::Api => {
            let store = ApiStore::from_env(
                &config.api_base_url,
                &config.api_token_env,
                config.request_timeout(),
            )
            .context("cannot open the profile API store")?;
            info!(url = store.profile_url(), "Using API store");
            Ok(Box::new(store))
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let config = config::load_config(&config_path);
    let platform = Arc::new(config.platform());

    let service = HotkeyService::new(
        Arc::new(HotkeyRegistry::builtin().clone()),
        open_store(&config)?,
        platform,
    );
    service.load();

    match cli.command {
        Command::List { scope, json } => {
            let resolved: Vec<_> = service
                .resolved()
                .into_iter()
                .filter(|h| scope.map_or(true, |s| h.scope() == s))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                for hotkey in &resolved {
                    println!(
                        "{:<36} {:<14} {:<14} {:<9}{} {}",
                        hotkey.id(),
                        hotkey.scope().as_str(),
                        display_keys(hotkey.effective_keys(), service.platform()),
                        if hotkey.is_enabled { "enabled" } else { "disabled" },
                        if hotkey.is_customized { "*" } else { " " },
                        hotkey.definition.description,
                    );
                }
            }
        }
        Command::Check {
            keys,
            scope,
            exclude,
        } => {
            let validation = service.validate(&keys, scope, exclude.as_deref());
            print_validation(&validation, service.platform());
            if validation.has_conflicts() {
                return Ok(ExitCode::FAILURE);
            }
            if validation.is_clear() {
                println!("{} is free in {}", display_keys(&keys, service.platform()), scope);
            }
        }
        Command::Set { id, keys, force } => {
            let scope = service
                .registry()
                .get(&id)
                .map(|definition| definition.scope)
                .ok_or_else(|| HotkeyError::UnknownHotkey(id.clone()))?;
            let validation = service.validate(&keys, scope, Some(&id));
            print_validation(&validation, service.platform());
            if validation.has_conflicts() && !force {
                eprintln!("not saved; pass --force to save anyway");
                return Ok(ExitCode::FAILURE);
            }
            service.set_custom_keys(&id, Some(&keys))?;
            println!("{} -> {}", id, display_keys(&keys, service.platform()));
        }
        Command::Clear { id } => {
            service.set_custom_keys(&id, None)?;
            println!("{} restored to its default", id);
        }
        Command::Enable { id } => {
            service.toggle_hotkey(&id, true)?;
            println!("{} enabled", id);
        }
        Command::Disable { id } => {
            service.toggle_hotkey(&id, false)?;
            println!("{} disabled", id);
        }
        Command::Reset { id } => {
            service.reset_hotkey(&id)?;
            println!("{} reset", id);
        }
        Command::ResetScope { scope } => {
            service.reset_scope(scope)?;
            println!("{} hotkeys reset", scope);
        }
        Command::ResetAll => {
            service.reset_all()?;
            println!("all hotkeys reset");
        }
        Command::Audit => {
            let conflicts = find_all_conflicts(&service.resolved(), service.platform());
            if conflicts.is_empty() {
                println!("no conflicts");
            } else {
                for conflict in &conflicts {
                    print_conflict(conflict, service.platform());
                }
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Export => {
            println!("{}", serde_json::to_string_pretty(&service.export_preferences())?);
        }
        Command::Import { file } => {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let document: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", file.display()))?;
            let prefs = service.import_preferences(&document)?;
            println!("imported {} customizations", prefs.len());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_validation(validation: &Validation, platform: &dyn PlatformProvider) {
    for conflict in &validation.conflicts {
        print_conflict(conflict, platform);
    }
    if let Some(reserved) = validation.reserved {
        eprintln!("warning: overrides the browser/OS shortcut \"{}\"", reserved);
    }
}

fn print_conflict(conflict: &HotkeyConflict, platform: &dyn PlatformProvider) {
    let subject = if conflict.hotkey_id.is_empty() {
        "candidate"
    } else {
        conflict.hotkey_id.as_str()
    };
    println!(
        "conflict: {} ({} in {}) collides with {}",
        subject,
        display_keys(&conflict.keys, platform),
        conflict.scope,
        conflict.conflicts_with.join(", "),
    );
}
