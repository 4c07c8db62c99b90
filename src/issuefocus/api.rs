//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for every
//! operation, whatever the front end.
//!
//! The facade:
//! - **Dispatches** to the matching `commands::*::run`
//! - **Normalizes inputs** (category names, on/off switches, config actions)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It never prints and holds no business logic. `FocusApi<S: PreferenceStore>`
//! runs against `FsStore` in the binary and `MemStore` in tests.

use crate::commands::{self, config::ConfigAction, settings::SettingsAction, CmdResult};
use crate::error::{FocusError, Result};
use crate::model::Category;
use crate::store::PreferenceStore;
use std::path::Path;

pub struct FocusApi<S: PreferenceStore> {
    store: S,
    paths: commands::FocusPaths,
}

impl<S: PreferenceStore> FocusApi<S> {
    pub fn new(store: S, paths: commands::FocusPaths) -> Self {
        Self { store, paths }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn classify_page(&self, page: &Path) -> Result<CmdResult> {
        commands::classify::run(&self.store, page)
    }

    pub fn apply_page(&self, page: &Path, output: Option<&Path>) -> Result<CmdResult> {
        commands::apply::run(&self.store, &self.paths, page, output)
    }

    /// Blocks until the watcher shuts down.
    pub fn watch_page(self, page: &Path, output: Option<&Path>) -> Result<CmdResult> {
        commands::watch::run(self.store, &self.paths, page, output)
    }

    pub fn show_settings(&mut self) -> Result<CmdResult> {
        commands::settings::run(&mut self.store, SettingsAction::Show)
    }

    pub fn set_category(&mut self, category: &str, switch: &str) -> Result<CmdResult> {
        let category = parse_category(category)?;
        let hide = parse_switch(switch)?;
        commands::settings::run(&mut self.store, SettingsAction::Set(category, hide))
    }

    pub fn reset_settings(&mut self) -> Result<CmdResult> {
        commands::settings::run(&mut self.store, SettingsAction::Reset)
    }

    pub fn config(&self, key: Option<String>, value: Option<String>) -> Result<CmdResult> {
        let action = match (key, value) {
            (None, _) => ConfigAction::ShowAll,
            (Some(key), None) => ConfigAction::ShowKey(key),
            (Some(key), Some(value)) => ConfigAction::Set(key, value),
        };
        commands::config::run(&self.paths, action)
    }
}

fn parse_category(name: &str) -> Result<Category> {
    name.parse().map_err(FocusError::Api)
}

/// `on` hides the category, `off` shows it.
fn parse_switch(switch: &str) -> Result<bool> {
    match switch.to_ascii_lowercase().as_str() {
        "on" | "hide" | "true" | "yes" => Ok(true),
        "off" | "show" | "false" | "no" => Ok(false),
        other => Err(FocusError::Api(format!(
            "Expected 'on' or 'off', got '{}'",
            other
        ))),
    }
}
