//! # Preference Storage
//!
//! The engine only ever sees a full [`Preferences`] snapshot. Where that
//! snapshot lives is behind the [`PreferenceStore`] trait so the same
//! commands run against a JSON file in production and plain memory in tests.
//!
//! ## Persisted Shape
//!
//! ```text
//! <data dir>/
//! ├── prefs.json      # {"filters": {"addedToProject": true, ...}}
//! └── config.json     # runtime configuration
//! ```
//!
//! Stored data is only ever *partial* from the engine's point of view. A
//! missing file, a missing `filters` object or missing keys all fall back to
//! the built-in defaults; unknown keys are ignored. Writes always persist
//! the full merged set, and a reset writes the defaults verbatim.
//!
//! ## Change Notification
//!
//! Listeners registered with [`PreferenceStore::on_change`] are called with
//! the new snapshot after every successful write through the store. Writes
//! made by other processes are not seen here; the watch loop observes the
//! file for those.
//!
//! ## Implementations
//!
//! - [`fs::FsStore`]: JSON file, atomic writes.
//! - [`memory::MemStore`]: in-memory, for tests.

use crate::error::Result;
use crate::model::Preferences;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod fs;
pub mod memory;

pub type Listener = Box<dyn FnMut(&Preferences)>;

/// On-disk envelope around the category map.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PrefsFile {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub filters: Value,
}

impl PrefsFile {
    pub fn from_preferences(prefs: &Preferences) -> Result<Self> {
        Ok(Self {
            filters: serde_json::to_value(prefs)?,
        })
    }
}

pub trait PreferenceStore {
    /// Raw stored `filters` value, `None` when nothing has been stored.
    fn load_raw(&self) -> Result<Option<Value>>;

    /// Persist the full set and notify listeners.
    fn set(&mut self, prefs: &Preferences) -> Result<()>;

    /// Register a listener for future writes made through this store.
    ///
    /// Only in-process writes are delivered. `watch` picks up writes from
    /// other processes through its file watcher on the data directory.
    fn on_change(&mut self, listener: Listener);

    /// Current snapshot, gaps filled from defaults.
    fn get(&self) -> Result<Preferences> {
        Ok(self
            .load_raw()?
            .map(|raw| Preferences::merged(&raw))
            .unwrap_or_default())
    }

    /// Write the built-in defaults verbatim.
    fn reset(&mut self) -> Result<Preferences> {
        let defaults = Preferences::defaults();
        self.set(&defaults)?;
        Ok(defaults)
    }
}

/// Registered listeners, shared by the store implementations.
#[derive(Default)]
pub struct Listeners {
    listeners: Vec<Listener>,
}

impl Listeners {
    pub fn push(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn notify(&mut self, prefs: &Preferences) {
        for listener in self.listeners.iter_mut() {
            listener(prefs);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
