use super::{Listener, Listeners, PreferenceStore, PrefsFile};
use crate::error::{FocusError, Result};
use crate::model::Preferences;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const PREFS_FILENAME: &str = "prefs.json";

/// Preferences kept as JSON in `<root>/prefs.json`.
pub struct FsStore {
    root: PathBuf,
    listeners: Listeners,
}

impl FsStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            listeners: Listeners::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(PREFS_FILENAME)
    }
}

impl PreferenceStore for FsStore {
    fn load_raw(&self) -> Result<Option<Value>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(FocusError::Io)?;
        match serde_json::from_str::<PrefsFile>(&content) {
            Ok(file) if file.filters.is_null() => Ok(None),
            Ok(file) => Ok(Some(file.filters)),
            Err(e) => {
                // Unreadable data must not stop a recompute; fall back to defaults.
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed preference file");
                Ok(None)
            }
        }
    }

    fn set(&mut self, prefs: &Preferences) -> Result<()> {
        let content = serde_json::to_string_pretty(&PrefsFile::from_preferences(prefs)?)
            .map_err(FocusError::Serialization)?;
        write_atomic(&self.path(), &content)?;
        tracing::debug!(path = %self.path().display(), "preferences saved");
        self.listeners.notify(prefs);
        Ok(())
    }

    fn on_change(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }
}

/// Write via a temp file in the same directory and rename over `path`, so
/// readers never see a half-written file.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(FocusError::Io)?;
    }

    let tmp_path = dir.join(format!(".issuefocus-{}.tmp", Uuid::new_v4()));
    fs::write(&tmp_path, content).map_err(FocusError::Io)?;
    fs::rename(&tmp_path, path).map_err(FocusError::Io)?;
    Ok(())
}
