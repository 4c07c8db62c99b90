use super::{Listener, Listeners, PreferenceStore, PrefsFile};
use crate::error::{FocusError, Result};
use crate::model::Preferences;
use serde_json::Value;

/// In-memory preference store for testing.
///
/// Holds the raw stored value rather than a `Preferences`, so tests can seed
/// it with partial or malformed data exactly as it might sit on disk.
#[derive(Default)]
pub struct MemStore {
    raw: Option<Value>,
    listeners: Listeners,
    simulate_write_error: bool,
    simulate_read_error: bool,
    writes: usize,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `filters` already stored.
    pub fn with_raw(filters: Value) -> Self {
        Self {
            raw: Some(filters),
            ..Self::default()
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    /// Make every read fail, as an unreadable preference file would.
    pub fn set_simulate_read_error(&mut self, simulate: bool) {
        self.simulate_read_error = simulate;
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl PreferenceStore for MemStore {
    fn load_raw(&self) -> Result<Option<Value>> {
        if self.simulate_read_error {
            return Err(FocusError::Store("Simulated read error".to_string()));
        }
        Ok(self.raw.clone())
    }

    fn set(&mut self, prefs: &Preferences) -> Result<()> {
        if self.simulate_write_error {
            return Err(FocusError::Store("Simulated write error".to_string()));
        }
        self.raw = Some(PrefsFile::from_preferences(prefs)?.filters);
        self.writes += 1;
        self.listeners.notify(prefs);
        Ok(())
    }

    fn on_change(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_empty_store_reads_defaults() {
        let store = MemStore::new();
        assert_eq!(store.get().unwrap(), Preferences::defaults());
    }

    #[test]
    fn test_seeded_partial_data_is_merged() {
        let store = MemStore::with_raw(json!({ "labeled": false, "bogus": true }));
        let prefs = store.get().unwrap();
        assert!(!prefs.is_hidden(Category::Labeled));
        assert!(prefs.is_hidden(Category::Unlabeled));
    }

    #[test]
    fn test_write_error_leaves_state_and_listeners_untouched() {
        let mut store = MemStore::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        store.on_change(Box::new(move |_: &Preferences| counter.set(counter.get() + 1)));

        store.set_simulate_write_error(true);
        assert!(store.set(&Preferences::uniform(true)).is_err());
        assert_eq!(store.get().unwrap(), Preferences::defaults());
        assert_eq!(calls.get(), 0);
        assert_eq!(store.writes(), 0);

        store.set_simulate_write_error(false);
        store.set(&Preferences::uniform(true)).unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_reset_writes_full_default_map() {
        let mut store = MemStore::with_raw(json!({ "closed": true }));
        store.reset().unwrap();
        let raw = store.load_raw().unwrap().unwrap();
        assert_eq!(raw.as_object().unwrap().len(), Category::COUNT);
        assert_eq!(raw["closed"], json!(false));
    }

    #[test]
    fn test_read_error_surfaces_from_get() {
        let mut store = MemStore::new();
        store.set_simulate_read_error(true);
        assert!(store.get().is_err());
        store.set_simulate_read_error(false);
        assert_eq!(store.get().unwrap(), Preferences::defaults());
    }
}
