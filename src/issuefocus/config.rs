use crate::apply::DEFAULT_HIDDEN_CLASS;
use crate::error::{FocusError, Result};
use crate::rules::class_fragments;
use crate::trigger::TriggerDelays;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_MUTATION_DELAY_MS: u64 = 100;
const DEFAULT_NAVIGATION_DELAY_MS: u64 = 500;

/// Keys accepted by [`FocusConfig::get`] and [`FocusConfig::set`].
pub const CONFIG_KEYS: &[&str] = &["hidden-class", "mutation-delay-ms", "navigation-delay-ms"];

/// Runtime configuration, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FocusConfig {
    /// Class toggled on wrappers of hidden entries
    #[serde(default = "default_hidden_class")]
    pub hidden_class: String,

    /// Wait after a content change before recomputing
    #[serde(default = "default_mutation_delay")]
    pub mutation_delay_ms: u64,

    /// Wait after a navigation before recomputing, so the new page can settle
    #[serde(default = "default_navigation_delay")]
    pub navigation_delay_ms: u64,
}

fn default_hidden_class() -> String {
    DEFAULT_HIDDEN_CLASS.to_string()
}

fn default_mutation_delay() -> u64 {
    DEFAULT_MUTATION_DELAY_MS
}

fn default_navigation_delay() -> u64 {
    DEFAULT_NAVIGATION_DELAY_MS
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            hidden_class: default_hidden_class(),
            mutation_delay_ms: DEFAULT_MUTATION_DELAY_MS,
            navigation_delay_ms: DEFAULT_NAVIGATION_DELAY_MS,
        }
    }
}

impl FocusConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(FocusError::Io)?;
        let config: FocusConfig =
            serde_json::from_str(&content).map_err(FocusError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(FocusError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(FocusError::Serialization)?;
        fs::write(config_path, content).map_err(FocusError::Io)?;
        Ok(())
    }

    pub fn delays(&self) -> TriggerDelays {
        TriggerDelays {
            mutation: Duration::from_millis(self.mutation_delay_ms),
            navigation: Duration::from_millis(self.navigation_delay_ms),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "hidden-class" => Some(self.hidden_class.clone()),
            "mutation-delay-ms" => Some(self.mutation_delay_ms.to_string()),
            "navigation-delay-ms" => Some(self.navigation_delay_ms.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "hidden-class" => {
                let class = value.trim();
                if class.is_empty() || class.contains(char::is_whitespace) {
                    return Err(FocusError::Config(format!(
                        "hidden-class must be a single class name, got '{}'",
                        value
                    )));
                }
                if let Some(fragment) = class_fragments().find(|f| class.contains(f)) {
                    return Err(FocusError::Config(format!(
                        "hidden-class '{}' contains '{}', which marks an event type",
                        class, fragment
                    )));
                }
                self.hidden_class = class.to_string();
            }
            "mutation-delay-ms" => self.mutation_delay_ms = parse_millis(key, value)?,
            "navigation-delay-ms" => self.navigation_delay_ms = parse_millis(key, value)?,
            _ => return Err(FocusError::Config(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        FocusError::Config(format!(
            "{} must be a whole number of milliseconds, got '{}'",
            key, value
        ))
    })
}
