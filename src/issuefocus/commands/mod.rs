use crate::apply::ApplyReport;
use crate::config::FocusConfig;
use crate::dom::{Document, NodeId};
use crate::error::{FocusError, Result};
use crate::locate::{wrapper_of, ENTRY_ATTR, WRAPPER_ATTR};
use crate::model::{Category, Preferences};
use std::fs;
use std::path::{Path, PathBuf};

pub mod apply;
pub mod classify;
pub mod config;
pub mod settings;
pub mod watch;

/// Where persisted state lives.
#[derive(Debug, Clone)]
pub struct FocusPaths {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// One timeline entry as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub entry_id: String,
    pub wrapper_id: Option<String>,
    pub category: Option<Category>,
    pub hidden: bool,
    pub excerpt: String,
}

impl EntryView {
    pub fn describe(
        doc: &Document,
        entry: NodeId,
        category: Option<Category>,
        hidden: bool,
    ) -> Self {
        let wrapper = wrapper_of(doc, entry);
        Self {
            entry_id: doc.attr(entry, ENTRY_ATTR).unwrap_or_default().to_string(),
            wrapper_id: doc.attr(wrapper, WRAPPER_ATTR).map(str::to_string),
            category,
            hidden,
            excerpt: collapse_whitespace(&doc.text_content(wrapper)),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub entries: Vec<EntryView>,
    pub preferences: Option<Preferences>,
    pub config: Option<FocusConfig>,
    pub report: Option<ApplyReport>,
    pub html: Option<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_entries(mut self, entries: Vec<EntryView>) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_preferences(mut self, prefs: Preferences) -> Self {
        self.preferences = Some(prefs);
        self
    }

    pub fn with_config(mut self, config: FocusConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_report(mut self, report: ApplyReport) -> Self {
        self.report = Some(report);
        self
    }

    pub fn with_html(mut self, html: String) -> Self {
        self.html = Some(html);
        self
    }
}

pub(crate) fn read_page(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        FocusError::Api(format!("Cannot read {}: {}", path.display(), e))
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
