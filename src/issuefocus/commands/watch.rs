//! Keep a marked copy of a page in sync with its source and the preferences.
//!
//! ```text
//!  notify callback ──(WatchEvent)──► mpsc ──► consumer loop ──► Session
//!                                               │  recv_timeout(next deadline)
//!                                               └─► write output if it changed
//! ```
//!
//! The callback only forwards; all reading, applying and writing happens on
//! the consumer side. Directories are watched rather than files so editors
//! and atomic writers that replace the file by rename are still seen.

use super::{read_page, CmdMessage, CmdResult, FocusPaths};
use crate::apply::ApplyReport;
use crate::config::FocusConfig;
use crate::error::{FocusError, Result};
use crate::html::{parse, to_html};
use crate::session::Session;
use crate::store::fs::{write_atomic, PREFS_FILENAME};
use crate::store::PreferenceStore;
use crate::trigger::Trigger;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    /// The source page was written.
    Page,
    /// The preference file was written.
    Preferences,
}

/// The consumer side of the watch loop, free of any watcher or clock.
pub struct PageWatch<S: PreferenceStore> {
    store: S,
    session: Session,
    page: PathBuf,
    output: PathBuf,
    writes: usize,
}

impl<S: PreferenceStore> PageWatch<S> {
    /// Load the page, run the initial pass and write the output.
    pub fn start(
        store: S,
        config: &FocusConfig,
        page: PathBuf,
        output: PathBuf,
        now: Instant,
    ) -> Result<Self> {
        let doc = parse(&read_page(&page)?);
        let prefs = store.get()?;
        let mut watch = Self {
            store,
            session: Session::new(doc, prefs, config),
            page,
            output,
            writes: 0,
        };
        let report = watch.session.handle(Trigger::InitialLoad, now);
        watch.publish(report)?;
        Ok(watch)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// How many times the output file has been written.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn on_event(&mut self, event: WatchEvent, now: Instant) -> Result<()> {
        match event {
            WatchEvent::Page => {
                let source = match fs::read_to_string(&self.page) {
                    Ok(source) => source,
                    Err(e) => {
                        // Usually a writer caught mid-replace; the next event brings it back.
                        tracing::warn!(page = %self.page.display(), error = %e, "page unreadable, skipping");
                        return Ok(());
                    }
                };
                let trigger = self.session.replace_document(parse(&source), now);
                tracing::debug!(?trigger, "page changed");
                Ok(())
            }
            WatchEvent::Preferences => {
                let prefs = match self.store.get() {
                    Ok(prefs) => prefs,
                    Err(e) => {
                        tracing::warn!(error = %e, "preferences unreadable, keeping current ones");
                        return Ok(());
                    }
                };
                tracing::debug!("preferences changed");
                let report = self.session.handle(Trigger::PreferencesChanged(prefs), now);
                self.publish(report)
            }
        }
    }

    /// Run a recompute that has come due.
    pub fn tick(&mut self, now: Instant) -> Result<()> {
        let report = self.session.poll(now);
        self.publish(report)
    }

    fn publish(&mut self, report: Option<ApplyReport>) -> Result<()> {
        let Some(report) = report else {
            return Ok(());
        };
        let html = to_html(self.session.document());
        if write_if_changed(&self.output, &html)? {
            self.writes += 1;
            tracing::info!(
                output = %self.output.display(),
                hidden = report.hidden,
                entries = report.entries,
                "updated marked page"
            );
        }
        Ok(())
    }
}

/// Write `content` unless the file already holds exactly that. Returns whether
/// a write happened.
fn write_if_changed(path: &Path, content: &str) -> Result<bool> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == content) {
        return Ok(false);
    }
    write_atomic(path, content)?;
    Ok(true)
}

/// Watch `page` and the preference file until the watcher goes away.
pub fn run<S: PreferenceStore>(
    store: S,
    paths: &FocusPaths,
    page: &Path,
    output: Option<&Path>,
) -> Result<CmdResult> {
    let config = FocusConfig::load(&paths.data_dir)?;
    fs::create_dir_all(&paths.data_dir).map_err(FocusError::Io)?;

    let page = fs::canonicalize(page)
        .map_err(|e| FocusError::Api(format!("Cannot watch {}: {}", page.display(), e)))?;
    let output = output.map(Path::to_path_buf).unwrap_or_else(|| page.clone());
    let data_dir = fs::canonicalize(&paths.data_dir).map_err(FocusError::Io)?;
    let prefs_path = data_dir.join(PREFS_FILENAME);
    let page_dir = page
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| FocusError::Api(format!("{} has no parent directory", page.display())))?;

    let (tx, rx) = mpsc::channel();
    let watched_page = page.clone();
    let watched_prefs = prefs_path.clone();
    let mut watcher = RecommendedWatcher::new(
        move |result: std::result::Result<Event, notify::Error>| {
            let event = match result {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(error = %e, "watch error");
                    return;
                }
            };
            if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                return;
            }
            for path in &event.paths {
                let kind = if *path == watched_page {
                    WatchEvent::Page
                } else if *path == watched_prefs {
                    WatchEvent::Preferences
                } else {
                    continue;
                };
                let _ = tx.send(kind);
            }
        },
        notify::Config::default(),
    )?;
    watcher.watch(&page_dir, RecursiveMode::NonRecursive)?;
    if data_dir != page_dir {
        watcher.watch(&data_dir, RecursiveMode::NonRecursive)?;
    }

    let mut watch = PageWatch::start(store, &config, page.clone(), output.clone(), Instant::now())?;
    tracing::info!(page = %page.display(), output = %output.display(), "watching");

    loop {
        let received = match watch.session().next_deadline() {
            Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(event) => watch.on_event(event, Instant::now())?,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        watch.tick(Instant::now())?;
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "Stopped watching {} after {} update(s)",
        page.display(),
        watch.writes()
    )));
    Ok(result)
}
