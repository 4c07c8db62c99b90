//! # Session
//!
//! Ties the engine to its triggers. A [`Session`] owns the page being kept
//! in shape, the preference snapshot in force, and the one pending delayed
//! recompute. It has no clock of its own: callers pass `now` in, which keeps
//! the whole state machine deterministic under test.
//!
//! ```text
//!  InitialLoad ─┐
//!  PreferencesChanged(p) ─┴─► recompute now (cancels anything pending)
//!  ContentMutated ─┐
//!  Navigated ──────┴─► schedule / reschedule ──poll(now)──► recompute
//! ```
//!
//! Each recompute is a full [`apply`] over the current document.

use crate::apply::{apply, ApplyReport};
use crate::config::FocusConfig;
use crate::dom::Document;
use crate::model::Preferences;
use crate::trigger::{Debouncer, Trigger, TriggerDelays};
use std::time::Instant;

pub struct Session {
    doc: Document,
    prefs: Preferences,
    hidden_class: String,
    delays: TriggerDelays,
    debouncer: Debouncer,
    location: Option<String>,
}

impl Session {
    pub fn new(doc: Document, prefs: Preferences, config: &FocusConfig) -> Self {
        let location = doc.location().map(str::to_string);
        Self {
            doc,
            prefs,
            hidden_class: config.hidden_class.clone(),
            delays: config.delays(),
            debouncer: Debouncer::new(),
            location,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// React to `trigger`. Returns the report when a recompute ran right away.
    pub fn handle(&mut self, trigger: Trigger, now: Instant) -> Option<ApplyReport> {
        let delay = self.delays.delay_for(&trigger);
        if let Trigger::PreferencesChanged(prefs) = trigger {
            self.prefs = prefs;
        }

        match delay {
            None => {
                self.debouncer.cancel();
                Some(self.recompute())
            }
            Some(delay) => {
                tracing::trace!(delay_ms = delay.as_millis() as u64, "recompute scheduled");
                self.debouncer.schedule(now, delay);
                None
            }
        }
    }

    /// Swap in a freshly read page and raise the matching trigger: a
    /// navigation when the page address changed, a content mutation otherwise.
    pub fn replace_document(&mut self, doc: Document, now: Instant) -> Trigger {
        let location = doc.location().map(str::to_string);
        let trigger = if location != self.location {
            tracing::debug!(from = ?self.location, to = ?location, "navigation detected");
            Trigger::Navigated
        } else {
            Trigger::ContentMutated
        };
        self.doc = doc;
        self.location = location;
        self.handle(trigger.clone(), now);
        trigger
    }

    /// Run the pending recompute if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<ApplyReport> {
        if self.debouncer.take_due(now) {
            Some(self.recompute())
        } else {
            None
        }
    }

    fn recompute(&mut self) -> ApplyReport {
        let root = self.doc.root();
        apply(&mut self.doc, root, &self.prefs, &self.hidden_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse;
    use crate::locate::WRAPPER_ATTR;
    use crate::model::Category;
    use std::time::Duration;

    const PAGE: &str = r#"<html><head><link rel="canonical" href="https://example.test/issues/1"></head><body>
        <div data-wrapper-timeline-id="1"><div data-timeline-event-id="1">User changed the title</div></div>
        </body></html>"#;

    const OTHER_PAGE: &str = r#"<html><head><link rel="canonical" href="https://example.test/issues/2"></head><body>
        <div data-wrapper-timeline-id="1"><div data-timeline-event-id="1">User reopened this</div></div>
        </body></html>"#;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn is_hidden(session: &Session) -> bool {
        let doc = session.document();
        let wrapper = doc.find_by_attr(WRAPPER_ATTR, "1").unwrap();
        doc.has_class(wrapper, "gh-cleaner-hidden")
    }

    fn session() -> Session {
        Session::new(parse(PAGE), Preferences::defaults(), &FocusConfig::default())
    }

    #[test]
    fn test_initial_load_recomputes_immediately() {
        let mut session = session();
        let report = session.handle(Trigger::InitialLoad, Instant::now()).unwrap();
        assert_eq!(report.hidden, 1);
        assert!(is_hidden(&session));
        assert_eq!(session.next_deadline(), None);
    }

    #[test]
    fn test_preference_change_applies_new_snapshot() {
        let mut session = session();
        let now = Instant::now();
        session.handle(Trigger::InitialLoad, now);
        assert!(is_hidden(&session));

        let prefs = Preferences::defaults().with(Category::Renamed, false);
        let report = session.handle(Trigger::PreferencesChanged(prefs), now).unwrap();
        assert_eq!(report.hidden, 0);
        assert!(!is_hidden(&session));
        assert_eq!(session.preferences(), &prefs);
    }

    #[test]
    fn test_content_mutation_waits_for_deadline() {
        let mut session = session();
        let start = Instant::now();

        let trigger = session.replace_document(parse(PAGE), start);
        assert_eq!(trigger, Trigger::ContentMutated);
        assert!(!is_hidden(&session));

        assert!(session.poll(start + ms(50)).is_none());
        assert!(session.poll(start + ms(100)).is_some());
        assert!(is_hidden(&session));
        assert!(session.poll(start + ms(200)).is_none());
    }

    #[test]
    fn test_burst_of_mutations_coalesces() {
        let mut session = session();
        let start = Instant::now();
        for i in 0..5 {
            session.replace_document(parse(PAGE), start + ms(i * 30));
        }
        assert!(session.poll(start + ms(150)).is_none());
        assert!(session.poll(start + ms(220)).is_some());
        assert!(session.poll(start + ms(400)).is_none());
    }

    #[test]
    fn test_navigation_detected_by_location_change() {
        let mut session = session();
        let start = Instant::now();

        let trigger = session.replace_document(parse(OTHER_PAGE), start);
        assert_eq!(trigger, Trigger::Navigated);
        assert_eq!(session.next_deadline(), Some(start + ms(500)));
        assert!(session.poll(start + ms(499)).is_none());

        let report = session.poll(start + ms(500)).unwrap();
        assert_eq!(report.hidden, 0, "reopened is visible by default");
        assert_eq!(report.entries, 1);
    }

    #[test]
    fn test_immediate_trigger_cancels_pending() {
        let mut session = session();
        let start = Instant::now();
        session.replace_document(parse(PAGE), start);
        assert!(session.next_deadline().is_some());

        session.handle(Trigger::PreferencesChanged(Preferences::defaults()), start);
        assert_eq!(session.next_deadline(), None);
        assert!(is_hidden(&session));
    }

    #[test]
    fn test_configured_delays_are_used() {
        let mut config = FocusConfig::default();
        config.mutation_delay_ms = 10;
        let mut session = Session::new(parse(PAGE), Preferences::defaults(), &config);
        let start = Instant::now();
        session.replace_document(parse(PAGE), start);
        assert!(session.poll(start + ms(10)).is_some());
    }
}
