//! Visibility application: the full recompute run on every trigger.

use crate::classify::classify_wrapper;
use crate::dom::{Document, NodeId};
use crate::locate::{locate, wrapper_of};
use crate::model::{Category, Preferences};

/// Class put on a wrapper to hide it, unless configured otherwise.
pub const DEFAULT_HIDDEN_CLASS: &str = "gh-cleaner-hidden";

/// What a single [`apply`] pass did. Informational only; nothing from one
/// pass feeds the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub entries: usize,
    pub hidden: usize,
    pub unclassified: usize,
    pub by_category: Vec<(Category, usize)>,
}

impl ApplyReport {
    fn count(&mut self, category: Category) {
        match self.by_category.iter_mut().find(|(c, _)| *c == category) {
            Some((_, n)) => *n += 1,
            None => self.by_category.push((category, 1)),
        }
    }

    pub fn visible(&self) -> usize {
        self.entries - self.hidden
    }
}

/// Re-derive the visibility marker of every entry under `root`.
///
/// A wrapper gets `hidden_class` exactly when its entry classifies into a
/// category `prefs` hides; every other wrapper has it removed. Markers from
/// an earlier pass are cleared before anything is classified, so the result
/// depends on page content alone and running twice with the same inputs
/// changes nothing the second time.
pub fn apply(
    doc: &mut Document,
    root: NodeId,
    prefs: &Preferences,
    hidden_class: &str,
) -> ApplyReport {
    let wrappers: Vec<NodeId> = locate(doc, root)
        .into_iter()
        .map(|entry| wrapper_of(doc, entry))
        .collect();
    for wrapper in &wrappers {
        doc.remove_class(*wrapper, hidden_class);
    }

    let categories: Vec<Option<Category>> = wrappers
        .iter()
        .map(|wrapper| classify_wrapper(doc, *wrapper))
        .collect();

    let mut report = ApplyReport::default();
    for (wrapper, category) in wrappers.into_iter().zip(categories) {
        report.entries += 1;
        let hide = match category {
            Some(category) => {
                report.count(category);
                prefs.is_hidden(category)
            }
            None => {
                report.unclassified += 1;
                false
            }
        };

        if hide {
            report.hidden += 1;
            doc.add_class(wrapper, hidden_class);
        }
    }

    tracing::debug!(
        entries = report.entries,
        hidden = report.hidden,
        unclassified = report.unclassified,
        "applied visibility"
    );
    report
}
