use super::{read_page, CmdMessage, CmdResult, EntryView};
use crate::classify::classify;
use crate::error::Result;
use crate::html::parse;
use crate::locate::locate;
use crate::store::PreferenceStore;
use std::path::Path;

/// List every entry in the page with its category. The page is not modified.
pub fn run<S: PreferenceStore>(store: &S, page: &Path) -> Result<CmdResult> {
    let prefs = store.get()?;
    let doc = parse(&read_page(page)?);

    let entries: Vec<EntryView> = locate(&doc, doc.root())
        .into_iter()
        .map(|entry| {
            let category = classify(&doc, entry);
            let hidden = category.is_some_and(|c| prefs.is_hidden(c));
            EntryView::describe(&doc, entry, category, hidden)
        })
        .collect();

    tracing::debug!(page = %page.display(), entries = entries.len(), "classified page");

    let mut result = CmdResult::default().with_preferences(prefs);
    if entries.is_empty() {
        result.add_message(CmdMessage::warning("No timeline entries found."));
    }
    Ok(result.with_entries(entries))
}
