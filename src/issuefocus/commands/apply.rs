use super::{read_page, CmdMessage, CmdResult, FocusPaths};
use crate::apply::apply;
use crate::config::FocusConfig;
use crate::error::Result;
use crate::html::{parse, to_html};
use crate::store::fs::write_atomic;
use crate::store::PreferenceStore;
use std::path::Path;

/// Mark the page's hidden entries. With `output` the marked page is written
/// there; otherwise it is returned in the result.
pub fn run<S: PreferenceStore>(
    store: &S,
    paths: &FocusPaths,
    page: &Path,
    output: Option<&Path>,
) -> Result<CmdResult> {
    let config = FocusConfig::load(&paths.data_dir)?;
    let prefs = store.get()?;
    let mut doc = parse(&read_page(page)?);

    let root = doc.root();
    let report = apply(&mut doc, root, &prefs, &config.hidden_class);
    let html = to_html(&doc);

    let mut result = CmdResult::default()
        .with_preferences(prefs)
        .with_report(report.clone());

    match output {
        Some(out) => {
            write_atomic(out, &html)?;
            tracing::info!(output = %out.display(), "wrote marked page");
            result.add_message(CmdMessage::success(format!(
                "Hid {} of {} entries, wrote {}",
                report.hidden,
                report.entries,
                out.display()
            )));
            Ok(result)
        }
        None => Ok(result.with_html(html)),
    }
}
