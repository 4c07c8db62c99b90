use super::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Category;
use crate::store::PreferenceStore;

#[derive(Debug, Clone)]
pub enum SettingsAction {
    Show,
    Set(Category, bool),
    Reset,
}

pub fn run<S: PreferenceStore>(store: &mut S, action: SettingsAction) -> Result<CmdResult> {
    match action {
        SettingsAction::Show => Ok(CmdResult::default().with_preferences(store.get()?)),
        SettingsAction::Set(category, hide) => {
            let prefs = store.get()?.with(category, hide);
            store.set(&prefs)?;
            let mut result = CmdResult::default().with_preferences(prefs);
            result.add_message(CmdMessage::success(format!(
                "{} entries will be {}",
                category.label(),
                if hide { "hidden" } else { "shown" }
            )));
            Ok(result)
        }
        SettingsAction::Reset => {
            let prefs = store.reset()?;
            let mut result = CmdResult::default().with_preferences(prefs);
            result.add_message(CmdMessage::success("Settings reset to defaults"));
            Ok(result)
        }
    }
}
