//! Core data types: the fixed set of event [`Category`] values and the
//! [`Preferences`] mapping that says which of them should be hidden.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Kind of timeline event an entry represents.
///
/// The set is closed. Declaration order is significant: it is the order
/// categories are listed in, and the discriminant doubles as the index into
/// [`Preferences`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    AddedToProject,
    MovedInProject,
    StatusChanged,
    Labeled,
    Unlabeled,
    Assigned,
    Milestoned,
    Renamed,
    CrossReferenced,
    Closed,
    Reopened,
}

impl Category {
    pub const COUNT: usize = 11;

    pub const ALL: [Category; Category::COUNT] = [
        Category::AddedToProject,
        Category::MovedInProject,
        Category::StatusChanged,
        Category::Labeled,
        Category::Unlabeled,
        Category::Assigned,
        Category::Milestoned,
        Category::Renamed,
        Category::CrossReferenced,
        Category::Closed,
        Category::Reopened,
    ];

    /// Persisted key, as written in the preference file.
    pub fn key(self) -> &'static str {
        match self {
            Category::AddedToProject => "addedToProject",
            Category::MovedInProject => "movedInProject",
            Category::StatusChanged => "statusChanged",
            Category::Labeled => "labeled",
            Category::Unlabeled => "unlabeled",
            Category::Assigned => "assigned",
            Category::Milestoned => "milestoned",
            Category::Renamed => "renamed",
            Category::CrossReferenced => "crossReferenced",
            Category::Closed => "closed",
            Category::Reopened => "reopened",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::AddedToProject => "Added to project",
            Category::MovedInProject => "Moved in project",
            Category::StatusChanged => "Status changed",
            Category::Labeled => "Label added",
            Category::Unlabeled => "Label removed",
            Category::Assigned => "Assigned",
            Category::Milestoned => "Milestone set",
            Category::Renamed => "Title changed",
            Category::CrossReferenced => "Cross-referenced",
            Category::Closed => "Closed",
            Category::Reopened => "Reopened",
        }
    }

    /// Built-in default: project bookkeeping is hidden, lifecycle events stay.
    pub fn hidden_by_default(self) -> bool {
        !matches!(
            self,
            Category::CrossReferenced | Category::Closed | Category::Reopened
        )
    }

    /// Exact lookup by persisted key. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.key() == key)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Lenient parse for user input: `addedToProject`, `added-to-project`
    /// and `added_to_project` all resolve to the same category.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Category::ALL
            .into_iter()
            .find(|c| c.key().to_lowercase() == wanted)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Which categories are hidden.
///
/// Always fully populated. Partial or malformed persisted data goes through
/// [`Preferences::merged`], which fills every gap from the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    hidden: [bool; Category::COUNT],
}

impl Default for Preferences {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Preferences {
    pub fn defaults() -> Self {
        let mut hidden = [false; Category::COUNT];
        for category in Category::ALL {
            hidden[category.index()] = category.hidden_by_default();
        }
        Self { hidden }
    }

    /// Every category set to the same value.
    pub fn uniform(hide: bool) -> Self {
        Self {
            hidden: [hide; Category::COUNT],
        }
    }

    pub fn is_hidden(&self, category: Category) -> bool {
        self.hidden[category.index()]
    }

    pub fn set(&mut self, category: Category, hide: bool) {
        self.hidden[category.index()] = hide;
    }

    pub fn with(mut self, category: Category, hide: bool) -> Self {
        self.set(category, hide);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, bool)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.is_hidden(c)))
    }

    /// Defaults overlaid with whatever `partial` supplies.
    ///
    /// Unknown keys are ignored and values are read by truthiness, so this
    /// never fails: anything that is not an object contributes nothing.
    pub fn merged(partial: &Value) -> Self {
        let mut prefs = Self::defaults();
        if let Value::Object(map) = partial {
            for (key, value) in map {
                match Category::from_key(key) {
                    Some(category) => prefs.set(category, truthy(value)),
                    None => tracing::trace!(key = %key, "ignoring unknown preference key"),
                }
            }
        }
        prefs
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl Serialize for Preferences {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::COUNT))?;
        for (category, hide) in self.iter() {
            map.serialize_entry(category.key(), &hide)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Preferences {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::merged(&raw))
    }
}
