//! # Rule Table
//!
//! One [`Rule`] per [`Category`], kept as plain data so adding a category
//! means adding a row, not a code path. The evaluator in
//! [`crate::classify`] walks this table in definition order, so order here
//! is behaviour: when two rules could both claim an entry in the same phase,
//! the earlier row wins.
//!
//! Known overlaps decided by that order:
//! - `MovedInProject` and `StatusChanged` share their structural marker, so
//!   structurally the former always wins.
//! - `labeledEvent` is a substring of `unlabeledEvent`, so a structural
//!   unlabel event classifies as `Labeled`.

use crate::model::Category;

/// A structural test against a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// The node's `class` attribute contains this substring
    /// (case-sensitive, like CSS `[class*="..."]`).
    ClassContains(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub category: Category,
    pub structural: &'static [Matcher],
    /// Lowercase substrings searched for in the entry's flattened text.
    pub text: &'static [&'static str],
    /// Must appear in the wrapper markup for a text hit to count.
    pub marker: Option<&'static str>,
}

pub static RULES: &[Rule] = &[
    Rule {
        category: Category::AddedToProject,
        structural: &[Matcher::ClassContains("AddedToProjectV2Event")],
        text: &["added this to"],
        marker: None,
    },
    Rule {
        category: Category::MovedInProject,
        structural: &[Matcher::ClassContains("ProjectV2ItemStatusChangedEvent")],
        text: &["moved this to", "moved this from"],
        marker: None,
    },
    Rule {
        category: Category::StatusChanged,
        structural: &[Matcher::ClassContains("ProjectV2ItemStatusChangedEvent")],
        text: &["set the"],
        marker: None,
    },
    Rule {
        category: Category::Labeled,
        structural: &[
            Matcher::ClassContains("labeledEvent"),
            Matcher::ClassContains("LabeledEvent"),
        ],
        text: &["added", "labeled"],
        marker: Some("octicon-tag"),
    },
    Rule {
        category: Category::Unlabeled,
        structural: &[
            Matcher::ClassContains("unlabeledEvent"),
            Matcher::ClassContains("UnlabeledEvent"),
        ],
        text: &["removed", "unlabeled"],
        marker: Some("octicon-tag"),
    },
    Rule {
        category: Category::Assigned,
        structural: &[
            Matcher::ClassContains("assignee"),
            Matcher::ClassContains("AssignedEvent"),
        ],
        text: &["assigned", "self-assigned"],
        marker: Some("octicon-person"),
    },
    Rule {
        category: Category::Milestoned,
        structural: &[
            Matcher::ClassContains("milestoned"),
            Matcher::ClassContains("MilestonedEvent"),
        ],
        text: &["added this to the", "milestone"],
        marker: Some("octicon-milestone"),
    },
    Rule {
        category: Category::Renamed,
        structural: &[
            Matcher::ClassContains("renamed"),
            Matcher::ClassContains("RenamedTitleEvent"),
        ],
        text: &["changed the title"],
        marker: None,
    },
    Rule {
        category: Category::CrossReferenced,
        structural: &[
            Matcher::ClassContains("cross-referenced"),
            Matcher::ClassContains("CrossReferencedEvent"),
        ],
        text: &["mentioned this", "referenced this"],
        marker: None,
    },
    Rule {
        category: Category::Closed,
        structural: &[Matcher::ClassContains("ClosedEvent")],
        text: &["closed this"],
        marker: Some("octicon-issue-closed"),
    },
    Rule {
        category: Category::Reopened,
        structural: &[Matcher::ClassContains("ReopenedEvent")],
        text: &["reopened this"],
        marker: None,
    },
];

/// The rule for `category`. Every category has exactly one.
pub fn rule_for(category: Category) -> Option<&'static Rule> {
    RULES.iter().find(|r| r.category == category)
}

/// Every class fragment the structural phase looks for.
pub fn class_fragments() -> impl Iterator<Item = &'static str> {
    RULES
        .iter()
        .flat_map(|rule| rule.structural.iter())
        .map(|matcher| match matcher {
            Matcher::ClassContains(fragment) => *fragment,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_exactly_one_rule() {
        assert_eq!(RULES.len(), Category::COUNT);
        for category in Category::ALL {
            let count = RULES.iter().filter(|r| r.category == category).count();
            assert_eq!(count, 1, "{} should have one rule", category);
            assert!(rule_for(category).is_some());
        }
    }

    #[test]
    fn test_rules_are_in_category_order() {
        let order: Vec<_> = RULES.iter().map(|r| r.category).collect();
        assert_eq!(order, Category::ALL.to_vec());
    }

    #[test]
    fn test_every_rule_has_structural_and_text_patterns() {
        for rule in RULES {
            assert!(!rule.structural.is_empty(), "{}", rule.category);
            assert!(!rule.text.is_empty(), "{}", rule.category);
        }
    }

    #[test]
    fn test_text_patterns_are_lowercase() {
        for rule in RULES {
            for pattern in rule.text {
                assert_eq!(*pattern, pattern.to_lowercase());
            }
        }
    }

    #[test]
    fn test_disambiguating_markers() {
        let marker = |c| rule_for(c).and_then(|r| r.marker);
        assert_eq!(marker(Category::Labeled), Some("octicon-tag"));
        assert_eq!(marker(Category::Unlabeled), Some("octicon-tag"));
        assert_eq!(marker(Category::Assigned), Some("octicon-person"));
        assert_eq!(marker(Category::Milestoned), Some("octicon-milestone"));
        assert_eq!(marker(Category::Closed), Some("octicon-issue-closed"));
        assert_eq!(marker(Category::Renamed), None);
    }

    #[test]
    fn test_class_fragments_cover_every_matcher() {
        let fragments: Vec<_> = class_fragments().collect();
        assert!(fragments.contains(&"renamed"));
        assert!(fragments.contains(&"ReopenedEvent"));
        assert_eq!(
            fragments.len(),
            RULES.iter().map(|r| r.structural.len()).sum::<usize>()
        );
    }
}
