//! # Category Classification
//!
//! Assigns an entry at most one [`Category`] by scanning [`RULES`] three
//! times, each pass over the whole table before the next begins:
//!
//! 1. **Structural**: the wrapper or any element below it matches one of a
//!    rule's structural matchers. These encode the originating event type, so
//!    they beat any text.
//! 2. **Disambiguated text**: rules that carry a marker. A text pattern hit
//!    only counts when the marker also appears in the wrapper markup. This is
//!    what tells "added the bug label" apart from "added this to Project".
//! 3. **Plain text**: the remaining rules; first pattern hit wins.
//!
//! Text tests are plain case-insensitive substring checks. "renamed" will
//! match inside a longer unrelated word, and that looseness is kept.
//!
//! Classification reads the document only; calling it twice on unchanged
//! content gives the same answer.

use crate::dom::{Document, NodeId};
use crate::html::inner_html;
use crate::locate::wrapper_of;
use crate::model::Category;
use crate::rules::{Matcher, Rule, RULES};

/// Category of the entry, judged on its wrapper's content.
pub fn classify(doc: &Document, entry: NodeId) -> Option<Category> {
    classify_wrapper(doc, wrapper_of(doc, entry))
}

/// Category for an already-resolved wrapper.
pub fn classify_wrapper(doc: &Document, wrapper: NodeId) -> Option<Category> {
    classify_with(doc, wrapper, RULES)
}

/// Same as [`classify_wrapper`] against an arbitrary table.
pub fn classify_with(doc: &Document, wrapper: NodeId, rules: &[Rule]) -> Option<Category> {
    if let Some(rule) = rules.iter().find(|r| matches_structure(doc, wrapper, r)) {
        return Some(rule.category);
    }

    let text = doc.text_content(wrapper).to_lowercase();
    let mut markup: Option<String> = None;

    for rule in rules {
        let Some(marker) = rule.marker else {
            continue;
        };
        if rule.text.iter().any(|p| text.contains(p)) {
            let markup = markup.get_or_insert_with(|| inner_html(doc, wrapper));
            if markup.contains(marker) {
                return Some(rule.category);
            }
        }
    }

    rules
        .iter()
        .filter(|r| r.marker.is_none())
        .find(|r| r.text.iter().any(|p| text.contains(p)))
        .map(|r| r.category)
}

fn matches_structure(doc: &Document, wrapper: NodeId, rule: &Rule) -> bool {
    rule.structural.iter().any(|matcher| {
        doc.descendants(wrapper)
            .any(|node| matcher_hits(doc, node, matcher))
    })
}

fn matcher_hits(doc: &Document, node: NodeId, matcher: &Matcher) -> bool {
    match matcher {
        Matcher::ClassContains(fragment) => doc
            .attr(node, "class")
            .is_some_and(|class| class.contains(fragment)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse;
    use crate::locate::locate;

    /// Wraps `body` in the usual wrapper/entry pair and classifies the entry.
    fn classify_body(body: &str) -> Option<Category> {
        let source = format!(
            r#"<div data-wrapper-timeline-id="1"><div data-timeline-event-id="1">{}</div></div>"#,
            body
        );
        let doc = parse(&source);
        let entry = locate(&doc, doc.root())[0];
        classify(&doc, entry)
    }

    #[test]
    fn test_added_to_project_by_selector() {
        assert_eq!(
            classify_body(r#"<div class="AddedToProjectV2Event">Added to project</div>"#),
            Some(Category::AddedToProject)
        );
    }

    #[test]
    fn test_added_to_project_by_text() {
        assert_eq!(
            classify_body("User added this to Project Board"),
            Some(Category::AddedToProject)
        );
    }

    #[test]
    fn test_labeled_with_tag_icon() {
        assert_eq!(
            classify_body(r#"<svg class="octicon-tag"></svg> User added the bug label"#),
            Some(Category::Labeled)
        );
    }

    #[test]
    fn test_unlabeled_with_tag_icon() {
        assert_eq!(
            classify_body(r#"<svg class="octicon-tag"></svg> User removed the bug label"#),
            Some(Category::Unlabeled)
        );
    }

    #[test]
    fn test_assigned_and_self_assigned() {
        assert_eq!(
            classify_body(r#"<svg class="octicon-person"></svg> User assigned this to developer"#),
            Some(Category::Assigned)
        );
        assert_eq!(
            classify_body(r#"<svg class="octicon-person"></svg> User self-assigned this"#),
            Some(Category::Assigned)
        );
    }

    #[test]
    fn test_renamed_case_insensitive() {
        assert_eq!(
            classify_body(r#"User changed the title from "Old" to "New""#),
            Some(Category::Renamed)
        );
        assert_eq!(
            classify_body(r#"User CHANGED THE TITLE from "Old" to "New""#),
            Some(Category::Renamed)
        );
    }

    #[test]
    fn test_closed_with_icon_and_reopened_by_text() {
        assert_eq!(
            classify_body(
                r#"<svg class="octicon-issue-closed"></svg> User closed this as completed"#
            ),
            Some(Category::Closed)
        );
        assert_eq!(
            classify_body("User reopened this issue"),
            Some(Category::Reopened)
        );
    }

    #[test]
    fn test_cross_referenced_and_moved() {
        assert_eq!(
            classify_body("User mentioned this in #123"),
            Some(Category::CrossReferenced)
        );
        assert_eq!(
            classify_body("User moved this to In Progress"),
            Some(Category::MovedInProject)
        );
        assert_eq!(
            classify_body("User set the Priority to High"),
            Some(Category::StatusChanged)
        );
    }

    #[test]
    fn test_milestoned_by_selector() {
        assert_eq!(
            classify_body(r#"<div class="MilestonedEvent">User added to milestone v1.0</div>"#),
            Some(Category::Milestoned)
        );
    }

    #[test]
    fn test_milestone_text_is_not_added_to_project() {
        let body = r#"<svg aria-hidden="true" class="octicon octicon-milestone" viewBox="0 0 16 16">
                <path d="M7.75 0a.75.75 0 0 1 .75.75V3h3.634c.414 0"></path></svg>
            <span>User</span> added this to the <a href="/milestone/1">Test milestone</a> milestone"#;
        assert_eq!(classify_body(body), Some(Category::Milestoned));
    }

    #[test]
    fn test_unrelated_text_is_unclassified() {
        assert_eq!(classify_body("Some random unrelated comment"), None);
        assert_eq!(classify_body(""), None);
    }

    #[test]
    fn test_structure_beats_conflicting_text() {
        assert_eq!(
            classify_body(r#"<div class="ReopenedEvent">User changed the title and closed this</div>"#),
            Some(Category::Reopened)
        );
        assert_eq!(
            classify_body(
                r#"<span class="TimelineItem-RenamedTitleEvent"><svg class="octicon-tag"></svg>added</span>"#
            ),
            Some(Category::Renamed)
        );
    }

    #[test]
    fn test_marker_text_without_marker_falls_through() {
        // "added" alone is Labeled only with the tag icon; without it nothing matches.
        assert_eq!(classify_body("User added a comment"), None);
        // With no person icon, "assigned" cannot be Assigned.
        assert_eq!(classify_body("User assigned this"), None);
        // Falls through to the plain-text AddedToProject rule instead of Labeled.
        assert_eq!(
            classify_body("User added this to Roadmap"),
            Some(Category::AddedToProject)
        );
    }

    #[test]
    fn test_marker_must_match_rule() {
        // Person icon does not satisfy the tag requirement.
        assert_eq!(
            classify_body(r#"<svg class="octicon-person"></svg> User removed the bug label"#),
            None
        );
    }

    #[test]
    fn test_structural_overlaps_follow_table_order() {
        assert_eq!(
            classify_body(r#"<div class="ProjectV2ItemStatusChangedEvent">set the status</div>"#),
            Some(Category::MovedInProject)
        );
        assert_eq!(
            classify_body(r#"<div class="UnlabeledEvent">removed</div>"#),
            Some(Category::Labeled)
        );
    }

    #[test]
    fn test_structural_match_on_wrapper_itself() {
        let doc = parse(
            r#"<div class="RenamedTitleEvent" data-wrapper-timeline-id="1"><span data-timeline-event-id="1">nothing textual</span></div>"#,
        );
        let entry = locate(&doc, doc.root())[0];
        assert_eq!(classify(&doc, entry), Some(Category::Renamed));
    }

    #[test]
    fn test_structural_match_is_case_sensitive() {
        assert_eq!(classify_body(r#"<div class="reopenedevent">x</div>"#), None);
    }

    #[test]
    fn test_substring_matching_keeps_false_positives() {
        assert_eq!(
            classify_body("Someone reset the cache"),
            Some(Category::StatusChanged)
        );
    }

    #[test]
    fn test_classify_is_pure() {
        let doc = parse(
            r#"<div data-wrapper-timeline-id="1"><div data-timeline-event-id="1"><svg class="octicon-tag"></svg>User added label</div></div>"#,
        );
        let entry = locate(&doc, doc.root())[0];
        let first = classify(&doc, entry);
        for _ in 0..3 {
            assert_eq!(classify(&doc, entry), first);
        }
        assert_eq!(first, Some(Category::Labeled));
    }

    #[test]
    fn test_custom_table() {
        static ONLY_CLOSED: &[Rule] = &[Rule {
            category: Category::Closed,
            structural: &[Matcher::ClassContains("Shut")],
            text: &["shut"],
            marker: None,
        }];
        let doc = parse(r#"<div data-timeline-event-id="1">User SHUT it</div>"#);
        let entry = locate(&doc, doc.root())[0];
        assert_eq!(classify_with(&doc, entry, ONLY_CLOSED), Some(Category::Closed));
        assert_eq!(classify_with(&doc, entry, &[]), None);
    }
}
