//! Entry location: finding timeline entries and the wrapper each one is
//! shown or hidden through.

use crate::dom::{Document, NodeId};

/// Attribute marking a timeline entry.
pub const ENTRY_ATTR: &str = "data-timeline-event-id";

/// Attribute marking the node whose visibility is toggled for an entry.
pub const WRAPPER_ATTR: &str = "data-wrapper-timeline-id";

/// Every node at or below `root` carrying [`ENTRY_ATTR`], in document order.
pub fn locate(doc: &Document, root: NodeId) -> Vec<NodeId> {
    doc.descendants(root)
        .filter(|id| doc.has_attr(*id, ENTRY_ATTR))
        .collect()
}

/// Nearest node at or above `entry` carrying [`WRAPPER_ATTR`], or `entry`
/// itself when there is none.
///
/// Stops at the document root, and after `doc.len()` steps regardless, so a
/// corrupted parent chain cannot make it spin.
pub fn wrapper_of(doc: &Document, entry: NodeId) -> NodeId {
    let root = doc.root();
    let mut current = Some(entry);
    let mut steps = 0;

    while let Some(id) = current {
        if id == root || steps >= doc.len() {
            break;
        }
        if doc.has_attr(id, WRAPPER_ATTR) {
            return id;
        }
        current = doc.parent(id);
        steps += 1;
    }

    entry
}
