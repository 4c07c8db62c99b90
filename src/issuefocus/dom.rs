//! # Document Model
//!
//! A minimal arena-backed node tree standing in for the host page. The engine
//! only ever reads structure and text from it and toggles a class on
//! wrappers; it never creates, removes or reorders nodes on a parsed page.
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`]. Parent
//! links make the upward wrapper walk a plain loop, and because every id is
//! an index into the arena the node count is a hard upper bound for any walk.
//!
//! Element and attribute names are kept as html5ever `QualName`s so a page
//! written back out keeps its namespaces (`xlink:href`, `xmlns:xlink`, SVG
//! and MathML elements). Attribute lookups by plain name only see attributes
//! without a namespace.
//!
//! Building trees by hand (`append_element`, `append_text`) is mostly useful
//! in tests; real pages come in through [`crate::html::parse`].

use html5ever::{namespace_url, ns, LocalName, QualName};

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Doctype(String),
    Element {
        name: QualName,
        attrs: Vec<(QualName, String)>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only its root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append an HTML element with un-namespaced attributes.
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let attrs = attrs
            .iter()
            .map(|(k, v)| (plain_name(k), v.to_string()))
            .collect();
        self.append(
            parent,
            NodeKind::Element {
                name: QualName::new(None, ns!(html), LocalName::from(tag)),
                attrs,
            },
        )
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, NodeKind::Text(text.to_string()))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Element { .. })
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Element { name, .. } => Some(&*name.local),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| is_plain(k, name))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Set or replace an attribute. No-op on non-element nodes.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id.0].kind {
            match attrs.iter_mut().find(|(k, _)| is_plain(k, name)) {
                Some(slot) => slot.1 = value.to_string(),
                None => attrs.push((plain_name(name), value.to_string())),
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id.0].kind {
            attrs.retain(|(k, _)| !is_plain(k, name));
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if !self.is_element(id) || self.has_class(id, class) {
            return;
        }
        let value = match self.attr(id, "class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim_end(), class)
            }
            _ => class.to_string(),
        };
        self.set_attr(id, "class", &value);
    }

    /// Drop `class` from the class list; an emptied list removes the
    /// attribute altogether.
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if !self.has_class(id, class) {
            return;
        }
        let remaining: Vec<&str> = self
            .attr(id, "class")
            .unwrap_or_default()
            .split_ascii_whitespace()
            .filter(|c| *c != class)
            .collect();
        if remaining.is_empty() {
            self.remove_attr(id, "class");
        } else {
            let value = remaining.join(" ");
            self.set_attr(id, "class", &value);
        }
    }

    /// Pre-order walk over `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: vec![id],
        }
    }

    /// Concatenated text of every text node under `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let NodeKind::Text(text) = self.kind(node) {
                out.push_str(text);
            }
        }
        out
    }

    /// First element carrying `name="value"`, in document order.
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .find(|id| self.attr(*id, name) == Some(value))
    }

    /// Address of the page, taken from `<link rel="canonical">` or the
    /// `og:url` meta tag. Used to tell a navigation from an in-page update.
    pub fn location(&self) -> Option<&str> {
        let mut og_url = None;
        for id in self.descendants(self.root()) {
            match self.tag(id) {
                Some("link") if self.attr(id, "rel") == Some("canonical") => {
                    if let Some(href) = self.attr(id, "href") {
                        return Some(href);
                    }
                }
                Some("meta") if og_url.is_none() && self.attr(id, "property") == Some("og:url") => {
                    og_url = self.attr(id, "content");
                }
                _ => {}
            }
        }
        og_url
    }
}

fn plain_name(name: &str) -> QualName {
    QualName::new(None, ns!(), LocalName::from(name))
}

fn is_plain(qual: &QualName, name: &str) -> bool {
    qual.ns == ns!() && &*qual.local == name
}

pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = doc.append_element(root, "div", &[("id", "outer"), ("class", "a b")]);
        let inner = doc.append_element(outer, "span", &[("id", "inner")]);
        doc.append_text(inner, "Hello ");
        let tail = doc.append_element(outer, "em", &[]);
        doc.append_text(tail, "world");
        (doc, outer, inner, tail)
    }

    #[test]
    fn test_descendants_are_in_document_order() {
        let (doc, outer, inner, tail) = sample();
        let elements: Vec<_> = doc
            .descendants(doc.root())
            .filter(|id| doc.is_element(*id))
            .collect();
        assert_eq!(elements, vec![outer, inner, tail]);
    }

    #[test]
    fn test_text_content_flattens_subtree() {
        let (doc, outer, inner, _) = sample();
        assert_eq!(doc.text_content(outer), "Hello world");
        assert_eq!(doc.text_content(inner), "Hello ");
    }

    #[test]
    fn test_parent_links() {
        let (doc, outer, inner, _) = sample();
        assert_eq!(doc.parent(inner), Some(outer));
        assert_eq!(doc.parent(outer), Some(doc.root()));
        assert_eq!(doc.parent(doc.root()), None);
    }

    #[test]
    fn test_class_list_add_and_remove() {
        let (mut doc, outer, inner, _) = sample();

        doc.add_class(outer, "hidden");
        assert_eq!(doc.attr(outer, "class"), Some("a b hidden"));
        doc.add_class(outer, "hidden");
        assert_eq!(doc.attr(outer, "class"), Some("a b hidden"));

        doc.remove_class(outer, "hidden");
        assert_eq!(doc.attr(outer, "class"), Some("a b"));

        doc.add_class(inner, "hidden");
        assert_eq!(doc.attr(inner, "class"), Some("hidden"));
        doc.remove_class(inner, "hidden");
        assert!(!doc.has_attr(inner, "class"));

        // Removing an absent class must not create the attribute.
        doc.remove_class(inner, "hidden");
        assert!(!doc.has_attr(inner, "class"));
    }

    #[test]
    fn test_has_class_matches_whole_tokens_only() {
        let (doc, outer, _, _) = sample();
        assert!(doc.has_class(outer, "a"));
        assert!(!doc.has_class(outer, "a b"));
        assert!(!doc.has_class(outer, "c"));
    }

    #[test]
    fn test_find_by_attr() {
        let (doc, _, inner, _) = sample();
        assert_eq!(doc.find_by_attr("id", "inner"), Some(inner));
        assert_eq!(doc.find_by_attr("id", "missing"), None);
    }

    #[test]
    fn test_namespaced_attributes_are_not_plain_lookups() {
        let mut doc = Document::new();
        let root = doc.root();
        let svg = doc.append(
            root,
            NodeKind::Element {
                name: QualName::new(None, ns!(svg), LocalName::from("use")),
                attrs: vec![(
                    QualName::new(None, ns!(xlink), LocalName::from("href")),
                    "#icon".to_string(),
                )],
            },
        );
        assert_eq!(doc.tag(svg), Some("use"));
        assert_eq!(doc.attr(svg, "href"), None);

        doc.set_attr(svg, "href", "#plain");
        assert_eq!(doc.attr(svg, "href"), Some("#plain"));
        match doc.kind(svg) {
            NodeKind::Element { attrs, .. } => assert_eq!(attrs.len(), 2),
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_location_prefers_canonical_link() {
        let mut doc = Document::new();
        let root = doc.root();
        let head = doc.append_element(root, "head", &[]);
        doc.append_element(head, "meta", &[("property", "og:url"), ("content", "https://og")]);
        doc.append_element(head, "link", &[("rel", "canonical"), ("href", "https://canon")]);
        assert_eq!(doc.location(), Some("https://canon"));

        let mut bare = Document::new();
        let root = bare.root();
        bare.append_element(root, "meta", &[("property", "og:url"), ("content", "https://og")]);
        assert_eq!(bare.location(), Some("https://og"));

        assert_eq!(Document::new().location(), None);
    }
}
