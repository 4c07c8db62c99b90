//! HTML in and out of the [`Document`] arena.
//!
//! Parsing goes through `scraper` and serialization through html5ever's own
//! serializer, so both directions follow the same rules a browser uses.
//! Parsing runs with scripting enabled, which makes `<noscript>` content raw
//! text; the serializer is run with the same setting so it is written back
//! verbatim. `inner_html` output is what a page script would see in
//! `innerHTML`.

use crate::dom::{Document, NodeId, NodeKind};
use html5ever::serialize::{serialize, Serialize, SerializeOpts, Serializer, TraversalScope};
use scraper::{Html, Node};
use std::io;

/// Parse a full HTML page. Never fails; broken markup is repaired.
pub fn parse(source: &str) -> Document {
    let html = Html::parse_document(source);
    let mut doc = Document::new();

    let mut stack = Vec::new();
    let top: Vec<_> = html.tree.root().children().collect();
    for child in top.into_iter().rev() {
        stack.push((child, doc.root()));
    }

    while let Some((node, parent)) = stack.pop() {
        let kind = match node.value() {
            Node::Element(el) => NodeKind::Element {
                name: el.name.clone(),
                attrs: el
                    .attrs
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_string()))
                    .collect(),
            },
            Node::Text(text) => NodeKind::Text(String::from(&**text)),
            Node::Comment(comment) => NodeKind::Comment(String::from(&**comment)),
            Node::Doctype(doctype) => NodeKind::Doctype(doctype.name().to_string()),
            _ => continue,
        };
        let id = doc.append(parent, kind);
        let children: Vec<_> = node.children().collect();
        for child in children.into_iter().rev() {
            stack.push((child, id));
        }
    }

    doc
}

/// Serialize the whole document.
pub fn to_html(doc: &Document) -> String {
    inner_html(doc, doc.root())
}

/// Serialized markup of everything below `id`, excluding `id` itself.
pub fn inner_html(doc: &Document, id: NodeId) -> String {
    let parent = match doc.kind(id) {
        NodeKind::Element { name, .. } => Some(name.clone()),
        _ => None,
    };
    write(doc, id, TraversalScope::ChildrenOnly(parent))
}

/// Serialized markup of `id` including its own tag.
pub fn outer_html(doc: &Document, id: NodeId) -> String {
    write(doc, id, TraversalScope::IncludeNode)
}

fn write(doc: &Document, id: NodeId, scope: TraversalScope) -> String {
    let opts = SerializeOpts {
        scripting_enabled: true,
        traversal_scope: scope,
        create_missing_parent: false,
    };
    let mut buf = Vec::new();
    if let Err(e) = serialize(&mut buf, &Subtree { doc, id }, opts) {
        tracing::warn!(error = %e, "html serialization stopped early");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// A node of the arena as seen by html5ever's serializer.
struct Subtree<'a> {
    doc: &'a Document,
    id: NodeId,
}

enum Step {
    Open(NodeId),
    Close(NodeId),
}

impl Serialize for Subtree<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        let doc = self.doc;
        let mut stack = match traversal_scope {
            TraversalScope::IncludeNode => vec![Step::Open(self.id)],
            TraversalScope::ChildrenOnly(_) => doc
                .children(self.id)
                .iter()
                .rev()
                .map(|child| Step::Open(*child))
                .collect(),
        };

        while let Some(step) = stack.pop() {
            match step {
                Step::Close(id) => {
                    if let NodeKind::Element { name, .. } = doc.kind(id) {
                        serializer.end_elem(name.clone())?;
                    }
                }
                Step::Open(id) => {
                    match doc.kind(id) {
                        NodeKind::Element { name, attrs } => {
                            serializer.start_elem(
                                name.clone(),
                                attrs.iter().map(|(name, value)| (name, value.as_str())),
                            )?;
                            stack.push(Step::Close(id));
                        }
                        NodeKind::Document => {}
                        NodeKind::Doctype(name) => {
                            serializer.write_doctype(name)?;
                            continue;
                        }
                        NodeKind::Text(text) => {
                            serializer.write_text(text)?;
                            continue;
                        }
                        NodeKind::Comment(text) => {
                            serializer.write_comment(text)?;
                            continue;
                        }
                    }
                    stack.extend(doc.children(id).iter().rev().map(|child| Step::Open(*child)));
                }
            }
        }
        Ok(())
    }
}
