//! In-memory document tree edited by the interpreter.
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by [`NodeId`].
//! Parent links are plain ids into the same arena, so detaching a subtree frees
//! its slots without leaving anything that points into freed memory: a stale
//! `NodeId` simply stops resolving.

use crate::error::SessionError;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Handle to a node stored in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A named element with its attribute map. Attribute keys are unique.
    Element {
        name: String,
        attributes: BTreeMap<String, String>,
    },
    /// A text node carrying character content.
    Text(String),
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A tree with exactly one root element.
///
/// Slots freed by [`Document::remove_from_parent`] are never reused, so the
/// arena grows with the number of nodes ever created in a session, not the
/// number currently attached. In exchange a removed node's id can never start
/// naming a different node.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Option<NodeData>>,
    root: NodeId,
}

impl Document {
    /// Create a document whose root element is called `root_name`.
    ///
    /// Fails when the name is not a valid element name (empty, or containing
    /// anything but ASCII letters, digits and underscores).
    pub fn new(root_name: &str) -> Result<Self, SessionError> {
        if !is_element_name(root_name) {
            return Err(SessionError::Collaborator(format!(
                "\"{}\" is not a valid root element name",
                root_name
            )));
        }
        let root = NodeData {
            kind: NodeKind::Element {
                name: root_name.to_string(),
                attributes: BTreeMap::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        Ok(Self {
            nodes: vec![Some(root)],
            root: NodeId(0),
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> Option<NodeId> {
        let id = NodeId(self.nodes.len());
        self.data_mut(parent)?.children.push(id);
        self.nodes.push(Some(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        }));
        Some(id)
    }

    /// Append a new element named `name` to `parent`.
    ///
    /// Returns `None` if `parent` is not part of the document.
    pub fn create_element(&mut self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.push(
            parent,
            NodeKind::Element {
                name: name.to_string(),
                attributes: BTreeMap::new(),
            },
        )
    }

    /// Append a text node to `parent`.
    pub fn create_text(&mut self, parent: NodeId, content: &str) -> Option<NodeId> {
        self.push(parent, NodeKind::Text(content.to_string()))
    }

    /// Set (or replace) an attribute on an element.
    ///
    /// Returns `false` when `node` does not exist or is a text node.
    pub fn set_attribute(&mut self, node: NodeId, key: &str, value: &str) -> bool {
        match self.data_mut(node) {
            Some(NodeData {
                kind: NodeKind::Element { attributes, .. },
                ..
            }) => {
                attributes.insert(key.to_string(), value.to_string());
                true
            }
            _ => false,
        }
    }

    /// All elements called `name`, in document pre-order starting at the root.
    pub fn find_by_name(&self, name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(data) = self.data(id) else { continue };
            if let NodeKind::Element { name: n, .. } = &data.kind {
                if n == name {
                    found.push(id);
                }
            }
            stack.extend(data.children.iter().rev().copied());
        }
        found
    }

    /// Detach `node` from its parent and free its whole subtree.
    ///
    /// Returns `false` for the root (which has no parent) and for ids that are
    /// no longer part of the document.
    pub fn remove_from_parent(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.parent(node) else {
            return false;
        };
        if let Some(data) = self.data_mut(parent) {
            data.children.retain(|c| *c != node);
        }
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(data) = self.nodes.get_mut(id.0).and_then(Option::take) {
                stack.extend(data.children);
            }
        }
        true
    }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.data(node).map(|d| &d.kind)
    }

    /// Element name of `node`; `None` for text nodes and stale ids.
    pub fn name(&self, node: NodeId) -> Option<&str> {
        match self.kind(node)? {
            NodeKind::Element { name, .. } => Some(name),
            NodeKind::Text(_) => None,
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node)?.parent
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.data(node)?.children.first().copied()
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.data(node).map_or(&[], |d| d.children.as_slice())
    }

    /// Attributes of an element, sorted by key. Empty for text nodes.
    pub fn attributes(&self, node: NodeId) -> impl Iterator<Item = (&str, &str)> {
        let map = match self.kind(node) {
            Some(NodeKind::Element { attributes, .. }) => Some(attributes),
            _ => None,
        };
        map.into_iter()
            .flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Content of the first child when that child is a text node.
    pub fn first_text(&self, node: NodeId) -> Option<&str> {
        match self.kind(self.first_child(node)?)? {
            NodeKind::Text(t) => Some(t),
            NodeKind::Element { .. } => None,
        }
    }

    /// Number of nodes reachable from the root, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Render the document as XML text.
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\" ?>\n");
        self.serialize_node(self.root, 0, &mut out);
        out
    }

    /// Serialize the document to `path`.
    pub fn serialize(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_xml())
    }

    fn serialize_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(data) = self.data(id) else { return };
        push_indent(out, depth);
        match &data.kind {
            NodeKind::Text(t) => {
                escape_into(t, out);
                out.push('\n');
            }
            NodeKind::Element { name, attributes } => {
                out.push('<');
                out.push_str(name);
                for (k, v) in attributes {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    escape_into(v, out);
                    out.push('"');
                }
                if data.children.is_empty() {
                    out.push_str("/>\n");
                    return;
                }
                // Text-only elements stay on one line.
                if let [only] = data.children.as_slice() {
                    if let Some(NodeKind::Text(t)) = self.kind(*only) {
                        out.push('>');
                        escape_into(t, out);
                        out.push_str("</");
                        out.push_str(name);
                        out.push_str(">\n");
                        return;
                    }
                }
                out.push_str(">\n");
                for child in &data.children {
                    self.serialize_node(*child, depth + 1, out);
                }
                push_indent(out, depth);
                out.push_str("</");
                out.push_str(name);
                out.push_str(">\n");
            }
        }
    }
}

/// Valid element names: non-empty ASCII word characters.
pub fn is_element_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn escape_into(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new("document").unwrap();
        let root = doc.root();
        let a = doc.create_element(root, "a").unwrap();
        let b = doc.create_element(a, "b").unwrap();
        let a2 = doc.create_element(root, "a").unwrap();
        (doc, a, b, a2)
    }

    #[test]
    fn test_new_rejects_invalid_root_name() {
        assert!(matches!(
            Document::new("bad name"),
            Err(SessionError::Collaborator(_))
        ));
        assert!(Document::new("").is_err());
    }

    #[test]
    fn test_find_by_name_is_preorder() {
        let (doc, a, b, a2) = sample();
        assert_eq!(doc.find_by_name("a"), vec![a, a2]);
        assert_eq!(doc.find_by_name("b"), vec![b]);
        assert!(doc.find_by_name("zzz").is_empty());
        assert_eq!(doc.find_by_name("document"), vec![doc.root()]);
    }

    #[test]
    fn test_parent_and_children_links() {
        let (doc, a, b, a2) = sample();
        assert_eq!(doc.parent(b), Some(a));
        assert_eq!(doc.parent(doc.root()), None);
        assert_eq!(doc.children(doc.root()), &[a, a2]);
        assert_eq!(doc.first_child(a), Some(b));
        assert_eq!(doc.name(b), Some("b"));
    }

    #[test]
    fn test_remove_frees_whole_subtree() {
        let (mut doc, a, b, _a2) = sample();
        assert_eq!(doc.node_count(), 4);
        assert!(doc.remove_from_parent(a));
        assert_eq!(doc.node_count(), 2);
        assert!(doc.find_by_name("b").is_empty());
        assert_eq!(doc.name(b), None);
        assert_eq!(doc.parent(b), None);
        // removing again is a no-op
        assert!(!doc.remove_from_parent(a));
    }

    #[test]
    fn test_removed_ids_are_not_reused() {
        let (mut doc, a, b, _a2) = sample();
        assert!(doc.remove_from_parent(a));
        let fresh = doc.create_element(doc.root(), "fresh").unwrap();
        assert_ne!(fresh, a);
        assert_ne!(fresh, b);
        assert_eq!(doc.name(a), None);
        assert_eq!(doc.name(fresh), Some("fresh"));
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let (mut doc, ..) = sample();
        let root = doc.root();
        assert!(!doc.remove_from_parent(root));
        assert_eq!(doc.node_count(), 4);
    }

    #[test]
    fn test_attributes_replace_existing_key() {
        let (mut doc, a, ..) = sample();
        assert!(doc.set_attribute(a, "k", "1"));
        assert!(doc.set_attribute(a, "k", "2"));
        assert!(doc.set_attribute(a, "j", "0"));
        let attrs: Vec<_> = doc.attributes(a).collect();
        assert_eq!(attrs, vec![("j", "0"), ("k", "2")]);
    }

    #[test]
    fn test_set_attribute_on_text_node_fails() {
        let (mut doc, a, ..) = sample();
        let t = doc.create_text(a, "hi").unwrap();
        assert!(!doc.set_attribute(t, "k", "v"));
    }

    #[test]
    fn test_first_text_only_when_first_child_is_text() {
        let (mut doc, a, b, a2) = sample();
        doc.create_text(b, "hello").unwrap();
        assert_eq!(doc.first_text(b), Some("hello"));
        assert_eq!(doc.first_text(a), None);
        assert_eq!(doc.first_text(a2), None);
    }

    #[test]
    fn test_to_xml_escapes_and_nests() {
        let mut doc = Document::new("r").unwrap();
        let root = doc.root();
        let c = doc.create_element(root, "c").unwrap();
        doc.create_text(c, "a<b").unwrap();
        doc.set_attribute(root, "q", "\"x\"");
        doc.create_element(root, "e").unwrap();

        let xml = doc.to_xml();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\" ?>\n\
             <r q=\"&quot;x&quot;\">\n  <c>a&lt;b</c>\n  <e/>\n</r>\n"
        );
    }

    #[test]
    fn test_serialize_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xml");
        let (doc, ..) = sample();
        doc.serialize(&path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, doc.to_xml());
    }

    #[test]
    fn test_serialize_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.xml");
        let (doc, ..) = sample();
        assert!(doc.serialize(&path).is_err());
    }
}
