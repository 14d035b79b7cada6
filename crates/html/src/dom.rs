//! Arena document tree.
//!
//! Nodes live in a single arena and are referenced by `NodeId` handles that stay valid
//! for the life of the document. Insertion and deletion only relink parent/child lists,
//! so a handle held by a traversal cursor never dangles: a deleted node simply becomes
//! unreachable from the root.
//!
//! Invariants:
//! - `NodeId::ROOT` is always the document node and cannot be moved or deleted.
//! - A node has at most one parent, and the parent lists it exactly once.
//! - Deleted nodes are never re-attached.
//! - `Slot::attached` is true exactly when the node is reachable from the root. It is
//!   updated for the moved subtree on every attach and delete, so lookups are O(1).

use std::sync::Arc;

use crate::keyword::HtmlName;
use crate::types::QuoteStyle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    name: Arc<str>,
    value: Option<String>,
    quote: QuoteStyle,
}

impl Attribute {
    pub fn new(name: impl Into<Arc<str>>, value: Option<String>, quote: QuoteStyle) -> Self {
        Self {
            name: name.into(),
            value,
            quote,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decoded value; `None` for a bare attribute.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn quote(&self) -> QuoteStyle {
        self.quote
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }
}

#[derive(Clone, Debug)]
pub struct Element {
    name: Arc<str>,
    keyword: HtmlName,
    attributes: Vec<Attribute>,
}

impl Element {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        let name = name.into();
        Self {
            keyword: HtmlName::from_tag(&name),
            name,
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(name: impl Into<Arc<str>>, attributes: Vec<Attribute>) -> Self {
        let mut element = Self::new(name);
        element.attributes = attributes;
        element
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keyword(&self) -> HtmlName {
        self.keyword
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// First attribute with this name (ASCII case-insensitive).
    pub fn find_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn find_attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Value of the first attribute with this name. Absent and bare attributes both
    /// yield `None`; `Some("")` means the attribute was written with an empty value.
    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.find_attribute(name).and_then(Attribute::value)
    }

    /// Appends an attribute. Does not check for an existing one with the same name.
    pub fn add_attribute(&mut self, name: impl Into<Arc<str>>, value: &str, quote: QuoteStyle) {
        self.attributes
            .push(Attribute::new(name, Some(value.to_string()), quote));
    }

    /// Removes the first attribute with this name. Returns whether one was removed.
    pub fn delete_attribute(&mut self, name: &str) -> bool {
        match self
            .attributes
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name))
        {
            Some(index) => {
                self.attributes.remove(index);
                true
            }
            None => false,
        }
    }
}

#[derive(Clone, Debug)]
pub enum NodeData {
    Document,
    Doctype(String),
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug)]
struct Slot {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attached: bool,
    deleted: bool,
}

#[derive(Debug)]
pub struct Document {
    nodes: Vec<Slot>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Slot {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
                attached: true,
                deleted: false,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        self.nodes.get(id.index())
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        self.nodes.get_mut(id.index())
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.slot(id).map(|s| &s.data)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.data(id)? {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.slot_mut(id)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn keyword(&self, id: NodeId) -> Option<HtmlName> {
        self.element(id).map(Element::keyword)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map(|s| s.children.as_slice()).unwrap_or(&[])
    }

    /// Parent chain from `id` (exclusive) up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Whether the node is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.slot(id).is_some_and(|s| s.attached)
    }

    /// Creates an unattached node.
    pub fn create_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Slot {
            data,
            parent: None,
            children: Vec::new(),
            attached: false,
            deleted: false,
        });
        id
    }

    /// Creates an unattached element; attach it with `append_child` or `insert_before`.
    pub fn new_element(&mut self, name: impl Into<Arc<str>>) -> NodeId {
        self.create_node(NodeData::Element(Element::new(name)))
    }

    fn can_attach(&self, parent: NodeId, child: NodeId) -> bool {
        let Some(parent_slot) = self.slot(parent) else {
            return false;
        };
        let Some(child_slot) = self.slot(child) else {
            return false;
        };
        let parent_accepts = matches!(parent_slot.data, NodeData::Document | NodeData::Element(_));
        if !parent_accepts
            || child == NodeId::ROOT
            || child == parent
            || child_slot.parent.is_some()
            || child_slot.deleted
        {
            return false;
        }
        // A leaf cannot be an ancestor of `parent`.
        child_slot.children.is_empty() || !self.ancestors(parent).any(|a| a == child)
    }

    /// Sets the attached flag on `id` and its whole subtree.
    fn mark_subtree(&mut self, id: NodeId, attached: bool) {
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            let slot = &mut self.nodes[node.index()];
            slot.attached = attached;
            stack.extend_from_slice(&slot.children);
        }
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        let attached = self.nodes[parent.index()].attached;
        if self.nodes[child.index()].children.is_empty() {
            self.nodes[child.index()].attached = attached;
        } else {
            self.mark_subtree(child, attached);
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.can_attach(parent, child) {
            return false;
        }
        self.nodes[parent.index()].children.push(child);
        self.link(parent, child);
        true
    }

    /// Inserts an unattached `node` as the immediately preceding sibling of `anchor`.
    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) -> bool {
        let Some(parent) = self.parent(anchor) else {
            return false;
        };
        if !self.can_attach(parent, node) {
            return false;
        }
        let siblings = &mut self.nodes[parent.index()].children;
        let Some(position) = siblings.iter().position(|&c| c == anchor) else {
            return false;
        };
        siblings.insert(position, node);
        self.link(parent, node);
        true
    }

    /// Detaches `id` and its subtree from the tree. Handles into the subtree stay valid
    /// but are no longer attached.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        if id == NodeId::ROOT {
            return false;
        }
        let Some(parent) = self.parent(id) else {
            return false;
        };
        self.nodes[parent.index()].children.retain(|&c| c != id);
        let slot = &mut self.nodes[id.index()];
        slot.parent = None;
        slot.deleted = true;
        self.mark_subtree(id, false);
        true
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            if let Some(NodeData::Text(text)) = self.data(node) {
                out.push_str(text);
            }
            stack.extend(self.children(node).iter().rev());
        }
        out
    }

    /// Attached elements in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![NodeId::ROOT];
        while let Some(node) = stack.pop() {
            if self.element(node).is_some() {
                out.push(node);
            }
            stack.extend(self.children(node).iter().rev());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_body() -> (Document, NodeId) {
        let mut doc = Document::new();
        let body = doc.new_element("body");
        assert!(doc.append_child(doc.root(), body));
        (doc, body)
    }

    #[test]
    fn insert_before_places_node_as_preceding_sibling() {
        let (mut doc, body) = doc_with_body();
        let first = doc.new_element("p");
        let img = doc.new_element("img");
        doc.append_child(body, first);
        doc.append_child(body, img);

        let link = doc.new_element("link");
        assert!(doc.insert_before(img, link));
        assert_eq!(doc.children(body), &[first, link, img]);
        assert_eq!(doc.parent(link), Some(body));
    }

    #[test]
    fn insert_before_rejects_detached_anchor_and_attached_node() {
        let (mut doc, body) = doc_with_body();
        let loose = doc.new_element("img");
        let link = doc.new_element("link");
        assert!(!doc.insert_before(loose, link), "anchor has no parent");

        let img = doc.new_element("img");
        doc.append_child(body, img);
        assert!(!doc.insert_before(img, body), "node already attached");
        assert!(!doc.insert_before(img, NodeId::ROOT), "root cannot move");
    }

    #[test]
    fn delete_node_detaches_subtree() {
        let (mut doc, body) = doc_with_body();
        let script = doc.new_element("script");
        doc.append_child(body, script);
        let text = doc.create_node(NodeData::Text("var x;".into()));
        doc.append_child(script, text);

        assert!(doc.delete_node(script));
        assert!(doc.children(body).is_empty());
        assert!(!doc.is_attached(script));
        assert!(!doc.is_attached(text));
        assert!(!doc.delete_node(script), "second delete is a no-op");
        assert!(!doc.append_child(body, script), "deleted nodes stay deleted");
    }

    #[test]
    fn append_child_refuses_cycles() {
        let (mut doc, body) = doc_with_body();
        let div = doc.new_element("div");
        doc.append_child(body, div);
        let orphan = doc.new_element("span");
        let bold = doc.new_element("b");
        assert!(doc.append_child(orphan, bold));
        assert!(!doc.append_child(div, body), "body already has a parent");
        assert!(!doc.append_child(div, div));
    }

    #[test]
    fn attached_flag_follows_subtree_moves() {
        let (mut doc, body) = doc_with_body();
        let div = doc.new_element("div");
        let span = doc.new_element("span");
        assert!(doc.append_child(div, span));
        assert!(!doc.is_attached(span), "parent not in the tree yet");

        assert!(doc.append_child(body, div));
        assert!(doc.is_attached(div));
        assert!(doc.is_attached(span));

        let inner = doc.new_element("b");
        assert!(doc.append_child(span, inner));
        assert!(doc.is_attached(inner));

        assert!(doc.delete_node(div));
        assert!(!doc.is_attached(span));
        assert!(!doc.is_attached(inner));

        let late = doc.new_element("i");
        assert!(doc.append_child(span, late), "detached parents still accept children");
        assert!(!doc.is_attached(late));
    }

    #[test]
    fn subtree_cannot_be_attached_below_itself() {
        let mut doc = Document::new();
        let outer = doc.new_element("div");
        let inner = doc.new_element("span");
        assert!(doc.append_child(outer, inner));
        assert!(!doc.append_child(inner, outer));
    }

    #[test]
    fn stale_handles_are_harmless() {
        let mut doc = Document::new();
        let bogus = NodeId(42);
        assert!(doc.element(bogus).is_none());
        assert!(doc.children(bogus).is_empty());
        assert!(!doc.delete_node(bogus));
        assert!(!doc.is_attached(bogus));
    }

    #[test]
    fn attribute_lookup_distinguishes_bare_from_empty() {
        let mut img = Element::with_attributes(
            "img",
            vec![
                Attribute::new("alt", None, QuoteStyle::Double),
                Attribute::new("src", Some(String::new()), QuoteStyle::Double),
            ],
        );
        assert!(img.find_attribute("alt").is_some());
        assert_eq!(img.attribute_value("alt"), None);
        assert_eq!(img.attribute_value("SRC"), Some(""));

        img.add_attribute("fetchpriority", "low", QuoteStyle::Double);
        if let Some(priority) = img.find_attribute_mut("fetchpriority") {
            priority.set_value("high");
        }
        assert_eq!(img.attribute_value("fetchpriority"), Some("high"));
        assert!(img.delete_attribute("alt"));
        assert!(!img.delete_attribute("alt"));
        assert_eq!(img.attributes().len(), 2);
    }
}
