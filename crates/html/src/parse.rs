//! Streaming tree construction.
//!
//! Tokens are pulled from the tokenizer one at a time. Each is attached to the arena
//! before the next is scanned, and the observer is told about element boundaries in
//! document order:
//! - `start_element` fires right after the element (with its attributes) is attached.
//! - `end_element` fires when the element closes: by its end tag, implicitly when an
//!   end tag for an enclosing element arrives, immediately for void elements, or at
//!   end of input.
//!
//! Observers may edit the tree from inside any hook. The builder only keeps `NodeId`
//! handles on its open-element stack, so edits never invalidate it; nodes inserted
//! before the current element are behind the cursor and get no events.

use crate::dom::{Attribute, Document, Element, NodeData, NodeId};
use crate::tokenizer::Tokenizer;
use crate::types::{AtomId, Token};

/// Receives parse events. All hooks default to no-ops.
pub trait ParseObserver {
    fn start_document(&mut self, _doc: &mut Document) {}
    fn start_element(&mut self, _doc: &mut Document, _element: NodeId) {}
    fn end_element(&mut self, _doc: &mut Document, _element: NodeId) {}
    fn end_document(&mut self, _doc: &mut Document) {}
}

struct NoopObserver;

impl ParseObserver for NoopObserver {}

/// Stack of open elements with a per-name count, so end tags for names that are not
/// open are rejected without scanning the stack.
#[derive(Default)]
struct OpenElements {
    stack: Vec<(NodeId, AtomId)>,
    open_by_name: Vec<usize>,
}

impl OpenElements {
    fn current(&self) -> NodeId {
        self.stack.last().map(|&(id, _)| id).unwrap_or(NodeId::ROOT)
    }

    fn push(&mut self, node: NodeId, name: AtomId) {
        let slot = name.0 as usize;
        if self.open_by_name.len() <= slot {
            self.open_by_name.resize(slot + 1, 0);
        }
        self.open_by_name[slot] += 1;
        self.stack.push((node, name));
    }

    fn pop(&mut self) -> Option<NodeId> {
        let (node, name) = self.stack.pop()?;
        if let Some(count) = self.open_by_name.get_mut(name.0 as usize) {
            *count -= 1;
        }
        Some(node)
    }

    /// Stack index of the innermost open element called `name`.
    fn position(&self, name: AtomId) -> Option<usize> {
        if self.open_by_name.get(name.0 as usize).copied().unwrap_or(0) == 0 {
            return None;
        }
        self.stack.iter().rposition(|&(_, open)| open == name)
    }

    fn len(&self) -> usize {
        self.stack.len()
    }
}

pub fn parse(input: &str) -> Document {
    parse_with(input, &mut NoopObserver)
}

/// Builds the tree while pulling tokens from the input one at a time.
pub fn parse_with<O: ParseObserver + ?Sized>(input: &str, observer: &mut O) -> Document {
    let mut tokenizer = Tokenizer::new(input);
    let mut doc = Document::new();
    let mut open_elements = OpenElements::default();

    observer.start_document(&mut doc);

    while let Some(token) = tokenizer.next_token() {
        let atoms = tokenizer.atoms();
        let parent = open_elements.current();
        match token {
            Token::Doctype(doctype) => {
                let node = doc.create_node(NodeData::Doctype(doctype));
                attach(&mut doc, parent, node);
            }
            Token::Comment(text) => {
                let node = doc.create_node(NodeData::Comment(text));
                attach(&mut doc, parent, node);
            }
            Token::Text(text) => {
                if !text.is_empty() {
                    let node = doc.create_node(NodeData::Text(text));
                    attach(&mut doc, parent, node);
                }
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let attributes = attributes
                    .into_iter()
                    .map(|a| Attribute::new(atoms.resolve_arc(a.name), a.value, a.quote))
                    .collect();
                let element = Element::with_attributes(atoms.resolve_arc(name), attributes);
                let node = doc.create_node(NodeData::Element(element));
                attach(&mut doc, parent, node);

                observer.start_element(&mut doc, node);
                if self_closing {
                    observer.end_element(&mut doc, node);
                } else {
                    open_elements.push(node, name);
                }
            }
            Token::EndTag(name) => {
                let Some(position) = open_elements.position(name) else {
                    log::trace!(
                        target: "html.parse",
                        "ignoring unmatched end tag </{}>",
                        atoms.resolve(name)
                    );
                    continue;
                };
                while open_elements.len() > position {
                    if let Some(node) = open_elements.pop() {
                        observer.end_element(&mut doc, node);
                    }
                }
            }
        }
    }

    while let Some(node) = open_elements.pop() {
        observer.end_element(&mut doc, node);
    }
    observer.end_document(&mut doc);
    doc
}

fn attach(doc: &mut Document, parent: NodeId, node: NodeId) {
    let attached = doc.append_child(parent, node);
    debug_assert!(attached, "fresh node must attach to an open element");
}
