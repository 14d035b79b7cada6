//! HTML serialization of the arena tree.
//!
//! Output policy:
//! - Attributes keep their order and quote style; bare attributes stay bare.
//! - Void elements get no end tag; every other element is closed explicitly.
//! - Text inside `script`/`style` is written verbatim, other text is escaped.
//! - Detached (deleted) subtrees are not reachable and never written.
//! - Traversal uses an explicit work stack, so nesting depth is bounded by memory only.

use crate::dom::{Attribute, Document, Element, NodeData, NodeId};
use crate::entities::{escape_attribute_value, escape_text};
use crate::tokenizer::is_void_element;
use crate::types::QuoteStyle;

enum Step {
    Open { id: NodeId, in_rawtext: bool },
    Close(NodeId),
}

pub fn to_html(doc: &Document) -> String {
    let mut out = String::new();
    let mut stack = Vec::new();
    push_children(doc, doc.root(), false, &mut stack);
    while let Some(step) = stack.pop() {
        match step {
            Step::Open { id, in_rawtext } => open_node(doc, id, in_rawtext, &mut stack, &mut out),
            Step::Close(id) => {
                if let Some(element) = doc.element(id) {
                    out.push_str("</");
                    out.push_str(element.name());
                    out.push('>');
                }
            }
        }
    }
    out
}

fn push_children(doc: &Document, id: NodeId, in_rawtext: bool, stack: &mut Vec<Step>) {
    stack.extend(
        doc.children(id)
            .iter()
            .rev()
            .map(|&child| Step::Open { id: child, in_rawtext }),
    );
}

fn open_node(
    doc: &Document,
    id: NodeId,
    in_rawtext: bool,
    stack: &mut Vec<Step>,
    out: &mut String,
) {
    let Some(data) = doc.data(id) else {
        return;
    };
    match data {
        NodeData::Document => push_children(doc, id, false, stack),
        NodeData::Doctype(doctype) => {
            out.push_str("<!");
            out.push_str(doctype);
            out.push('>');
        }
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::Text(text) => {
            if in_rawtext {
                out.push_str(text);
            } else {
                escape_text(text, out);
            }
        }
        NodeData::Element(element) => {
            write_start_tag(element, out);
            if is_void_element(element.name()) {
                return;
            }
            stack.push(Step::Close(id));
            push_children(doc, id, element.keyword().is_rawtext(), stack);
        }
    }
}

fn write_start_tag(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(element.name());
    for attribute in element.attributes() {
        out.push(' ');
        write_attribute(attribute, out);
    }
    out.push('>');
}

fn write_attribute(attribute: &Attribute, out: &mut String) {
    out.push_str(attribute.name());
    let Some(value) = attribute.value() else {
        return;
    };
    out.push('=');
    let quote = match attribute.quote() {
        QuoteStyle::Unquoted if can_stay_unquoted(value) => None,
        QuoteStyle::Single => Some('\''),
        QuoteStyle::Double | QuoteStyle::Unquoted => Some('"'),
    };
    match quote {
        Some(q) => {
            out.push(q);
            escape_attribute_value(value, q, out);
            out.push(q);
        }
        None => escape_attribute_value(value, '"', out),
    }
}

fn can_stay_unquoted(value: &str) -> bool {
    !value.is_empty()
        && !value.bytes().any(|b| {
            b.is_ascii_whitespace() || matches!(b, b'"' | b'\'' | b'=' | b'<' | b'>' | b'`')
        })
}
