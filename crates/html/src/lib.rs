pub mod dom;
pub mod keyword;
pub mod parse;
pub mod serialize;

mod entities;
mod tokenizer;
mod types;

use memchr::memchr2;

/// Whether a `Content-Type` value denotes markup the rewriter understands.
pub fn is_html(content_type: Option<&str>) -> bool {
    let Some(value) = content_type else {
        return false;
    };
    contains_ignore_ascii_case(value, "text/html")
        || contains_ignore_ascii_case(value, "application/xhtml")
}

/// ASCII case-insensitive substring search without allocating a lowered copy.
pub fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    let Some(&first) = needle.first() else {
        return true;
    };
    let (lower, upper) = (first.to_ascii_lowercase(), first.to_ascii_uppercase());
    let mut i = 0;
    while i + needle.len() <= hay.len() {
        let Some(rel) = memchr2(lower, upper, &hay[i..]) else {
            return false;
        };
        let pos = i + rel;
        if hay
            .get(pos..pos + needle.len())
            .is_some_and(|window| window.eq_ignore_ascii_case(needle))
        {
            return true;
        }
        i = pos + 1;
    }
    false
}

pub use crate::dom::{Attribute, Document, Element, NodeData, NodeId};
pub use crate::entities::{escape_attribute_value, escape_text};
pub use crate::keyword::HtmlName;
pub use crate::parse::{ParseObserver, parse, parse_with};
pub use crate::serialize::to_html;
pub use crate::tokenizer::{Tokenizer, tokenize};
pub use crate::types::{AtomId, AtomTable, QuoteStyle, Token, TokenAttribute, TokenStream};
