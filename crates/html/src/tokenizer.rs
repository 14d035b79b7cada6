//! Simplified HTML tokenizer with a constrained, practical name character set.
//!
//! Supported tag/attribute name characters (ASCII only): `[A-Za-z0-9:_-]`.
//!
//! Tokens are produced on demand by [`Tokenizer::next_token`]; the tokenizer only scans
//! as far into the input as the token being returned.
//!
//! Known limitations (intentional):
//! - Not a full HTML5 tokenizer state machine (no HTML5 parse-error recovery).
//! - `/>` only self-closes void elements. On any other element it is ignored, as in
//!   HTML5, so `<script src=x />body</script>` still treats `body` as script text.
//! - `script`/`style` bodies are rawtext; the close tag may only be followed by ASCII
//!   whitespace before `>`.
//! - Attribute values keep the quote style they were written with so the serializer can
//!   reproduce untouched attributes.
use std::collections::VecDeque;

use crate::entities::decode_entities;
use crate::types::{AtomId, AtomTable, QuoteStyle, Token, TokenAttribute, TokenStream};
use memchr::memchr;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";
const SCRIPT_CLOSE_TAG: &[u8] = b"</script";
const STYLE_CLOSE_TAG: &[u8] = b"</style";

pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack
        .get(start..start + needle.len())
        .is_some_and(|s| s.eq_ignore_ascii_case(needle))
}

/// Find `</script\s*>` (or the style equivalent). Returns `(start, end)` of the close tag.
fn find_rawtext_close_tag(haystack: &str, close_tag: &[u8]) -> Option<(usize, usize)> {
    let bytes = haystack.as_bytes();
    let n = close_tag.len();
    let mut i = 0;
    while i + n <= bytes.len() {
        i += memchr(b'<', &bytes[i..])?;
        if starts_with_ignore_ascii_case_at(bytes, i, close_tag) {
            let mut k = i + n;
            while k < bytes.len() && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < bytes.len() && bytes[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

/// Byte cursor over the input.
///
/// Invariant: the cursor only stops at ASCII structural bytes or after ASCII-only name
/// runs, so every slice endpoint is a UTF-8 char boundary.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    atoms: AtomTable,
    pending: VecDeque<Token>,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            atoms: AtomTable::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// Interned names for every token returned so far.
    pub fn atoms(&self) -> &AtomTable {
        &self.atoms
    }

    /// Returns the next token, scanning only as much input as it needs.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.finished {
                return None;
            }
            self.step();
        }
    }

    /// Drains the remaining input into a token stream.
    pub fn run(mut self) -> TokenStream {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        log::trace!(target: "html.tokenizer", "emitted {} tokens", tokens.len());
        TokenStream::new(tokens, self.atoms)
    }

    /// Scans one construct. Sets `finished` at end of input or when the input ends
    /// inside a comment, doctype or rawtext body.
    fn step(&mut self) {
        if self.pos >= self.input.len() {
            self.finished = true;
            return;
        }
        let more = if self.byte(self.pos) != Some(b'<') {
            self.text();
            true
        } else if self.rest().starts_with(COMMENT_START) {
            self.comment()
        } else if starts_with_ignore_ascii_case_at(self.bytes(), self.pos, b"<!doctype") {
            self.doctype()
        } else if self.byte(self.pos + 1) == Some(b'/') {
            self.end_tag();
            true
        } else {
            self.start_tag()
        };
        if !more {
            self.finished = true;
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn byte(&self, at: usize) -> Option<u8> {
        self.bytes().get(at).copied()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        while self.byte(self.pos).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn name(&mut self) -> Option<AtomId> {
        let start = self.pos;
        while self.byte(self.pos).is_some_and(is_name_byte) {
            self.pos += 1;
        }
        if start == self.pos {
            return None;
        }
        Some(self.atoms.intern_ascii_lowercase(&self.input[start..self.pos]))
    }

    fn text(&mut self) {
        let start = self.pos;
        self.pos = memchr(b'<', &self.bytes()[start..])
            .map(|rel| start + rel)
            .unwrap_or(self.input.len());
        let decoded = decode_entities(&self.input[start..self.pos]);
        if !decoded.is_empty() {
            self.pending.push_back(Token::Text(decoded));
        }
    }

    fn comment(&mut self) -> bool {
        let body = &self.input[self.pos + COMMENT_START.len()..];
        match body.find(COMMENT_END) {
            Some(end) => {
                self.pending.push_back(Token::Comment(body[..end].to_string()));
                self.pos += COMMENT_START.len() + end + COMMENT_END.len();
                true
            }
            None => {
                self.pending.push_back(Token::Comment(body.to_string()));
                self.pos = self.input.len();
                false
            }
        }
    }

    fn doctype(&mut self) -> bool {
        let body = &self.input[self.pos + 2..];
        let Some(end) = body.find('>') else {
            return false;
        };
        self.pending.push_back(Token::Doctype(body[..end].trim().to_string()));
        self.pos += 2 + end + 1;
        true
    }

    fn end_tag(&mut self) {
        self.pos += 2;
        let name = self.name();
        self.pos = memchr(b'>', &self.bytes()[self.pos..])
            .map(|rel| self.pos + rel + 1)
            .unwrap_or(self.input.len());
        if let Some(name) = name {
            self.pending.push_back(Token::EndTag(name));
        }
    }

    /// Returns `false` when the input ended inside a rawtext element.
    fn start_tag(&mut self) -> bool {
        self.pos += 1;
        let Some(name) = self.name() else {
            // A stray `<` is text.
            self.pending.push_back(Token::Text("<".to_string()));
            return true;
        };
        let mut attributes = Vec::new();
        let mut slash_close = false;
        loop {
            self.skip_whitespace();
            match self.byte(self.pos) {
                None => break,
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b'/') => {
                    self.pos += 1;
                    if self.byte(self.pos) == Some(b'>') {
                        self.pos += 1;
                        slash_close = true;
                        break;
                    }
                }
                Some(_) => match self.name() {
                    Some(attr) => attributes.push(self.attribute_value(attr)),
                    None => self.pos += 1,
                },
            }
        }

        let tag = self.atoms.resolve(name);
        let rawtext = match tag {
            "script" => Some(SCRIPT_CLOSE_TAG),
            "style" => Some(STYLE_CLOSE_TAG),
            _ => None,
        };
        let void = is_void_element(tag);
        if slash_close && !void {
            log::trace!(target: "html.tokenizer", "ignoring `/>` on non-void <{tag}>");
        }
        let self_closing = void;
        self.pending.push_back(Token::StartTag {
            name,
            attributes,
            self_closing,
        });

        match rawtext {
            Some(close_tag) if !self_closing => self.rawtext(name, close_tag),
            _ => true,
        }
    }

    fn attribute_value(&mut self, name: AtomId) -> TokenAttribute {
        let before_eq = self.pos;
        self.skip_whitespace();
        if self.byte(self.pos) != Some(b'=') {
            self.pos = before_eq;
            return TokenAttribute {
                name,
                value: None,
                quote: QuoteStyle::Double,
            };
        }
        self.pos += 1;
        self.skip_whitespace();
        match self.byte(self.pos) {
            Some(q @ (b'"' | b'\'')) => {
                let start = self.pos + 1;
                let end = memchr(q, &self.bytes()[start..])
                    .map(|rel| start + rel)
                    .unwrap_or(self.input.len());
                self.pos = (end + 1).min(self.input.len());
                TokenAttribute {
                    name,
                    value: Some(decode_entities(&self.input[start..end])),
                    quote: if q == b'"' {
                        QuoteStyle::Double
                    } else {
                        QuoteStyle::Single
                    },
                }
            }
            _ => {
                let start = self.pos;
                while let Some(b) = self.byte(self.pos) {
                    if b.is_ascii_whitespace() || b == b'>' {
                        break;
                    }
                    if b == b'/' && self.byte(self.pos + 1) == Some(b'>') {
                        break;
                    }
                    self.pos += 1;
                }
                TokenAttribute {
                    name,
                    value: Some(decode_entities(&self.input[start..self.pos])),
                    quote: QuoteStyle::Unquoted,
                }
            }
        }
    }

    /// Emit the rawtext body and the end tag. A missing close tag closes the element
    /// implicitly at end of input.
    fn rawtext(&mut self, name: AtomId, close_tag: &[u8]) -> bool {
        let body = self.rest();
        match find_rawtext_close_tag(body, close_tag) {
            Some((start, end)) => {
                if start > 0 {
                    self.pending.push_back(Token::Text(body[..start].to_string()));
                }
                self.pending.push_back(Token::EndTag(name));
                self.pos += end;
                true
            }
            None => {
                if !body.is_empty() {
                    self.pending.push_back(Token::Text(body.to_string()));
                }
                self.pending.push_back(Token::EndTag(name));
                self.pos = self.input.len();
                false
            }
        }
    }
}

/// Tokenizes into a token stream with interned tag/attribute names.
pub fn tokenize(input: &str) -> TokenStream {
    Tokenizer::new(input).run()
}
