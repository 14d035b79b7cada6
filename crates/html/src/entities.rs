//! Character references: a narrow decoder for parsing and the matching escapers for
//! serialization.
//!
//! Decoding contract:
//! - Named references: `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`.
//! - Numeric references only when semicolon-terminated: `&#215;`, `&#xD7;`.
//! - Anything else (unknown names, missing `;`, invalid scalars) passes through unchanged.

use memchr::memchr;

const NAMED: &[(&str, char)] = &[
    ("amp;", '&'),
    ("lt;", '<'),
    ("gt;", '>'),
    ("quot;", '"'),
    ("apos;", '\''),
    ("nbsp;", '\u{00A0}'),
];

const MAX_HEX_DIGITS: usize = 6;
const MAX_DEC_DIGITS: usize = 7;

pub(crate) fn decode_entities(s: &str) -> String {
    if memchr(b'&', s.as_bytes()).is_none() {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = memchr(b'&', rest.as_bytes()) {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        match decode_reference(tail) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode a reference that follows `&`. Returns the character and the number of
/// bytes consumed after the ampersand.
fn decode_reference(tail: &str) -> Option<(char, usize)> {
    if let Some(numeric) = tail.strip_prefix('#') {
        let (digits_start, radix, max) = match numeric.as_bytes().first() {
            Some(b'x' | b'X') => (1, 16, MAX_HEX_DIGITS),
            _ => (0, 10, MAX_DEC_DIGITS),
        };
        let body = &numeric[digits_start..];
        let end = body.find(';')?;
        let digits = &body[..end];
        if digits.is_empty() || digits.len() > max {
            return None;
        }
        if !digits.bytes().all(|b| (b as char).is_digit(radix)) {
            return None;
        }
        let ch = u32::from_str_radix(digits, radix).ok().and_then(char::from_u32)?;
        return Some((ch, 1 + digits_start + end + 1));
    }
    NAMED
        .iter()
        .find(|(name, _)| tail.starts_with(name))
        .map(|(name, ch)| (*ch, name.len()))
}

/// Escape text content for serialization.
pub fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

/// Escape an attribute value for the given quote character.
pub fn escape_attribute_value(value: &str, quote: char, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' if quote == '"' => out.push_str("&quot;"),
            '\'' if quote == '\'' => out.push_str("&#39;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
