//! Cheap structural checks that decide whether an element is worth touching.

use html::{Element, contains_ignore_ascii_case};
use url::Url;

use crate::urls::{is_data_url, resolves_to_valid_url};

/// Script sources that ship polyfills for browsers nobody targets anymore.
const LEGACY_POLYFILL_PATTERNS: [&str; 4] = [
    "wp-polyfill",
    "polyfill.io",
    "/polyfill.min.js",
    "/polyfills.min.js",
];

/// Inline style hides the element. Matches the exact `display:none` and
/// `visibility:hidden` spellings, so `display: none` is not detected.
pub fn is_hidden_by_style(element: &Element) -> bool {
    let Some(style) = element.attribute_value("style") else {
        return false;
    };
    contains_ignore_ascii_case(style, "display:none")
        || contains_ignore_ascii_case(style, "visibility:hidden")
}

/// Both dimensions are declared as plain integers no larger than one pixel.
pub fn looks_like_tiny_tracker(element: &Element) -> bool {
    let (Some(width), Some(height)) = (
        element.attribute_value("width"),
        element.attribute_value("height"),
    ) else {
        return false;
    };
    match (width.parse::<i32>(), height.parse::<i32>()) {
        (Ok(width), Ok(height)) => width <= 1 && height <= 1,
        _ => false,
    }
}

/// The `src` of an image that may be prioritized: non-empty, not inline data, not
/// hidden, not a tracking pixel, and resolvable against `base`.
pub fn eligible_image_src<'e>(element: &'e Element, base: Option<&Url>) -> Option<&'e str> {
    let src = element.attribute_value("src")?;
    if src.is_empty() || is_data_url(src) {
        return None;
    }
    if is_hidden_by_style(element) || looks_like_tiny_tracker(element) {
        return None;
    }
    resolves_to_valid_url(base, src).then_some(src)
}

pub fn is_legacy_polyfill_url(src: Option<&str>) -> bool {
    src.is_some_and(|src| {
        LEGACY_POLYFILL_PATTERNS
            .iter()
            .any(|pattern| contains_ignore_ascii_case(src, pattern))
    })
}
