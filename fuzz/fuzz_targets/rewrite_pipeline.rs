#![no_main]

use html::{Document, HtmlName};
use libfuzzer_sys::fuzz_target;
use rewriter::{RewriteDriver, RewriteOptions};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let mut options = RewriteOptions::new();
    if options
        .adjust_filters_by_comma_separated_list("pl,sp")
        .is_err()
    {
        return;
    }
    let mut driver = RewriteDriver::with_options(options);
    let Ok(doc) = driver.parse("http://example.com/", input) else {
        return;
    };

    let elements = doc.elements();
    let preloads = image_preloads(&doc);
    let existing = image_preloads(&html::parse(input));
    assert!(preloads <= existing + 1, "more than one preload link inserted");

    let polyfills = elements
        .iter()
        .filter_map(|&id| doc.element(id))
        .filter(|e| e.keyword() == HtmlName::Script)
        .filter(|e| rewriter::eligibility::is_legacy_polyfill_url(e.attribute_value("src")))
        .count();
    assert_eq!(polyfills, 0, "legacy polyfill script survived");
});

fn image_preloads(doc: &Document) -> usize {
    doc.elements()
        .into_iter()
        .filter_map(|id| doc.element(id))
        .filter(|e| {
            e.keyword() == HtmlName::Link
                && e.attribute_value("rel") == Some("preload")
                && e.attribute_value("as") == Some("image")
        })
        .count()
}
