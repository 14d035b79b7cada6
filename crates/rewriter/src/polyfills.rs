//! Removes `<script src>` tags that load legacy polyfill bundles.

use html::{HtmlName, NodeId};

use crate::eligibility::is_legacy_polyfill_url;
use crate::filter::{FilterContext, RewriteFilter};
use crate::options::Filter;

#[derive(Clone, Copy, Debug, Default)]
pub struct StripLegacyPolyfillsFilter;

impl StripLegacyPolyfillsFilter {
    pub fn new() -> Self {
        Self
    }
}

impl RewriteFilter for StripLegacyPolyfillsFilter {
    fn filter(&self) -> Filter {
        Filter::StripLegacyPolyfills
    }

    fn end_element(&mut self, cx: &mut FilterContext<'_>, element: NodeId) {
        let polyfill = cx
            .doc()
            .element(element)
            .filter(|script| script.keyword() == HtmlName::Script)
            .and_then(|script| script.attribute_value("src"))
            .filter(|src| is_legacy_polyfill_url(Some(*src)))
            .map(str::to_owned);
        let Some(src) = polyfill else {
            return;
        };
        if cx.doc_mut().delete_node(element) {
            log::debug!(target: "rewriter.polyfills", "removed legacy polyfill {src}");
            cx.record_filter_applied(Filter::StripLegacyPolyfills);
        }
    }
}
