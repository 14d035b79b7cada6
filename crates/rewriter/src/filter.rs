//! The filter interface and the context a filter sees for each event.

use html::{Document, HtmlName, NodeId};
use url::Url;

use crate::host::RewriteHost;
use crate::log_record::{LogRecord, RewriterApplication};
use crate::options::Filter;

/// A streaming rewrite pass. Hooks are called in document order while the tree is
/// being built; all default to no-ops.
///
/// A filter instance may be reused for many documents. `start_document` must clear
/// anything left over from the previous one.
pub trait RewriteFilter {
    fn filter(&self) -> Filter;

    fn name(&self) -> &'static str {
        self.filter().name()
    }

    fn start_document(&mut self, _cx: &mut FilterContext<'_>) {}
    fn start_element(&mut self, _cx: &mut FilterContext<'_>, _element: NodeId) {}
    fn end_element(&mut self, _cx: &mut FilterContext<'_>, _element: NodeId) {}
    fn end_document(&mut self, _cx: &mut FilterContext<'_>) {}
}

pub struct FilterContext<'a> {
    doc: &'a mut Document,
    base_url: Option<&'a Url>,
    noscript_element: Option<NodeId>,
    host: &'a dyn RewriteHost,
    log_record: &'a mut LogRecord,
}

impl<'a> FilterContext<'a> {
    pub fn new(
        doc: &'a mut Document,
        base_url: Option<&'a Url>,
        noscript_element: Option<NodeId>,
        host: &'a dyn RewriteHost,
        log_record: &'a mut LogRecord,
    ) -> Self {
        Self {
            doc,
            base_url,
            noscript_element,
            host,
            log_record,
        }
    }

    pub fn doc(&self) -> &Document {
        self.doc
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        self.doc
    }

    /// URL relative references resolve against: the first `<base href>` seen so far,
    /// otherwise the document URL.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url
    }

    /// Outermost `<noscript>` currently open, if any.
    pub fn noscript_element(&self) -> Option<NodeId> {
        self.noscript_element
    }

    pub fn keyword(&self, element: NodeId) -> Option<HtmlName> {
        self.doc.keyword(element)
    }

    pub fn is_rewritable(&self, element: NodeId) -> bool {
        self.host.is_rewritable(self.doc, element)
    }

    pub fn record_filter_applied(&mut self, filter: Filter) {
        self.log_record
            .set_rewriter_logging_status(filter, RewriterApplication::AppliedOk);
    }

    pub fn log_record(&self) -> &LogRecord {
        self.log_record
    }
}
