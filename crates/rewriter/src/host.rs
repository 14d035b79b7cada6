//! Host policy consulted by filters before they touch an element.

use html::{Document, NodeId};

pub trait RewriteHost {
    /// Whether filters may modify `element`.
    fn is_rewritable(&self, doc: &Document, element: NodeId) -> bool;
}

impl<F> RewriteHost for F
where
    F: Fn(&Document, NodeId) -> bool,
{
    fn is_rewritable(&self, doc: &Document, element: NodeId) -> bool {
        self(doc, element)
    }
}

const NO_TRANSFORM_ATTRIBUTES: [&str; 2] =
    ["data-pagespeed-no-transform", "pagespeed_no_transform"];

/// Refuses elements that are detached, or that carry a no-transform marker on
/// themselves or an ancestor.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultHost;

impl RewriteHost for DefaultHost {
    fn is_rewritable(&self, doc: &Document, element: NodeId) -> bool {
        doc.is_attached(element)
            && std::iter::once(element)
                .chain(doc.ancestors(element))
                .filter_map(|id| doc.element(id))
                .all(|e| {
                    NO_TRANSFORM_ATTRIBUTES
                        .iter()
                        .all(|name| e.find_attribute(name).is_none())
                })
    }
}
