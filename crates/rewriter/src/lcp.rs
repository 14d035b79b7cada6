//! Prioritizes the likely Largest Contentful Paint image.
//!
//! The first eligible `<img>` inside `<body>` (outside `<noscript>`) is marked
//! `fetchpriority="high"`, loses `loading="lazy"`, is exempted from script deferral
//! and gets a `<link rel="preload" as="image">` inserted right before it. Later
//! images are left alone.

use std::collections::HashSet;

use html::{Document, HtmlName, NodeId, QuoteStyle};

use crate::eligibility::eligible_image_src;
use crate::filter::{FilterContext, RewriteFilter};
use crate::options::Filter;

const MAX_PRIORITIZED_IMAGES: usize = 1;

const LOADING: &str = "loading";
const FETCHPRIORITY: &str = "fetchpriority";
const NO_DEFER_ATTRIBUTES: [&str; 2] = ["data-pagespeed-no-defer", "pagespeed_no_defer"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Outside,
    InHead,
    InBody,
    AfterBody,
}

#[derive(Debug, Default)]
struct DocumentState {
    in_head: bool,
    in_body: bool,
    body_closed: bool,
    prioritized_count: usize,
    preloaded_hrefs: HashSet<String>,
}

#[derive(Debug)]
pub struct PrioritizeLcpImagesFilter {
    state: DocumentState,
    max_prioritized: usize,
}

impl Default for PrioritizeLcpImagesFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl PrioritizeLcpImagesFilter {
    pub fn new() -> Self {
        Self {
            state: DocumentState::default(),
            max_prioritized: MAX_PRIORITIZED_IMAGES,
        }
    }

    #[cfg(test)]
    fn with_max_prioritized(max_prioritized: usize) -> Self {
        Self {
            state: DocumentState::default(),
            max_prioritized,
        }
    }

    pub fn region(&self) -> Region {
        match (self.state.in_head, self.state.in_body) {
            (_, true) => Region::InBody,
            (true, false) => Region::InHead,
            (false, false) if self.state.body_closed => Region::AfterBody,
            (false, false) => Region::Outside,
        }
    }

    pub fn prioritized_count(&self) -> usize {
        self.state.prioritized_count
    }

    pub fn is_preloaded(&self, href: &str) -> bool {
        self.state.preloaded_hrefs.contains(href)
    }

    fn prioritize_image(&mut self, cx: &mut FilterContext<'_>, image: NodeId, src: String) {
        let Some(element) = cx.doc_mut().element_mut(image) else {
            return;
        };
        if element
            .attribute_value(LOADING)
            .is_some_and(|v| v.eq_ignore_ascii_case("lazy"))
        {
            element.delete_attribute(LOADING);
        }
        match element.find_attribute_mut(FETCHPRIORITY) {
            Some(priority) => priority.set_value("high"),
            None => element.add_attribute(FETCHPRIORITY, "high", QuoteStyle::Double),
        }
        for name in NO_DEFER_ATTRIBUTES {
            if element.find_attribute(name).is_none() {
                element.add_attribute(name, "1", QuoteStyle::Double);
            }
        }

        if !self.state.preloaded_hrefs.contains(&src) && insert_preload(cx.doc_mut(), image, &src)
        {
            log::trace!(target: "rewriter.lcp", "preloading {src}");
            self.state.preloaded_hrefs.insert(src);
        }
        self.state.prioritized_count += 1;
        cx.record_filter_applied(Filter::PrioritizeLcpImages);
    }
}

fn insert_preload(doc: &mut Document, image: NodeId, href: &str) -> bool {
    let link = doc.new_element("link");
    if let Some(element) = doc.element_mut(link) {
        element.add_attribute("rel", "preload", QuoteStyle::Double);
        element.add_attribute("as", "image", QuoteStyle::Double);
        element.add_attribute("href", href, QuoteStyle::Double);
    }
    doc.insert_before(image, link)
}

impl RewriteFilter for PrioritizeLcpImagesFilter {
    fn filter(&self) -> Filter {
        Filter::PrioritizeLcpImages
    }

    fn start_document(&mut self, _cx: &mut FilterContext<'_>) {
        self.state = DocumentState::default();
    }

    fn start_element(&mut self, cx: &mut FilterContext<'_>, element: NodeId) {
        let keyword = cx.keyword(element);
        match keyword {
            Some(HtmlName::Head) => {
                self.state.in_head = true;
                return;
            }
            Some(HtmlName::Body) => {
                self.state.in_body = true;
                return;
            }
            _ => {}
        }

        if cx.noscript_element().is_some()
            || self.state.prioritized_count >= self.max_prioritized
            || !self.state.in_body
        {
            return;
        }
        if keyword != Some(HtmlName::Img) || !cx.is_rewritable(element) {
            return;
        }
        let Some(src) = cx
            .doc()
            .element(element)
            .and_then(|img| eligible_image_src(img, cx.base_url()))
            .map(str::to_owned)
        else {
            return;
        };
        self.prioritize_image(cx, element, src);
    }

    fn end_element(&mut self, cx: &mut FilterContext<'_>, element: NodeId) {
        match cx.keyword(element) {
            Some(HtmlName::Head) => self.state.in_head = false,
            Some(HtmlName::Body) => {
                self.state.in_body = false;
                self.state.body_closed = true;
            }
            _ => {}
        }
    }
}
