//! Runs a chain of filters over a document while it is being parsed.

use std::borrow::Cow;

use html::{Document, HtmlName, NodeId, ParseObserver};
use url::Url;

use crate::error::RewriteError;
use crate::filter::{FilterContext, RewriteFilter};
use crate::host::{DefaultHost, RewriteHost};
use crate::lcp::PrioritizeLcpImagesFilter;
use crate::log_record::{LogRecord, RewriterApplication};
use crate::options::{Filter, RewriteOptions};
use crate::polyfills::StripLegacyPolyfillsFilter;
use crate::urls;

pub struct RewriteDriver {
    options: RewriteOptions,
    host: Box<dyn RewriteHost>,
    filters: Vec<Box<dyn RewriteFilter>>,
    document_url: Option<Url>,
    base_url: Option<Url>,
    base_tag_seen: bool,
    noscript_element: Option<NodeId>,
    log_record: LogRecord,
}

impl RewriteDriver {
    pub fn new(options: RewriteOptions) -> Self {
        Self {
            options,
            host: Box::new(DefaultHost),
            filters: Vec::new(),
            document_url: None,
            base_url: None,
            base_tag_seen: false,
            noscript_element: None,
            log_record: LogRecord::new(),
        }
    }

    /// Driver with the enabled filters already added.
    pub fn with_options(options: RewriteOptions) -> Self {
        let mut driver = Self::new(options);
        driver.add_filters();
        driver
    }

    pub fn with_host(mut self, host: impl RewriteHost + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    /// Instantiates every enabled filter, in chain order.
    pub fn add_filters(&mut self) {
        let enabled: Vec<Filter> = self.options.enabled_filters().collect();
        for filter in enabled {
            let instance: Box<dyn RewriteFilter> = match filter {
                Filter::PrioritizeLcpImages => Box::new(PrioritizeLcpImagesFilter::new()),
                Filter::StripLegacyPolyfills => Box::new(StripLegacyPolyfillsFilter::new()),
            };
            self.add_filter(instance);
        }
    }

    pub fn add_filter(&mut self, filter: Box<dyn RewriteFilter>) {
        log::debug!(target: "rewriter.driver", "adding filter {}", filter.name());
        self.filters.push(filter);
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Log record of the most recent document.
    pub fn log_record(&self) -> &LogRecord {
        &self.log_record
    }

    /// Base URL in effect at the end of the most recent document.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Parses `input` as the document at `url`, running every filter on the way.
    pub fn parse(&mut self, url: &str, input: &str) -> Result<Document, RewriteError> {
        let document_url = Url::parse(url).map_err(|source| RewriteError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        log::debug!(
            target: "rewriter.driver",
            "rewriting {document_url} ({} bytes, filters: {:?})",
            input.len(),
            self.filter_names()
        );
        self.base_url = Some(document_url.clone());
        self.document_url = Some(document_url);
        Ok(html::parse_with(input, self))
    }

    pub fn rewrite(&mut self, url: &str, input: &str) -> Result<String, RewriteError> {
        let doc = self.parse(url, input)?;
        Ok(html::to_html(&doc))
    }

    /// Rewrites `body` when `content_type` is HTML; anything else passes through.
    pub fn rewrite_response<'b>(
        &mut self,
        url: &str,
        content_type: Option<&str>,
        body: &'b str,
    ) -> Result<Cow<'b, str>, RewriteError> {
        if !html::is_html(content_type) {
            log::trace!(
                target: "rewriter.driver",
                "passing through {url} with content type {content_type:?}"
            );
            return Ok(Cow::Borrowed(body));
        }
        self.rewrite(url, body).map(Cow::Owned)
    }

    fn update_base_url(&mut self, doc: &Document, base: NodeId) {
        if self.base_tag_seen {
            return;
        }
        let Some(href) = doc.element(base).and_then(|e| e.attribute_value("href")) else {
            return;
        };
        self.base_tag_seen = true;
        match urls::resolve(self.document_url.as_ref(), href) {
            Some(url) => {
                log::debug!(target: "rewriter.driver", "base url set to {url}");
                self.base_url = Some(url);
            }
            None => log::debug!(target: "rewriter.driver", "ignoring invalid base href {href:?}"),
        }
    }
}

impl ParseObserver for RewriteDriver {
    fn start_document(&mut self, doc: &mut Document) {
        self.noscript_element = None;
        self.base_tag_seen = false;
        self.log_record.clear();
        for filter in &self.filters {
            self.log_record
                .set_rewriter_logging_status(filter.filter(), RewriterApplication::NotApplied);
        }

        let mut cx = FilterContext::new(
            doc,
            self.base_url.as_ref(),
            None,
            &*self.host,
            &mut self.log_record,
        );
        for filter in self.filters.iter_mut() {
            filter.start_document(&mut cx);
        }
    }

    fn start_element(&mut self, doc: &mut Document, element: NodeId) {
        match doc.keyword(element) {
            Some(HtmlName::Noscript) if self.noscript_element.is_none() => {
                self.noscript_element = Some(element);
            }
            Some(HtmlName::Base) => self.update_base_url(doc, element),
            _ => {}
        }

        let mut cx = FilterContext::new(
            doc,
            self.base_url.as_ref(),
            self.noscript_element,
            &*self.host,
            &mut self.log_record,
        );
        for filter in self.filters.iter_mut() {
            filter.start_element(&mut cx, element);
        }
    }

    fn end_element(&mut self, doc: &mut Document, element: NodeId) {
        let was_attached = doc.is_attached(element);
        let mut cx = FilterContext::new(
            doc,
            self.base_url.as_ref(),
            self.noscript_element,
            &*self.host,
            &mut self.log_record,
        );
        for filter in self.filters.iter_mut() {
            if was_attached && !cx.doc().is_attached(element) {
                log::trace!(target: "rewriter.driver", "element deleted by an earlier filter");
                break;
            }
            filter.end_element(&mut cx, element);
        }

        if self.noscript_element == Some(element) {
            self.noscript_element = None;
        }
    }

    fn end_document(&mut self, doc: &mut Document) {
        let mut cx = FilterContext::new(
            doc,
            self.base_url.as_ref(),
            None,
            &*self.host,
            &mut self.log_record,
        );
        for filter in self.filters.iter_mut() {
            filter.end_document(&mut cx);
        }
    }
}
