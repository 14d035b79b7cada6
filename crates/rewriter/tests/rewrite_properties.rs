use html::{Document, HtmlName, NodeId};
use rewriter::{
    Filter, PrioritizeLcpImagesFilter, RewriteDriver, RewriteFilter, RewriteOptions,
    RewriterApplication,
};

const URL: &str = "http://example.com/";

fn lcp_driver() -> RewriteDriver {
    let mut options = RewriteOptions::new();
    options.enable_filter(Filter::PrioritizeLcpImages);
    RewriteDriver::with_options(options)
}

fn body_with_images(count: usize) -> String {
    let mut out = String::from("<body>");
    for i in 0..count {
        out.push_str(&format!(r#"<p><img src="/img{i}.jpg" loading="lazy"></p>"#));
    }
    out.push_str("</body>");
    out
}

fn images(doc: &Document) -> Vec<NodeId> {
    doc.elements()
        .into_iter()
        .filter(|&id| doc.keyword(id) == Some(HtmlName::Img))
        .collect()
}

fn preload_count(doc: &Document) -> usize {
    doc.elements()
        .into_iter()
        .filter_map(|id| doc.element(id))
        .filter(|e| e.keyword() == HtmlName::Link && e.attribute_value("rel") == Some("preload"))
        .count()
}

#[test]
fn at_most_one_image_is_prioritized() {
    for count in [0, 1, 2, 7] {
        let mut driver = lcp_driver();
        let doc = driver.parse(URL, &body_with_images(count)).unwrap();
        let prioritized = images(&doc)
            .into_iter()
            .filter(|&id| {
                doc.element(id)
                    .is_some_and(|e| e.attribute_value("fetchpriority") == Some("high"))
            })
            .count();
        assert_eq!(prioritized, count.min(1), "{count} images");
        assert_eq!(preload_count(&doc), count.min(1), "{count} images");
    }
}

#[test]
fn later_images_are_left_byte_identical() {
    let input = body_with_images(3);
    let out = lcp_driver().rewrite(URL, &input).unwrap();
    assert!(out.ends_with(concat!(
        r#"<p><img src="/img1.jpg" loading="lazy"></p>"#,
        r#"<p><img src="/img2.jpg" loading="lazy"></p></body>"#,
    )));
}

#[test]
fn driver_state_does_not_leak_between_documents() {
    let mut driver = lcp_driver();
    let first = driver.rewrite(URL, &body_with_images(2)).unwrap();
    assert_eq!(
        driver.log_record().status(Filter::PrioritizeLcpImages),
        Some(RewriterApplication::AppliedOk)
    );

    let empty = driver.rewrite(URL, "<body><p>text</p></body>").unwrap();
    assert_eq!(empty, "<body><p>text</p></body>");
    assert_eq!(
        driver.log_record().status(Filter::PrioritizeLcpImages),
        Some(RewriterApplication::NotApplied)
    );

    let again = driver.rewrite(URL, &body_with_images(2)).unwrap();
    assert_eq!(first, again);
}

#[test]
fn same_src_in_second_document_is_preloaded_again() {
    let mut driver = lcp_driver();
    for _ in 0..2 {
        let doc = driver.parse(URL, r#"<body><img src="/hero.jpg"></body>"#).unwrap();
        assert_eq!(preload_count(&doc), 1);
    }
}

#[test]
fn host_policy_is_consulted() {
    let refuse_first = |doc: &Document, element: NodeId| {
        doc.element(element)
            .and_then(|e| e.attribute_value("src"))
            .is_none_or(|src| src != "/img0.jpg")
    };
    let mut driver = lcp_driver().with_host(refuse_first);
    let out = driver.rewrite(URL, &body_with_images(2)).unwrap();
    assert!(out.contains(r#"<img src="/img0.jpg" loading="lazy">"#));
    assert!(out.contains(r#"<link rel="preload" as="image" href="/img1.jpg">"#));
}

#[test]
fn custom_filters_run_after_builtin_ones() {
    #[derive(Default)]
    struct SeesPriority {
        seen: std::rc::Rc<std::cell::RefCell<Vec<Option<String>>>>,
    }

    impl RewriteFilter for SeesPriority {
        fn filter(&self) -> Filter {
            Filter::PrioritizeLcpImages
        }

        fn start_element(&mut self, cx: &mut rewriter::FilterContext<'_>, element: NodeId) {
            let Some(img) = cx.doc().element(element) else {
                return;
            };
            if img.keyword() == HtmlName::Img {
                let priority = img.attribute_value("fetchpriority").map(str::to_owned);
                self.seen.borrow_mut().push(priority);
            }
        }
    }

    let observer = SeesPriority::default();
    let seen = observer.seen.clone();
    let mut driver = lcp_driver();
    driver.add_filter(Box::new(observer));
    driver.rewrite(URL, &body_with_images(2)).unwrap();
    assert_eq!(*seen.borrow(), [Some("high".to_string()), None]);
}

#[test]
fn filter_can_be_driven_without_options() {
    let mut driver = RewriteDriver::new(RewriteOptions::new());
    driver.add_filter(Box::new(PrioritizeLcpImagesFilter::new()));
    assert_eq!(driver.filter_names(), ["prioritize_lcp_images"]);
    let out = driver.rewrite(URL, r#"<body><img src="/a.jpg"></body>"#).unwrap();
    assert!(out.starts_with(r#"<body><link rel="preload" as="image" href="/a.jpg">"#));
}

#[test]
fn deeply_nested_image_is_prioritized() {
    let depth = 50_000;
    let input = format!("<body>{}<img src=/a.jpg>", "<div>".repeat(depth));
    let mut driver = lcp_driver();

    let doc = driver.parse(URL, &input).unwrap();
    assert_eq!(preload_count(&doc), 1);

    let out = driver.rewrite(URL, &input).unwrap();
    let opened = format!("<body>{}", "<div>".repeat(depth));
    assert!(out.starts_with(&opened));
    assert!(out[opened.len()..].starts_with(r#"<link rel="preload" as="image" href="/a.jpg">"#));
    assert!(out.ends_with(&format!("{}</body>", "</div>".repeat(depth))));
}

#[test]
fn deeply_nested_polyfill_is_stripped() {
    let depth = 50_000;
    let input = format!(
        r#"<body>{}<script src="/wp-polyfill.js"></script><p>ok</p>"#,
        "<span>".repeat(depth)
    );
    let mut options = RewriteOptions::new();
    options.enable_filter(Filter::StripLegacyPolyfills);
    let out = RewriteDriver::with_options(options).rewrite(URL, &input).unwrap();
    assert!(!out.contains("<script"));
    assert!(out.contains("<p>ok</p>"));
    assert_eq!(out.matches("</span>").count(), depth);
}
