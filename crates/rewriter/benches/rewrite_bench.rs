use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rewriter::{Filter, RewriteDriver, RewriteOptions};

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 20_000;

fn make_page(blocks: usize) -> String {
    let mut page = String::with_capacity(blocks * 96 + 256);
    page.push_str("<!DOCTYPE html><html><head>");
    page.push_str("<script src='/wp-includes/js/dist/vendor/wp-polyfill.min.js'></script>");
    page.push_str("<script src='/app.js'></script></head><body>");
    page.push_str("<img src=/pixel.gif width=1 height=1>");
    for i in 0..blocks {
        page.push_str("<div class=card><img loading=lazy src=/img/");
        page.push_str(&i.to_string());
        page.push_str(".jpg><p>caption &amp; text</p></div>");
    }
    page.push_str("</body></html>");
    page
}

fn all_filters() -> RewriteDriver {
    let mut options = RewriteOptions::new();
    for filter in Filter::ALL {
        options.enable_filter(filter);
    }
    RewriteDriver::with_options(options)
}

fn bench_parse_only_large(c: &mut Criterion) {
    let input = make_page(LARGE_BLOCKS);
    c.bench_function("bench_parse_only_large", |b| {
        b.iter(|| {
            let doc = html::parse(black_box(&input));
            black_box(doc.elements().len());
        });
    });
}

fn bench_rewrite_small(c: &mut Criterion) {
    let input = make_page(SMALL_BLOCKS);
    let mut driver = all_filters();
    c.bench_function("bench_rewrite_small", |b| {
        b.iter(|| {
            let out = driver.rewrite("http://example.com/", black_box(&input));
            black_box(out.map(|s| s.len()).unwrap_or(0));
        });
    });
}

fn bench_rewrite_large(c: &mut Criterion) {
    let input = make_page(LARGE_BLOCKS);
    let mut driver = all_filters();
    c.bench_function("bench_rewrite_large", |b| {
        b.iter(|| {
            let out = driver.rewrite("http://example.com/", black_box(&input));
            black_box(out.map(|s| s.len()).unwrap_or(0));
        });
    });
}

criterion_group!(
    benches,
    bench_parse_only_large,
    bench_rewrite_small,
    bench_rewrite_large
);
criterion_main!(benches);
