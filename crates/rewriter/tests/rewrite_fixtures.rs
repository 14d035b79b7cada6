use std::path::PathBuf;

use html_test_support::assert_markup_eq;
use html_test_support::fixtures::{FixtureStatus, RewriteFixture, fixture_files, load_fixtures};
use rewriter::{RewriteDriver, RewriteOptions};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn run_case(case: &RewriteFixture) -> String {
    let mut options = RewriteOptions::new();
    options
        .adjust_filters_by_comma_separated_list(&case.filters)
        .unwrap_or_else(|err| panic!("case '{}': bad filter list: {err}", case.id));
    let mut driver = RewriteDriver::with_options(options);
    let content_type = case.content_type.as_deref().or(Some("text/html"));
    driver
        .rewrite_response(&case.url, content_type, &case.input)
        .unwrap_or_else(|err| panic!("case '{}': {err}", case.id))
        .into_owned()
}

#[test]
fn rewrite_fixtures() {
    let files = fixture_files(&fixtures_dir());
    assert!(!files.is_empty(), "no fixture files found");

    let mut ran = 0;
    for path in files {
        for case in load_fixtures(&path) {
            if case.status == FixtureStatus::Skip {
                continue;
            }
            let actual = run_case(&case);
            assert_markup_eq(&case.id, case.expected_output(), &actual);
            ran += 1;
        }
    }
    assert!(ran >= 20, "only {ran} fixture cases ran");
}
