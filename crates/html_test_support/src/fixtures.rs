//! TOML rewrite fixtures.
//!
//! A fixture file looks like:
//!
//! ```toml
//! format = "rewrite-fixtures-v1"
//!
//! [[cases]]
//! id = "lcp-first-image"
//! filters = "+prioritize_lcp_images"
//! input = '<body><img src="/a.jpg"></body>'
//! expected = '...'
//! ```
//!
//! `url` defaults to `http://example.com/`. A case without `expected` must come out
//! unchanged. Cases with `status = "skip"` are loaded but not run.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const REWRITE_FIXTURES_FORMAT_V1: &str = "rewrite-fixtures-v1";

const DEFAULT_URL: &str = "http://example.com/";

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    #[default]
    Run,
    Skip,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RewriteFixture {
    pub id: String,
    pub filters: String,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub content_type: Option<String>,
    pub input: String,
    #[serde(default)]
    pub expected: Option<String>,
    #[serde(default)]
    pub status: FixtureStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

impl RewriteFixture {
    pub fn expected_output(&self) -> &str {
        self.expected.as_deref().unwrap_or(&self.input)
    }
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FixtureFile {
    format: String,
    #[serde(default)]
    cases: Vec<RewriteFixture>,
}

pub fn parse_fixtures(content: &str, origin: &Path) -> Vec<RewriteFixture> {
    let file: FixtureFile = toml::from_str(content)
        .unwrap_or_else(|err| panic!("failed to parse fixture TOML {origin:?}: {err}"));
    assert_eq!(
        file.format, REWRITE_FIXTURES_FORMAT_V1,
        "unsupported fixture format in {origin:?}"
    );
    let mut seen = BTreeSet::new();
    for case in &file.cases {
        assert!(
            seen.insert(case.id.as_str()),
            "duplicate fixture id '{}' in {origin:?}",
            case.id
        );
        if case.status == FixtureStatus::Skip {
            assert!(
                case.reason.as_deref().is_some_and(|r| !r.trim().is_empty()),
                "skipped fixture '{}' in {origin:?} needs a reason",
                case.id
            );
        }
    }
    file.cases
}

pub fn load_fixtures(path: &Path) -> Vec<RewriteFixture> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read fixture file {path:?}: {err}"));
    parse_fixtures(&content, path)
}

/// Every `*.toml` fixture file under `dir`, sorted by path.
pub fn fixture_files(dir: &Path) -> Vec<PathBuf> {
    let entries = fs::read_dir(dir)
        .unwrap_or_else(|err| panic!("failed to read fixture dir {dir:?}: {err}"));
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_filled_in() {
        let cases = parse_fixtures(
            r#"
format = "rewrite-fixtures-v1"

[[cases]]
id = "noop"
filters = ""
input = "<p>x</p>"
"#,
            Path::new("inline.toml"),
        );
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].url, DEFAULT_URL);
        assert_eq!(cases[0].status, FixtureStatus::Run);
        assert_eq!(cases[0].expected_output(), "<p>x</p>");
    }

    #[test]
    #[should_panic(expected = "duplicate fixture id 'a'")]
    fn duplicate_ids_are_rejected() {
        parse_fixtures(
            r#"
format = "rewrite-fixtures-v1"
[[cases]]
id = "a"
filters = ""
input = ""
[[cases]]
id = "a"
filters = ""
input = ""
"#,
            Path::new("dup.toml"),
        );
    }

    #[test]
    #[should_panic(expected = "needs a reason")]
    fn skip_requires_reason() {
        parse_fixtures(
            r#"
format = "rewrite-fixtures-v1"
[[cases]]
id = "a"
filters = ""
input = ""
status = "skip"
"#,
            Path::new("skip.toml"),
        );
    }
}
