use url::Url;

/// `data:` URLs (scheme compared ASCII case-insensitively).
pub fn is_data_url(candidate: &str) -> bool {
    candidate
        .as_bytes()
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case(b"data:"))
}

/// Resolves `candidate` against `base`, or parses it as an absolute URL when there is
/// no base.
pub fn resolve(base: Option<&Url>, candidate: &str) -> Option<Url> {
    match base {
        Some(base) => base.join(candidate).ok(),
        None => Url::parse(candidate).ok(),
    }
}

pub fn resolves_to_valid_url(base: Option<&Url>, candidate: &str) -> bool {
    resolve(base, candidate).is_some()
}
