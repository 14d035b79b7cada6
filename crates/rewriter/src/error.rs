use std::fmt;

#[derive(Debug)]
pub enum OptionsError {
    UnknownFilter(String),
    InvalidToml(toml::de::Error),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::UnknownFilter(name) => write!(f, "unknown filter name: {name:?}"),
            OptionsError::InvalidToml(err) => write!(f, "invalid rewrite options: {err}"),
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OptionsError::UnknownFilter(_) => None,
            OptionsError::InvalidToml(err) => Some(err),
        }
    }
}

impl From<toml::de::Error> for OptionsError {
    fn from(err: toml::de::Error) -> Self {
        OptionsError::InvalidToml(err)
    }
}

#[derive(Debug)]
pub enum RewriteError {
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}

impl fmt::Display for RewriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteError::InvalidUrl { url, source } => {
                write!(f, "cannot rewrite {url:?}: {source}")
            }
        }
    }
}

impl std::error::Error for RewriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RewriteError::InvalidUrl { source, .. } => Some(source),
        }
    }
}
