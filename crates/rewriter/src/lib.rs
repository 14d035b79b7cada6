//! Streaming HTML rewrite filters.
//!
//! A [`RewriteDriver`] parses a document with [`html::parse_with`] and hands every
//! element boundary to its filter chain while the tree is still being built. Filters
//! edit the arena in place:
//! - [`PrioritizeLcpImagesFilter`] promotes the first eligible body image.
//! - [`StripLegacyPolyfillsFilter`] deletes scripts that load legacy polyfills.

pub mod eligibility;
pub mod urls;

mod driver;
mod error;
mod filter;
mod host;
mod lcp;
mod log_record;
mod options;
mod polyfills;

pub use crate::driver::RewriteDriver;
pub use crate::error::{OptionsError, RewriteError};
pub use crate::filter::{FilterContext, RewriteFilter};
pub use crate::host::{DefaultHost, RewriteHost};
pub use crate::lcp::{PrioritizeLcpImagesFilter, Region};
pub use crate::log_record::{LogRecord, RewriterApplication};
pub use crate::options::{Filter, RewriteOptions};
pub use crate::polyfills::StripLegacyPolyfillsFilter;
