//! Rewrite options: which filters run for a document.
//!
//! Options can be built in code, loaded from TOML, or adjusted with a comma-separated
//! filter list where `+name` enables, `-name` disables and a bare `name` enables.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::error::OptionsError;

/// Known filters, in the order they are added to a driver's chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    PrioritizeLcpImages,
    StripLegacyPolyfills,
}

impl Filter {
    pub const ALL: [Filter; 2] = [Filter::PrioritizeLcpImages, Filter::StripLegacyPolyfills];

    /// Option name, as used in filter lists and TOML.
    pub fn name(self) -> &'static str {
        match self {
            Filter::PrioritizeLcpImages => "prioritize_lcp_images",
            Filter::StripLegacyPolyfills => "strip_legacy_polyfills",
        }
    }

    /// Short id used in log records.
    pub fn id(self) -> &'static str {
        match self {
            Filter::PrioritizeLcpImages => "pl",
            Filter::StripLegacyPolyfills => "sp",
        }
    }

    /// Looks a filter up by option name or id (ASCII case-insensitive).
    pub fn from_name(name: &str) -> Option<Filter> {
        Filter::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name) || f.id().eq_ignore_ascii_case(name))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteOptions {
    enabled_filters: BTreeSet<Filter>,
}

impl RewriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(source: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(source)?)
    }

    pub fn enable_filter(&mut self, filter: Filter) {
        self.enabled_filters.insert(filter);
    }

    pub fn disable_filter(&mut self, filter: Filter) {
        self.enabled_filters.remove(&filter);
    }

    pub fn enabled(&self, filter: Filter) -> bool {
        self.enabled_filters.contains(&filter)
    }

    /// Enabled filters in chain order.
    pub fn enabled_filters(&self) -> impl Iterator<Item = Filter> + '_ {
        self.enabled_filters.iter().copied()
    }

    /// Applies a list such as `"+prioritize_lcp_images,-strip_legacy_polyfills"`.
    ///
    /// The list is validated as a whole; on error the options are left unchanged.
    pub fn adjust_filters_by_comma_separated_list(
        &mut self,
        list: &str,
    ) -> Result<(), OptionsError> {
        let mut changes = Vec::new();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (enable, name) = if let Some(name) = entry.strip_prefix('+') {
                (true, name.trim())
            } else if let Some(name) = entry.strip_prefix('-') {
                (false, name.trim())
            } else {
                (true, entry)
            };
            let filter = Filter::from_name(name)
                .ok_or_else(|| OptionsError::UnknownFilter(name.to_string()))?;
            changes.push((enable, filter));
        }
        for (enable, filter) in changes {
            if enable {
                self.enable_filter(filter);
            } else {
                self.disable_filter(filter);
            }
        }
        Ok(())
    }
}
