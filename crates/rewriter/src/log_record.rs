//! Per-document record of what each filter did.

use std::collections::BTreeMap;

use crate::options::Filter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewriterApplication {
    /// The filter ran but had nothing to change.
    NotApplied,
    AppliedOk,
}

#[derive(Debug, Default)]
pub struct LogRecord {
    statuses: BTreeMap<Filter, RewriterApplication>,
}

impl LogRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the latest status for `filter`, replacing any earlier one.
    pub fn set_rewriter_logging_status(&mut self, filter: Filter, status: RewriterApplication) {
        let previous = self.statuses.insert(filter, status);
        if previous != Some(status) {
            log::debug!(
                target: "rewriter.log_record",
                "{} ({}): {:?}",
                filter.name(),
                filter.id(),
                status
            );
        }
    }

    pub fn status(&self, filter: Filter) -> Option<RewriterApplication> {
        self.statuses.get(&filter).copied()
    }

    pub fn statuses(&self) -> impl Iterator<Item = (Filter, RewriterApplication)> + '_ {
        self.statuses.iter().map(|(&filter, &status)| (filter, status))
    }

    pub fn clear(&mut self) {
        self.statuses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_status_replaces_earlier() {
        let mut record = LogRecord::new();
        assert_eq!(record.status(Filter::PrioritizeLcpImages), None);

        let filter = Filter::PrioritizeLcpImages;
        record.set_rewriter_logging_status(filter, RewriterApplication::NotApplied);
        record.set_rewriter_logging_status(filter, RewriterApplication::AppliedOk);
        assert_eq!(
            record.statuses().collect::<Vec<_>>(),
            [(Filter::PrioritizeLcpImages, RewriterApplication::AppliedOk)]
        );

        record.clear();
        assert_eq!(record.statuses().count(), 0);
    }
}
