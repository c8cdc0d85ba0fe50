//! Per-status counts for a batch.

use serde::Serialize;

use crate::creator::CreateResult;
use crate::retriever::RetrieveResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    /// Created or retrieved.
    pub succeeded: usize,
    pub skipped: usize,
    pub errors: usize,
    pub previewed: usize,
}

impl BatchSummary {
    fn count<'s>(statuses: impl Iterator<Item = &'s str>) -> Self {
        let mut summary = Self::default();
        for status in statuses {
            summary.total += 1;
            match status {
                "skipped" => summary.skipped += 1,
                "error" => summary.errors += 1,
                "preview" => summary.previewed += 1,
                _ => summary.succeeded += 1,
            }
        }
        summary
    }

    #[must_use]
    pub fn of_created(results: &[CreateResult]) -> Self {
        Self::count(results.iter().map(CreateResult::status))
    }

    #[must_use]
    pub fn of_retrieved(results: &[RetrieveResult]) -> Self {
        Self::count(results.iter().map(RetrieveResult::status))
    }
}
