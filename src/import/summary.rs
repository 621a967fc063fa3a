use crate::models::RowError;

/// Rejection reasons printed after an import unless asked otherwise.
pub const DEFAULT_REJECTION_LIMIT: usize = 10;

/// One source line that did not make it into the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number in the source file.
    pub line: usize,
    pub raw: String,
    pub reason: RowError
}

/// Outcome of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Valid data rows, duplicates included.
    pub accepted: usize,
    pub rejected: usize,
    /// Rows the store reported as written, one per distinct order id.
    pub written: usize,
    /// Accepted rows superseded by a later row with the same order id.
    pub duplicates: usize,
    pub rejections: Vec<RejectedLine>
}

impl ImportSummary {
    /// The first `limit` rejections, or all of them when `limit` is `None`.
    pub fn rejection_report(&self, limit: Option<usize>) -> &[RejectedLine] {
        let end = limit.map_or(self.rejections.len(), |limit| limit.min(self.rejections.len()));

        &self.rejections[..end]
    }
}
