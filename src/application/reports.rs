//! Report lookup use cases

use crate::domain::report::{Report, ReportSummary};

use super::ports::{ReportStore, StoreError};

/// Number of reports listed when no limit is given
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Read access to stored reports
pub struct ReportService<S: ReportStore> {
    store: S,
}

impl<S: ReportStore> ReportService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Newest reports first, metadata only
    pub async fn recent(&self, limit: usize) -> Result<Vec<ReportSummary>, StoreError> {
        self.store.recent_reports(limit).await
    }

    /// Full report by id.
    ///
    /// # Errors
    /// `NotFound` when no report has this id.
    pub async fn get(&self, id: i64) -> Result<Report, StoreError> {
        self.store
            .find_report(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Report {id}")))
    }
}
