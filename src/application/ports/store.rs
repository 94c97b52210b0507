//! Template and report storage port interfaces

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::report::{NewReport, Report, ReportSummary, Template};

/// Storage errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Backend(String),
}

/// Port for template persistence
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// All templates, ordered by name
    async fn list_templates(&self) -> Result<Vec<Template>, StoreError>;

    /// Look up a template by exact name
    async fn find_template(&self, name: &str) -> Result<Option<Template>, StoreError>;

    /// Insert a new template.
    /// Fails with `Conflict` if the name is taken; existing content is untouched.
    async fn insert_template(&self, template: &Template) -> Result<(), StoreError>;

    /// Replace a template's content. Fails with `NotFound` if absent.
    async fn update_template(&self, name: &str, content: &str) -> Result<(), StoreError>;

    /// Remove a template. Fails with `NotFound` if absent.
    async fn delete_template(&self, name: &str) -> Result<(), StoreError>;
}

/// Port for report persistence
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Store a generated report and return it with its assigned id
    async fn insert_report(&self, report: &NewReport) -> Result<Report, StoreError>;

    /// Most recent reports first, at most `limit`
    async fn recent_reports(&self, limit: usize) -> Result<Vec<ReportSummary>, StoreError>;

    /// Look up a report by id
    async fn find_report(&self, id: i64) -> Result<Option<Report>, StoreError>;
}

/// Blanket implementation for shared template stores
#[async_trait]
impl<T: TemplateStore + ?Sized> TemplateStore for Arc<T> {
    async fn list_templates(&self) -> Result<Vec<Template>, StoreError> {
        self.as_ref().list_templates().await
    }

    async fn find_template(&self, name: &str) -> Result<Option<Template>, StoreError> {
        self.as_ref().find_template(name).await
    }

    async fn insert_template(&self, template: &Template) -> Result<(), StoreError> {
        self.as_ref().insert_template(template).await
    }

    async fn update_template(&self, name: &str, content: &str) -> Result<(), StoreError> {
        self.as_ref().update_template(name, content).await
    }

    async fn delete_template(&self, name: &str) -> Result<(), StoreError> {
        self.as_ref().delete_template(name).await
    }
}

/// Blanket implementation for shared report stores
#[async_trait]
impl<T: ReportStore + ?Sized> ReportStore for Arc<T> {
    async fn insert_report(&self, report: &NewReport) -> Result<Report, StoreError> {
        self.as_ref().insert_report(report).await
    }

    async fn recent_reports(&self, limit: usize) -> Result<Vec<ReportSummary>, StoreError> {
        self.as_ref().recent_reports(limit).await
    }

    async fn find_report(&self, id: i64) -> Result<Option<Report>, StoreError> {
        self.as_ref().find_report(id).await
    }
}

/// A backend that keeps both templates and reports
pub trait Storage: TemplateStore + ReportStore {}

impl<T: TemplateStore + ReportStore + ?Sized> Storage for T {}
