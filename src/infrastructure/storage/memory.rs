//! In-memory storage adapter
//!
//! Keeps templates and reports in process memory. Contents are lost when the
//! process exits; clones share the same underlying collections.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::application::ports::{ReportStore, StoreError, TemplateStore};
use crate::domain::report::{NewReport, Report, ReportSummary, Template};

#[derive(Default)]
struct State {
    templates: BTreeMap<String, String>,
    reports: Vec<Report>,
    next_id: i64,
}

/// Shared in-memory template and report store
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl TemplateStore for InMemoryStore {
    async fn list_templates(&self) -> Result<Vec<Template>, StoreError> {
        Ok(self
            .state()?
            .templates
            .iter()
            .map(|(name, content)| Template::new(name.as_str(), content.as_str()))
            .collect())
    }

    async fn find_template(&self, name: &str) -> Result<Option<Template>, StoreError> {
        Ok(self
            .state()?
            .templates
            .get(name)
            .map(|content| Template::new(name, content.as_str())))
    }

    async fn insert_template(&self, template: &Template) -> Result<(), StoreError> {
        let mut state = self.state()?;
        if state.templates.contains_key(&template.name) {
            return Err(StoreError::Conflict(format!(
                "Template '{}'",
                template.name
            )));
        }
        state
            .templates
            .insert(template.name.clone(), template.content.clone());
        Ok(())
    }

    async fn update_template(&self, name: &str, content: &str) -> Result<(), StoreError> {
        match self.state()?.templates.get_mut(name) {
            Some(existing) => {
                *existing = content.to_string();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("Template '{name}'"))),
        }
    }

    async fn delete_template(&self, name: &str) -> Result<(), StoreError> {
        self.state()?
            .templates
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("Template '{name}'")))
    }
}

#[async_trait]
impl ReportStore for InMemoryStore {
    async fn insert_report(&self, report: &NewReport) -> Result<Report, StoreError> {
        let mut state = self.state()?;
        state.next_id += 1;
        let stored = report.clone().into_report(state.next_id);
        state.reports.push(stored.clone());
        Ok(stored)
    }

    async fn recent_reports(&self, limit: usize) -> Result<Vec<ReportSummary>, StoreError> {
        let state = self.state()?;
        let mut reports: Vec<&Report> = state.reports.iter().collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(reports
            .into_iter()
            .take(limit)
            .map(Report::summary)
            .collect())
    }

    async fn find_report(&self, id: i64) -> Result<Option<Report>, StoreError> {
        Ok(self
            .state()?
            .reports
            .iter()
            .find(|report| report.id == id)
            .cloned())
    }
}
