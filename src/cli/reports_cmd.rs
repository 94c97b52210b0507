//! Reports command handler

use serde_json::json;

use crate::application::ports::{ReportStore, StoreError};
use crate::application::ReportService;

use super::args::ReportAction;
use super::presenter::Presenter;

/// Handle reports subcommand.
///
/// Results are printed as `{"reports": [...]}` or `{"report": {...}}`;
/// failures as `{"error": "..."}` before the error is returned.
pub async fn handle_reports_command<S: ReportStore>(
    action: ReportAction,
    service: &ReportService<S>,
    presenter: &Presenter,
) -> Result<(), StoreError> {
    match action {
        ReportAction::Recent { limit } => match service.recent(limit).await {
            Ok(reports) => presenter.json(&json!({ "reports": reports })),
            Err(e) => {
                presenter.json(&json!({ "error": format!("Error fetching recent reports: {e}") }));
                return Err(e);
            }
        },
        ReportAction::Show { id } => match service.get(id).await {
            Ok(report) => presenter.json(&json!({ "report": report })),
            Err(e) => {
                presenter.json(&json!({ "error": format!("Error fetching report: {e}") }));
                return Err(e);
            }
        },
    }
    Ok(())
}
