//! Templates command handler

use std::path::PathBuf;

use serde_json::json;
use thiserror::Error;

use crate::application::ports::{StoreError, TemplateStore};
use crate::application::TemplateService;
use crate::domain::report::Template;

use super::args::{ContentSource, TemplateAction};
use super::presenter::Presenter;

/// Errors from template commands
#[derive(Debug, Error)]
pub enum TemplateCommandError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to read template file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Template content must not be empty")]
    EmptyContent,
}

/// Handle templates subcommand
pub async fn handle_templates_command<S: TemplateStore>(
    action: TemplateAction,
    service: &TemplateService<S>,
    presenter: &Presenter,
) -> Result<(), TemplateCommandError> {
    match action {
        TemplateAction::List => {
            let templates = service.list().await?;
            presenter.json(&templates);
        }
        TemplateAction::Add { name, source } => {
            let content = read_content(source).await?;
            let created = service.create(Template::new(name, content)).await?;
            presenter.json(&created);
        }
        TemplateAction::Update { name, source } => {
            let content = read_content(source).await?;
            service.update(&name, &content).await?;
            presenter.json(&json!({
                "message": format!("Template '{name}' updated successfully")
            }));
        }
        TemplateAction::Delete { name } => {
            service.delete(&name).await?;
            presenter.json(&json!({
                "message": format!("Template '{name}' deleted successfully")
            }));
        }
    }
    Ok(())
}

async fn read_content(source: ContentSource) -> Result<String, TemplateCommandError> {
    let content = match (source.content, source.file) {
        (Some(content), _) => content,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| TemplateCommandError::ReadFile { path, source })?,
        (None, None) => String::new(),
    };

    if content.trim().is_empty() {
        return Err(TemplateCommandError::EmptyContent);
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryStore;
    use tempfile::tempdir;

    fn inline(content: &str) -> ContentSource {
        ContentSource {
            content: Some(content.to_string()),
            file: None,
        }
    }

    #[tokio::test]
    async fn add_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("knee.md");
        std::fs::write(&path, "## Findings\n[findings]").unwrap();

        let store = InMemoryStore::new();
        let service = TemplateService::new(store.clone());
        handle_templates_command(
            TemplateAction::Add {
                name: "knee".to_string(),
                source: ContentSource {
                    content: None,
                    file: Some(path),
                },
            },
            &service,
            &Presenter::new(),
        )
        .await
        .unwrap();

        let stored = store.find_template("knee").await.unwrap().unwrap();
        assert_eq!(stored.content, "## Findings\n[findings]");
    }

    #[tokio::test]
    async fn missing_file_reported() {
        let service = TemplateService::new(InMemoryStore::new());
        let err = handle_templates_command(
            TemplateAction::Add {
                name: "knee".to_string(),
                source: ContentSource {
                    content: None,
                    file: Some(PathBuf::from("/nonexistent/knee.md")),
                },
            },
            &service,
            &Presenter::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TemplateCommandError::ReadFile { .. }));
    }

    #[tokio::test]
    async fn blank_content_rejected() {
        let service = TemplateService::new(InMemoryStore::new());
        let err = handle_templates_command(
            TemplateAction::Add {
                name: "knee".to_string(),
                source: inline("   "),
            },
            &service,
            &Presenter::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TemplateCommandError::EmptyContent));
    }

    #[tokio::test]
    async fn update_missing_template() {
        let service = TemplateService::new(InMemoryStore::new());
        let err = handle_templates_command(
            TemplateAction::Update {
                name: "knee".to_string(),
                source: inline("[findings]"),
            },
            &service,
            &Presenter::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            TemplateCommandError::Store(StoreError::NotFound(_))
        ));
    }
}
