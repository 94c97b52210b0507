//! SQLite storage adapter

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use crate::application::ports::{ReportStore, StoreError, TemplateStore};
use crate::domain::report::{NewReport, Report, ReportSummary, Template};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS templates (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reports (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    title              TEXT NOT NULL,
    raw_transcription  TEXT NOT NULL,
    processed_text     TEXT NOT NULL,
    template_name      TEXT,
    created_at         TEXT NOT NULL,
    updated_at         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_reports_created_at ON reports (created_at);
"#;

/// SQLite-backed template and report store
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Backend(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let conn = Connection::open(path).map_err(backend)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(backend)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Backend("database connection lock poisoned".to_string()))
    }
}

fn backend(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}

fn report_from_row(row: &Row<'_>) -> rusqlite::Result<Report> {
    Ok(Report {
        id: row.get(0)?,
        title: row.get(1)?,
        raw_transcription: row.get(2)?,
        processed_text: row.get(3)?,
        template_name: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

#[async_trait]
impl TemplateStore for SqliteStore {
    async fn list_templates(&self) -> Result<Vec<Template>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT name, content FROM templates ORDER BY name")
            .map_err(backend)?;

        let rows = stmt
            .query_map([], |row| Ok(Template::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(backend)?;

        let mut templates = Vec::new();
        for template in rows {
            templates.push(template.map_err(backend)?);
        }
        Ok(templates)
    }

    async fn find_template(&self, name: &str) -> Result<Option<Template>, StoreError> {
        self.conn()?
            .query_row(
                "SELECT name, content FROM templates WHERE name = ?1",
                params![name],
                |row| Ok(Template::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()
            .map_err(backend)
    }

    async fn insert_template(&self, template: &Template) -> Result<(), StoreError> {
        let now = Utc::now();
        self.conn()?
            .execute(
                "INSERT INTO templates (name, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)",
                params![template.name, template.content, now],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Conflict(format!("Template '{}'", template.name))
                } else {
                    backend(e)
                }
            })?;
        Ok(())
    }

    async fn update_template(&self, name: &str, content: &str) -> Result<(), StoreError> {
        let changed = self
            .conn()?
            .execute(
                "UPDATE templates SET content = ?1, updated_at = ?2 WHERE name = ?3",
                params![content, Utc::now(), name],
            )
            .map_err(backend)?;

        if changed == 0 {
            return Err(StoreError::NotFound(format!("Template '{name}'")));
        }
        Ok(())
    }

    async fn delete_template(&self, name: &str) -> Result<(), StoreError> {
        let changed = self
            .conn()?
            .execute("DELETE FROM templates WHERE name = ?1", params![name])
            .map_err(backend)?;

        if changed == 0 {
            return Err(StoreError::NotFound(format!("Template '{name}'")));
        }
        Ok(())
    }
}

#[async_trait]
impl ReportStore for SqliteStore {
    async fn insert_report(&self, report: &NewReport) -> Result<Report, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO reports
                (title, raw_transcription, processed_text, template_name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                report.title,
                report.raw_transcription,
                report.processed_text,
                report.template_name,
                report.created_at,
            ],
        )
        .map_err(backend)?;

        Ok(report.clone().into_report(conn.last_insert_rowid()))
    }

    async fn recent_reports(&self, limit: usize) -> Result<Vec<ReportSummary>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, title, created_at, template_name
                 FROM reports ORDER BY created_at DESC, id DESC LIMIT ?1",
            )
            .map_err(backend)?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![limit], |row| {
                let created_at: DateTime<Utc> = row.get(2)?;
                Ok(ReportSummary {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    created_at,
                    template_name: row.get(3)?,
                })
            })
            .map_err(backend)?;

        let mut reports = Vec::new();
        for report in rows {
            reports.push(report.map_err(backend)?);
        }
        Ok(reports)
    }

    async fn find_report(&self, id: i64) -> Result<Option<Report>, StoreError> {
        self.conn()?
            .query_row(
                "SELECT id, title, raw_transcription, processed_text, template_name,
                        created_at, updated_at
                 FROM reports WHERE id = ?1",
                params![id],
                report_from_row,
            )
            .optional()
            .map_err(backend)
    }
}
