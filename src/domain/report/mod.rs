//! Report domain module

mod extract;
mod entity;
mod template;

pub use extract::join_text_segments;
pub use entity::{derive_title, NewReport, Report, ReportSummary, DEFAULT_TITLE, MAX_TITLE_CHARS};
pub use template::{default_templates, Template};
