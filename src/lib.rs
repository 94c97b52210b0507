//! RadScribe - dictated radiology text to structured reports
//!
//! This crate normalizes speech-to-text output, builds a template-guided
//! prompt, asks an LLM (Anthropic Claude or Google Gemini) to write the
//! report and stores the result alongside the dictation.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Normalization, prompts, reports, templates and config values
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (Claude, Gemini, SQLite, XDG config)
//! - **CLI**: Command-line interface, argument parsing and output

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
