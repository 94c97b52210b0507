//! Transcription domain module

mod normalizer;
mod prompt;

pub use normalizer::{normalize, SPOKEN_PUNCTUATION};
pub use prompt::PromptBundle;
