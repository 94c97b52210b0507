//! LLM provider adapters

mod claude;
mod gemini;

pub use claude::{ClaudeProvider, ClaudeResponse, ContentBlock};
pub use gemini::{GeminiProvider, GeminiResponse};
