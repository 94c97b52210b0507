//! Report prompt value object

/// Fixed instruction describing how the model should write the report
const SYSTEM_INSTRUCTION: &str = r#"You are an expert radiologist writing a radiology report. Convert transcribed speech into a professional report.

Follow these guidelines:
- Remove speech artifacts (um, uh, pauses, repetitions)
- Write in clear, natural prose paragraphs
- Use standard medical terminology
- Be concise and clear
- If something is not mentioned, state it as normal
- Use precise measurements if provided
- Highlight any critical findings
- End with a brief impression
- Start directly with the findings"#;

/// Lead-in placed before the dictated text
const USER_PREAMBLE: &str =
    "Here is the transcribed speech to convert into a professional radiology report:";

/// Lead-in placed before a template body
const TEMPLATE_PREAMBLE: &str = "Use the following template structure:";

/// Closing style directive
const STYLE_DIRECTIVE: &str = "Please write in a natural, flowing style as a radiologist would dictate. Avoid breaking the report into many sections.";

/// Value object holding the two halves of a report-generation prompt.
/// Built per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBundle {
    system_instruction: String,
    user_content: String,
}

impl PromptBundle {
    /// Build the prompt for normalized dictation, optionally steered by a template
    pub fn build(normalized_text: &str, template: Option<&str>) -> Self {
        let template_instruction = template
            .filter(|content| !content.trim().is_empty())
            .map(|content| format!("\n{TEMPLATE_PREAMBLE}\n{content}"))
            .unwrap_or_default();

        let user_content = format!(
            "{USER_PREAMBLE}\n\n{normalized_text}{template_instruction}\n\n{STYLE_DIRECTIVE}"
        );

        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_content,
        }
    }

    /// Get the system instruction
    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Get the user message
    pub fn user_content(&self) -> &str {
        &self.user_content
    }

    /// Whether a template structure was appended to the user message
    pub fn has_template(&self) -> bool {
        self.user_content.contains(TEMPLATE_PREAMBLE)
    }

    /// Render both halves as a single prompt string
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system_instruction, self.user_content)
    }
}
