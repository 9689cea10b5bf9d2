use crate::document::DocumentBatch;
use crate::error::{AppError, Result};

pub const SUMMARY_TEMPLATE: &str =
    "Please summarize the following content in approximately 300 words:\n\n{text}";

const TEXT_SLOT: &str = "{text}";

/// A prompt with a single `{text}` slot, built once at startup.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        match template.matches(TEXT_SLOT).count() {
            1 => Ok(Self { template }),
            n => Err(AppError::ConfigError(format!(
                "Prompt template must contain exactly one {} slot, found {}",
                TEXT_SLOT, n
            ))),
        }
    }

    pub fn summary() -> Result<Self> {
        Self::new(SUMMARY_TEMPLATE)
    }

    pub fn render(&self, text: &str) -> String {
        let mut result = String::with_capacity(self.template.len() + text.len());
        if let Some((before, after)) = self.template.split_once(TEXT_SLOT) {
            result.push_str(before);
            result.push_str(text);
            result.push_str(after);
        }
        result
    }

    /// Stuff every document into one prompt.
    pub fn render_documents(&self, documents: &DocumentBatch) -> String {
        self.render(&documents.joined_text())
    }
}
