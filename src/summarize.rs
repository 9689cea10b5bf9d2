use tracing::{info, warn};

use crate::controller::Credentials;
use crate::document::DocumentBatch;
use crate::error::SummarizationError;
use crate::llm::ChatModel;
use crate::prompt::PromptTemplate;

/// Stuffs every document into one prompt and asks the model once.
pub async fn summarize(
    documents: &DocumentBatch,
    credentials: &Credentials,
    model: &dyn ChatModel,
    template: &PromptTemplate,
) -> Result<String, SummarizationError> {
    let prompt = template.render_documents(documents);
    info!(
        documents = documents.count(),
        words = documents.word_count(),
        prompt_chars = prompt.len(),
        "Requesting summary"
    );

    let started = std::time::Instant::now();
    match model.run(credentials, &prompt).await {
        Ok(summary) => {
            info!(elapsed = ?started.elapsed(), "Summary received");
            Ok(summary)
        }
        Err(err) => {
            warn!(elapsed = ?started.elapsed(), error = %err.detail(), "Model call failed");
            Err(err)
        }
    }
}
