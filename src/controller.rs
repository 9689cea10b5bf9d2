//! Runs one summarize request from raw form input to a terminal outcome.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::classifier::{classify, InvalidUrl, UrlKind};
use crate::document::DocumentBatch;
use crate::error::{AppError, Result, ValidationError};
use crate::fetcher::{fetch, Loaders, SourceKind, WebLoadOptions};
use crate::llm::ChatModel;
use crate::prompt::PromptTemplate;
use crate::summarize::summarize;

pub const NO_CONTENT_MESSAGE: &str = "No content found to summarize.";
pub const SUCCESS_MESSAGE: &str = "Summary generated successfully!";

/// An API key supplied with a single request. Never printed.
#[derive(Clone)]
pub struct Credentials(String);

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self(api_key.into())
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn expose(&self) -> &str {
        self.0.trim()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials(***)")
    }
}

#[derive(Debug, Clone)]
pub struct SummarizeRequest {
    pub credentials: Credentials,
    pub url: String,
}

impl SummarizeRequest {
    pub fn new(api_key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(api_key),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Fetching,
    Summarizing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::Fetching => "fetching",
            Stage::Summarizing => "summarizing",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub url: String,
    pub kind: SourceKind,
    pub summary: String,
    pub document_count: usize,
    pub word_count: usize,
    pub summarized_at: DateTime<Utc>,
}

/// Where a run ended up.
#[derive(Debug)]
pub enum Outcome {
    Success(SummaryReport),
    Warning(String),
    Error(AppError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    Success,
    Warning,
    Error,
}

impl Outcome {
    pub fn state(&self) -> TerminalState {
        match self {
            Outcome::Success(_) => TerminalState::Success,
            Outcome::Warning(_) => TerminalState::Warning,
            Outcome::Error(_) => TerminalState::Error,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Outcome::Success(_) => StatusCode::OK,
            Outcome::Warning(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Outcome::Error(err) => err.status_code(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Outcome::Success(_) => SUCCESS_MESSAGE.to_string(),
            Outcome::Warning(message) => message.clone(),
            Outcome::Error(err) => err.to_string(),
        }
    }
}

/// Shared, read-only collaborators for every request.
pub struct Pipeline {
    loaders: Loaders,
    model: Arc<dyn ChatModel>,
    template: PromptTemplate,
    web_options: WebLoadOptions,
}

impl Pipeline {
    pub fn new(
        loaders: Loaders,
        model: Arc<dyn ChatModel>,
        template: PromptTemplate,
        web_options: WebLoadOptions,
    ) -> Self {
        Self {
            loaders,
            model,
            template,
            web_options,
        }
    }

    /// Runs the pipeline on its own task so a panic anywhere still yields an outcome.
    pub async fn run_guarded(self: &Arc<Self>, request: SummarizeRequest) -> Outcome {
        let pipeline = Arc::clone(self);
        match tokio::spawn(async move { pipeline.run(request).await }).await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                let detail = if join_error.is_panic() {
                    panic_message(join_error.into_panic())
                } else {
                    join_error.to_string()
                };
                error!(%detail, "Summarize task failed");
                Outcome::Error(AppError::Unexpected(detail))
            }
        }
    }

    pub async fn run(&self, request: SummarizeRequest) -> Outcome {
        let started = std::time::Instant::now();
        let outcome = match self.execute(&request).await {
            Ok(Some(report)) => Outcome::Success(report),
            Ok(None) => Outcome::Warning(NO_CONTENT_MESSAGE.to_string()),
            Err(err) => Outcome::Error(err),
        };

        match &outcome {
            Outcome::Success(_) => info!(url = %request.url, elapsed = ?started.elapsed(), "Summary ready"),
            Outcome::Warning(message) => warn!(url = %request.url, %message, "Nothing to summarize"),
            Outcome::Error(err) => warn!(
                url = %request.url,
                error = %err,
                detail = %err.detail().unwrap_or_default(),
                "Summarize request failed"
            ),
        }
        outcome
    }

    async fn execute(&self, request: &SummarizeRequest) -> Result<Option<SummaryReport>> {
        debug!(stage = %Stage::Validating, url = %request.url);
        let kind = validate(request)?;

        debug!(stage = %Stage::Fetching, ?kind);
        let documents = fetch(&request.url, kind, &self.loaders, &self.web_options).await?;
        let Some(batch) = DocumentBatch::new(documents) else {
            return Ok(None);
        };

        debug!(stage = %Stage::Summarizing, documents = batch.count());
        let summary = summarize(&batch, &request.credentials, self.model.as_ref(), &self.template).await?;

        Ok(Some(SummaryReport {
            url: request.url.clone(),
            kind,
            summary,
            document_count: batch.count(),
            word_count: batch.word_count(),
            summarized_at: Utc::now(),
        }))
    }
}

/// Checks the form input and picks the content branch.
pub fn validate(request: &SummarizeRequest) -> std::result::Result<SourceKind, ValidationError> {
    if request.credentials.is_blank() || request.url.trim().is_empty() {
        return Err(ValidationError::MissingInput);
    }
    match classify(&request.url) {
        UrlKind::YouTube => Ok(SourceKind::YouTube),
        UrlKind::GenericWeb => Ok(SourceKind::GenericWeb),
        UrlKind::Invalid(InvalidUrl::NotAVideo) => Err(ValidationError::NotAYouTubeVideo),
        UrlKind::Invalid(InvalidUrl::Empty | InvalidUrl::Malformed) => Err(ValidationError::MalformedUrl),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_string()
    }
}
