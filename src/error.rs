use axum::http::StatusCode;

/// Input problems the user can fix by correcting the form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please provide both a valid Groq API Key and a URL.")]
    MissingInput,

    #[error("Please enter a valid URL that starts with http or https.")]
    MalformedUrl,

    #[error("This is not a valid YouTube video URL.")]
    NotAYouTubeVideo,
}

/// Raised by a loader while turning a URL into documents.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with {0}")]
    Status(reqwest::StatusCode),

    #[error("no transcript available: {0}")]
    NoTranscript(String),

    #[error("could not parse response: {0}")]
    Parse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to load YouTube video content.")]
    YouTubeUnavailable(#[source] LoaderError),

    #[error("Failed to load content from the website.")]
    WebUnavailable(#[source] LoaderError),
}

impl FetchError {
    /// The loader failure behind this error, for diagnostic display.
    pub fn loader_error(&self) -> &LoaderError {
        match self {
            FetchError::YouTubeUnavailable(err) | FetchError::WebUnavailable(err) => err,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummarizationError {
    #[error("Failed to generate the summary.")]
    ModelInvocationFailed(String),
}

impl SummarizationError {
    pub fn detail(&self) -> &str {
        match self {
            SummarizationError::ModelInvocationFailed(detail) => detail,
        }
    }
}

impl From<reqwest::Error> for SummarizationError {
    fn from(err: reqwest::Error) -> Self {
        SummarizationError::ModelInvocationFailed(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Summarization(#[from] SummarizationError),

    #[error("An unexpected error occurred.")]
    Unexpected(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Fetch(_) | AppError::Summarization(_) => StatusCode::BAD_GATEWAY,
            AppError::Unexpected(_) | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Extra diagnostic text shown under the user-facing message, if any.
    pub fn detail(&self) -> Option<String> {
        match self {
            AppError::Validation(_) => None,
            AppError::Fetch(err) => Some(err.loader_error().to_string()),
            AppError::Summarization(err) => Some(err.detail().to_string()),
            AppError::Unexpected(detail) | AppError::ConfigError(detail) => Some(detail.clone()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
