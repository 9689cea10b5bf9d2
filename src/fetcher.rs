//! Turns a classified URL into documents through one of two loaders.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::WebFetchConfig;
use crate::document::Document;
use crate::error::{FetchError, LoaderError};

/// Which content branch a URL goes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceKind {
    #[serde(rename = "youtube")]
    YouTube,
    #[serde(rename = "web")]
    GenericWeb,
}

#[async_trait]
pub trait TranscriptLoader: Send + Sync {
    async fn load(&self, url: &str, include_metadata: bool) -> Result<Vec<Document>, LoaderError>;
}

#[async_trait]
pub trait WebLoader: Send + Sync {
    async fn load(&self, urls: &[String], options: &WebLoadOptions) -> Result<Vec<Document>, LoaderError>;
}

#[derive(Debug, Clone)]
pub struct WebLoadOptions {
    pub verify_tls: bool,
    pub headers: HeaderMap,
}

impl WebLoadOptions {
    pub fn from_config(config: &WebFetchConfig) -> Self {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&config.user_agent) {
            Ok(value) => {
                headers.insert(USER_AGENT, value);
            }
            Err(_) => warn!(user_agent = %config.user_agent, "Ignoring unusable user agent"),
        }
        Self {
            verify_tls: config.verify_tls,
            headers,
        }
    }
}

/// Both loaders, shared across requests.
#[derive(Clone)]
pub struct Loaders {
    pub youtube: Arc<dyn TranscriptLoader>,
    pub web: Arc<dyn WebLoader>,
}

pub async fn fetch(
    url: &str,
    kind: SourceKind,
    loaders: &Loaders,
    options: &WebLoadOptions,
) -> Result<Vec<Document>, FetchError> {
    let documents = match kind {
        SourceKind::YouTube => loaders
            .youtube
            .load(url, true)
            .await
            .map_err(FetchError::YouTubeUnavailable)?,
        SourceKind::GenericWeb => loaders
            .web
            .load(&[url.to_string()], options)
            .await
            .map_err(FetchError::WebUnavailable)?,
    };
    debug!(?kind, count = documents.len(), "Loaded documents");
    Ok(documents)
}
