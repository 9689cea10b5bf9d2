pub mod api;
pub mod classifier;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod fetcher;
pub mod llm;
pub mod logging;
pub mod prompt;
pub mod scraper;
pub mod summarize;
pub mod youtube;

use std::sync::Arc;
use crate::config::Config;
use crate::controller::Pipeline;
use crate::error::{AppError, Result};
use crate::fetcher::{Loaders, WebLoadOptions};
use crate::llm::GroqChat;
use crate::prompt::PromptTemplate;
use crate::scraper::HttpWebLoader;
use crate::youtube::YouTubeTranscriptLoader;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    /// Wires the HTTP loaders and the Groq client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let loaders = Loaders {
            youtube: Arc::new(
                YouTubeTranscriptLoader::new()
                    .map_err(|e| AppError::ConfigError(format!("YouTube loader: {}", e)))?,
            ),
            web: Arc::new(
                HttpWebLoader::new()
                    .map_err(|e| AppError::ConfigError(format!("Web loader: {}", e)))?,
            ),
        };
        let model = Arc::new(GroqChat::new(config.model.clone()));
        let pipeline = Pipeline::new(
            loaders,
            model,
            PromptTemplate::summary()?,
            WebLoadOptions::from_config(&config.web),
        );
        Ok(Self::with_pipeline(pipeline))
    }

    pub fn with_pipeline(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}
