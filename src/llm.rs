use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use reqwest::Client;
use tracing::debug;

use crate::config::ModelConfig;
use crate::controller::Credentials;
use crate::error::SummarizationError;

/// A hosted chat model that turns one prompt into one reply.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn run(&self, credentials: &Credentials, prompt: &str) -> Result<String, SummarizationError>;
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Groq's OpenAI-compatible chat completions endpoint.
pub struct GroqChat {
    client: Client,
    config: ModelConfig,
}

impl GroqChat {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatModel for GroqChat {
    async fn run(&self, credentials: &Credentials, prompt: &str) -> Result<String, SummarizationError> {
        let body = ChatRequest {
            model: &self.config.model_id,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.config.model_id, prompt_chars = prompt.len(), "Calling chat completions");
        let res = self
            .client
            .post(self.endpoint())
            .bearer_auth(credentials.expose())
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(SummarizationError::ModelInvocationFailed(format!(
                "model API responded with {}: {}",
                status, message
            )));
        }

        let json: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            SummarizationError::ModelInvocationFailed(format!("Invalid response from model API: {}", e))
        })?;
        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| SummarizationError::ModelInvocationFailed("Invalid response format from LLM".to_string()))?
            .to_string();

        if reply.trim().is_empty() {
            return Err(SummarizationError::ModelInvocationFailed("Model returned an empty summary".to_string()));
        }

        Ok(reply)
    }
}
