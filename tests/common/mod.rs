#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use link_summarizer::config::WebFetchConfig;
use link_summarizer::controller::{Credentials, Pipeline};
use link_summarizer::document::Document;
use link_summarizer::error::{LoaderError, SummarizationError};
use link_summarizer::fetcher::{Loaders, TranscriptLoader, WebLoadOptions, WebLoader};
use link_summarizer::llm::ChatModel;
use link_summarizer::prompt::PromptTemplate;
use tokio::net::TcpListener;

pub enum LoaderReply {
    Documents(Vec<Document>),
    Fail,
    Panic,
}

/// Loader stub that counts calls, keeps the web options it was given and returns a canned reply.
pub struct StubLoader {
    reply: LoaderReply,
    calls: AtomicUsize,
    web_options: Mutex<Vec<WebLoadOptions>>,
}

impl StubLoader {
    pub fn new(reply: LoaderReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            web_options: Mutex::new(Vec::new()),
        })
    }

    pub fn returning(texts: &[&str]) -> Arc<Self> {
        let documents = texts
            .iter()
            .map(|text| Document::from_source("stub", *text))
            .collect();
        Self::new(LoaderReply::Documents(documents))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn web_options(&self) -> Vec<WebLoadOptions> {
        self.web_options.lock().unwrap().clone()
    }

    fn respond(&self) -> Result<Vec<Document>, LoaderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            LoaderReply::Documents(documents) => Ok(documents.clone()),
            LoaderReply::Fail => Err(LoaderError::NoTranscript("stub loader failure".to_string())),
            LoaderReply::Panic => panic!("stub loader exploded"),
        }
    }
}

#[async_trait]
impl TranscriptLoader for StubLoader {
    async fn load(&self, _url: &str, include_metadata: bool) -> Result<Vec<Document>, LoaderError> {
        assert!(include_metadata);
        self.respond()
    }
}

#[async_trait]
impl WebLoader for StubLoader {
    async fn load(&self, urls: &[String], options: &WebLoadOptions) -> Result<Vec<Document>, LoaderError> {
        assert_eq!(urls.len(), 1);
        self.web_options.lock().unwrap().push(options.clone());
        self.respond()
    }
}

/// Model stub that records every prompt it receives.
pub struct StubModel {
    reply: Result<String, SummarizationError>,
    prompts: Mutex<Vec<String>>,
}

impl StubModel {
    pub fn replying(summary: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(summary.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(SummarizationError::ModelInvocationFailed(detail.to_string())),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for StubModel {
    async fn run(&self, credentials: &Credentials, prompt: &str) -> Result<String, SummarizationError> {
        assert!(!credentials.is_blank());
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}

pub fn pipeline(youtube: Arc<StubLoader>, web: Arc<StubLoader>, model: Arc<StubModel>) -> Pipeline {
    pipeline_with_web(youtube, web, model, &WebFetchConfig::default())
}

pub fn pipeline_with_web(
    youtube: Arc<StubLoader>,
    web: Arc<StubLoader>,
    model: Arc<StubModel>,
    web_config: &WebFetchConfig,
) -> Pipeline {
    Pipeline::new(
        Loaders { youtube, web },
        model,
        PromptTemplate::summary().unwrap(),
        WebLoadOptions::from_config(web_config),
    )
}

/// Serves `router` on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}
