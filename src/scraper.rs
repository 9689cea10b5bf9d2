use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use scraper::{Html, Selector};
use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::document::{Document, DocumentMetadata};
use crate::error::LoaderError;
use crate::fetcher::{WebLoadOptions, WebLoader};

// Create static selectors to avoid recompiling them each time
static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body").expect("Failed to parse body selector")
});

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("head > title, title").expect("Failed to parse title selector")
});

const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "svg"];

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol",
    "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Text pulled out of an HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: Option<String>,
    pub text: String,
}

/// Fetches pages over HTTP and keeps their visible text.
pub struct HttpWebLoader {
    strict: Client,
    relaxed: Client,
}

impl HttpWebLoader {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            strict: build_client(false)?,
            relaxed: build_client(true)?,
        })
    }

    fn client(&self, verify_tls: bool) -> &Client {
        if verify_tls { &self.strict } else { &self.relaxed }
    }

    async fn fetch_html(&self, url: &str, options: &WebLoadOptions) -> Result<String, LoaderError> {
        let response = self
            .client(options.verify_tls)
            .get(url)
            .headers(options.headers.clone())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::Status(status));
        }
        let html = response.text().await?;
        Ok(html)
    }
}

fn build_client(accept_invalid_certs: bool) -> Result<Client, reqwest::Error> {
    ClientBuilder::new()
        .danger_accept_invalid_certs(accept_invalid_certs)
        .pool_max_idle_per_host(10)
        .build()
}

#[async_trait]
impl WebLoader for HttpWebLoader {
    async fn load(&self, urls: &[String], options: &WebLoadOptions) -> Result<Vec<Document>, LoaderError> {
        let mut documents = Vec::with_capacity(urls.len());
        for url in urls {
            info!(%url, verify_tls = options.verify_tls, "Fetching web page");
            let html = self.fetch_html(url, options).await?;
            let page = extract_page(&html);
            debug!(%url, chars = page.text.len(), "Extracted page text");
            if page.text.is_empty() {
                continue;
            }
            documents.push(Document::new(
                page.text,
                DocumentMetadata {
                    source: url.clone(),
                    title: page.title,
                    author: None,
                },
            ));
        }
        Ok(documents)
    }
}

pub fn extract_page(html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| format_text(&element.text().collect::<String>()))
        .filter(|title| !title.is_empty());

    let text = document
        .select(&BODY_SELECTOR)
        .next()
        .map(|body| format_text(&visible_text(body)))
        .unwrap_or_default();

    ExtractedPage { title, text }
}

fn visible_text(body: scraper::ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in body.descendants() {
        if let Some(element) = node.value().as_element() {
            if BLOCK_ELEMENTS.contains(&element.name()) {
                raw.push('\n');
            }
            continue;
        }
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if !hidden {
            raw.push_str(text);
        }
    }
    raw
}

/// Collapses runs of whitespace and drops blank lines.
pub fn format_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for line in text.lines() {
        let mut words = line.split_whitespace().peekable();
        if words.peek().is_none() {
            continue;
        }
        if !result.is_empty() {
            result.push('\n');
        }
        for (i, word) in words.enumerate() {
            if i > 0 {
                result.push(' ');
            }
            result.push_str(word);
        }
    }

    result
}
