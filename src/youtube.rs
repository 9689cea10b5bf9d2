//! YouTube transcripts read from the caption tracks of a watch page.

use std::borrow::Cow;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::classifier::youtube_video_id;
use crate::config::DEFAULT_USER_AGENT;
use crate::document::{Document, DocumentMetadata};
use crate::error::LoaderError;
use crate::fetcher::TranscriptLoader;

pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

static PLAYER_RESPONSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"ytInitialPlayerResponse\s*=\s*").expect("Failed to compile player response pattern")
});

pub struct YouTubeTranscriptLoader {
    client: Client,
    base_url: Url,
    languages: Vec<String>,
}

impl YouTubeTranscriptLoader {
    pub fn new() -> Result<Self, LoaderError> {
        Self::with_base_url(YOUTUBE_BASE_URL)
    }

    /// Point the loader at a different host, e.g. a local test server.
    pub fn with_base_url(base_url: &str) -> Result<Self, LoaderError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| LoaderError::Parse(format!("invalid base url {}: {}", base_url, e)))?;
        let client = Client::builder().user_agent(DEFAULT_USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url,
            languages: vec!["en".to_string()],
        })
    }

    async fn get_text(&self, url: Url) -> Result<String, LoaderError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::Status(status));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl TranscriptLoader for YouTubeTranscriptLoader {
    async fn load(&self, url: &str, include_metadata: bool) -> Result<Vec<Document>, LoaderError> {
        let video_id = youtube_video_id(url)
            .ok_or_else(|| LoaderError::Parse(format!("no video id in {}", url)))?;
        info!(%video_id, "Fetching YouTube transcript");

        let mut watch_url = self
            .base_url
            .join("/watch")
            .map_err(|e| LoaderError::Parse(e.to_string()))?;
        watch_url.query_pairs_mut().append_pair("v", video_id);
        let page = self.get_text(watch_url).await?;

        let player = extract_player_response(&page)?;
        let track_url = caption_track_url(&player, &self.languages)?;
        let track_url = self
            .base_url
            .join(&track_url)
            .map_err(|e| LoaderError::Parse(format!("invalid caption track url: {}", e)))?;

        let captions = self.get_text(track_url).await?;
        let transcript = parse_transcript(&captions)?;
        debug!(%video_id, chars = transcript.len(), "Parsed transcript");
        if transcript.is_empty() {
            return Ok(Vec::new());
        }

        let mut metadata = DocumentMetadata {
            source: video_id.to_string(),
            ..Default::default()
        };
        if include_metadata {
            let details = &player["videoDetails"];
            metadata.title = details["title"].as_str().map(str::to_string);
            metadata.author = details["author"].as_str().map(str::to_string);
        }

        Ok(vec![Document::new(transcript, metadata)])
    }
}

/// Reads the `ytInitialPlayerResponse` object embedded in a watch page.
pub fn extract_player_response(page: &str) -> Result<Value, LoaderError> {
    let start = PLAYER_RESPONSE
        .find(page)
        .ok_or_else(|| LoaderError::NoTranscript("player response not found in watch page".to_string()))?
        .end();
    // Parse exactly one JSON value and ignore whatever script follows it.
    serde_json::Deserializer::from_str(&page[start..])
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| LoaderError::Parse("empty player response".to_string()))?
        .map_err(|e| LoaderError::Parse(format!("player response: {}", e)))
}

/// Picks a caption track in one of `languages`, falling back to the first track.
pub fn caption_track_url(player: &Value, languages: &[String]) -> Result<String, LoaderError> {
    if let Some(status) = player.pointer("/playabilityStatus/status").and_then(Value::as_str) {
        if status != "OK" {
            let reason = player
                .pointer("/playabilityStatus/reason")
                .and_then(Value::as_str)
                .unwrap_or(status);
            return Err(LoaderError::NoTranscript(format!("video is unavailable: {}", reason)));
        }
    }

    let tracks = player
        .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks")
        .and_then(Value::as_array)
        .filter(|tracks| !tracks.is_empty())
        .ok_or_else(|| LoaderError::NoTranscript("video has no caption tracks".to_string()))?;

    let preferred = tracks.iter().find(|track| {
        track["languageCode"]
            .as_str()
            .is_some_and(|code| languages.iter().any(|lang| code == lang || code.starts_with(&format!("{}-", lang))))
    });

    preferred
        .unwrap_or(&tracks[0])
        .get("baseUrl")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| LoaderError::Parse("caption track has no baseUrl".to_string()))
}

/// Joins the cues of a timed-text caption document into one line of text.
pub fn parse_transcript(xml: &str) -> Result<String, LoaderError> {
    let mut reader = Reader::from_str(xml);
    let mut cues = Vec::new();
    let mut cue: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if is_cue(e.local_name().as_ref()) => cue = Some(String::new()),
            Ok(Event::End(e)) if is_cue(e.local_name().as_ref()) => {
                if let Some(text) = cue.take() {
                    cues.push(clean_cue(&text));
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(text) = cue.as_mut() {
                    let unescaped = e
                        .unescape()
                        .map_err(|err| LoaderError::Parse(format!("caption text: {}", err)))?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(text) = cue.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(LoaderError::Parse(format!(
                    "caption document at position {}: {}",
                    reader.buffer_position(),
                    err
                )));
            }
            _ => {}
        }
    }

    Ok(cues
        .iter()
        .flat_map(|cue| cue.split_whitespace())
        .collect::<Vec<_>>()
        .join(" "))
}

fn is_cue(name: &[u8]) -> bool {
    matches!(name, b"text" | b"p")
}

/// Cue text is often escaped a second time, so decode once more and drop any
/// formatting tags that decoding uncovers.
fn clean_cue(text: &str) -> String {
    let decoded = unescape(text).unwrap_or(Cow::Borrowed(text));
    if !decoded.contains('<') {
        return decoded.into_owned();
    }

    let mut reader = Reader::from_str(&decoded);
    reader.check_end_names(false);
    let mut plain = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => plain.push_str(&String::from_utf8_lossy(&e.into_inner())),
            Ok(Event::CData(e)) => plain.push_str(&String::from_utf8_lossy(&e.into_inner())),
            Ok(Event::Eof) => return plain,
            // A bare `<` in spoken text is not markup.
            Err(_) => return decoded.to_string(),
            _ => {}
        }
    }
}
