//! Decides whether user input is a usable URL and which loader handles it.

use once_cell::sync::Lazy;
use regex::Regex;
use url::{Host, Url};

static YOUTUBE_VIDEO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com/watch\?v=|youtu\.be/)(?P<id>[\w-]{11})")
        .expect("Failed to compile YouTube video pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Invalid(InvalidUrl),
    GenericWeb,
    YouTube,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidUrl {
    Empty,
    Malformed,
    /// Mentions YouTube but does not have the shape of a video link.
    NotAVideo,
}

pub fn classify(url: &str) -> UrlKind {
    if url.is_empty() {
        return UrlKind::Invalid(InvalidUrl::Empty);
    }
    if !is_valid_url(url) {
        return UrlKind::Invalid(InvalidUrl::Malformed);
    }
    // Anything mentioning YouTube must be a video link; it never falls back to a plain page fetch.
    if mentions_youtube(url) {
        return if YOUTUBE_VIDEO.is_match(url) {
            UrlKind::YouTube
        } else {
            UrlKind::Invalid(InvalidUrl::NotAVideo)
        };
    }
    UrlKind::GenericWeb
}

pub fn mentions_youtube(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be")
}

/// The 11 character video id of a YouTube video link.
pub fn youtube_video_id(url: &str) -> Option<&str> {
    YOUTUBE_VIDEO
        .captures(url)
        .and_then(|caps| caps.name("id"))
        .map(|id| id.as_str())
}

/// Absolute http(s) URL with a plausible host and no embedded whitespace.
pub fn is_valid_url(url: &str) -> bool {
    // `Url::parse` silently strips surrounding spaces, so reject them up front.
    if url.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    match parsed.host() {
        Some(Host::Domain(domain)) => is_valid_domain(domain),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

fn is_valid_domain(domain: &str) -> bool {
    if domain.eq_ignore_ascii_case("localhost") {
        return true;
    }
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}
