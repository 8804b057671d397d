//! Flyer URL inference.
//!
//! Events do not carry a flyer field. We infer one in two composable stages:
//! [`extract_urls`] scans free text for candidate URLs in order of
//! appearance, and [`pick_flyer`] prefers the first image/document link over
//! the first link found. A populated attachment always wins.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::models::RawAttachment;

/// Scheme followed by everything up to whitespace, a quote, a closing
/// bracket or an angle bracket.
static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'\)\]]+"#).expect("Invalid URL regex"));

/// Path extensions that mark a link as a flyer.
pub const FLYER_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".webp", ".gif", ".pdf"];

/// Extract candidate URLs from text, in order of appearance.
///
/// Trailing sentence punctuation is dropped and only absolute http(s)
/// URLs are kept.
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_REGEX
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']))
        .filter(|candidate| is_web_url(candidate))
        .map(str::to_string)
        .collect()
}

/// Whether the URL path ends in an image or document extension.
pub fn has_flyer_extension(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let path = parsed.path().to_ascii_lowercase();
    FLYER_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Pick the flyer among candidates: first with a flyer extension,
/// otherwise the first candidate.
pub fn pick_flyer(candidates: &[String]) -> Option<String> {
    candidates
        .iter()
        .find(|url| has_flyer_extension(url))
        .or_else(|| candidates.first())
        .cloned()
}

/// First attachment with a populated `fileUrl`.
pub fn attachment_url(attachments: &[RawAttachment]) -> Option<String> {
    attachments
        .iter()
        .filter_map(|a| a.file_url.as_deref())
        .map(str::trim)
        .find(|url| !url.is_empty())
        .map(str::to_string)
}

/// Infer the flyer for an event. The attachment overrides anything
/// found in the description.
pub fn resolve_flyer(description: &str, attachments: &[RawAttachment]) -> Option<String> {
    attachment_url(attachments).or_else(|| pick_flyer(&extract_urls(description)))
}

fn is_web_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}
