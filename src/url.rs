use crate::{DexError, Result};
use reqwest::IntoUrl;

/// Extracts the id from a site url like `https://mangadex.org/{segment}/{id}/...`.
fn parse_site_url(url: impl IntoUrl + Clone + ToString, segment: &str) -> Result<String> {
    let parsed = url
        .clone()
        .into_url()
        .map_err(|_e| DexError::UrlParseError(url.to_string()))?;
    if !parsed.domain().is_some_and(|x| x == "mangadex.org") {
        return Err(DexError::UrlParseError(url.to_string()));
    }
    let mut segments = parsed
        .path_segments()
        .ok_or_else(|| DexError::UrlParseError(url.to_string()))?;
    if !segments.next().is_some_and(|x| x == segment) {
        return Err(DexError::UrlParseError(url.to_string()));
    }
    match segments.next() {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(DexError::UrlParseError(url.to_string())),
    }
}

/// Manga id of a `https://mangadex.org/title/{id}` url.
pub fn parse_title_url(url: impl IntoUrl + Clone + ToString) -> Result<String> {
    parse_site_url(url, "title")
}

/// Chapter id of a `https://mangadex.org/chapter/{id}` url.
pub fn parse_chapter_url(url: impl IntoUrl + Clone + ToString) -> Result<String> {
    parse_site_url(url, "chapter")
}
