use crate::LocalizedText;
use getset::Getters;
use serde::Deserialize;

/// Attributes of an author or artist.
#[derive(Debug, Clone, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
#[getset(get = "pub")]
pub struct AuthorAttributes {
    name: String,
    image_url: Option<String>,
    #[serde(default)]
    biography: LocalizedText,
    twitter: Option<String>,
    pixiv: Option<String>,
    youtube: Option<String>,
    website: Option<String>,
    #[serde(default)]
    version: u32,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    updated_at: String,
}
