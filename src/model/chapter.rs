use crate::{Relationship, RelationshipType};
use getset::Getters;
use serde::Deserialize;

/// A chapter as returned by `/chapter` and `/manga/{id}/feed`.
#[derive(Debug, Clone, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct Chapter {
    id: String,
    #[serde(rename = "type")]
    kind: RelationshipType,
    attributes: ChapterAttributes,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
#[getset(get = "pub")]
pub struct ChapterAttributes {
    title: Option<String>,
    volume: Option<String>,
    chapter: Option<String>,
    #[serde(default)]
    pages: u32,
    translated_language: String,
    uploader: Option<String>,
    external_url: Option<String>,
    #[serde(default)]
    version: u32,
    created_at: String,
    updated_at: String,
    publish_at: String,
    readable_at: String,
}

impl Chapter {
    pub fn title(&self) -> &str {
        self.attributes.title.as_deref().unwrap_or_default()
    }

    /// Chapter number as shown on the site, `"-"` for oneshots.
    pub fn number_label(&self) -> &str {
        self.attributes.chapter.as_deref().unwrap_or("-")
    }

    pub fn scanlation_groups(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .iter()
            .filter(|r| r.kind() == &RelationshipType::ScanlationGroup)
    }
}
