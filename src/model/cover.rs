use crate::{Relationship, RelationshipType};
use getset::Getters;
use serde::Deserialize;

/// Host serving cover images.
pub const UPLOADS_URL: &str = "https://uploads.mangadex.org";

#[derive(Debug, Clone, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct Cover {
    id: String,
    #[serde(rename = "type")]
    kind: RelationshipType,
    attributes: CoverAttributes,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
#[getset(get = "pub")]
pub struct CoverAttributes {
    volume: Option<String>,
    file_name: String,
    description: Option<String>,
    locale: Option<String>,
    #[serde(default)]
    version: u32,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    updated_at: String,
}

impl CoverAttributes {
    /// Full-size image url of this cover for the given manga.
    pub fn url(&self, manga_id: &str) -> String {
        format!("{UPLOADS_URL}/covers/{manga_id}/{}", self.file_name)
    }
}

impl Cover {
    /// Id of the manga this cover belongs to, if the relationship is present.
    pub fn manga_id(&self) -> Option<&str> {
        self.relationships
            .iter()
            .find(|r| r.kind() == &RelationshipType::Manga)
            .map(|r| r.id().as_str())
    }

    pub fn url(&self) -> Option<String> {
        self.manga_id().map(|id| self.attributes.url(id))
    }
}
