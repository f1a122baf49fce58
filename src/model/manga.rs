use super::{ContentRating, Demographic, MangaState, PublicationStatus, Tag};
use crate::{LocalizedText, Relationship, RelationshipType};
use getset::Getters;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct Manga {
    id: String,
    #[serde(rename = "type")]
    kind: RelationshipType,
    attributes: MangaAttributes,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
#[getset(get = "pub")]
pub struct MangaAttributes {
    title: LocalizedText,
    #[serde(default)]
    alt_titles: LocalizedText,
    #[serde(default)]
    description: LocalizedText,
    #[serde(default)]
    is_locked: bool,
    #[serde(default)]
    links: LocalizedText,
    #[serde(default)]
    original_language: String,
    last_volume: Option<String>,
    last_chapter: Option<String>,
    publication_demographic: Option<Demographic>,
    status: Option<PublicationStatus>,
    year: Option<u32>,
    content_rating: Option<ContentRating>,
    #[serde(default)]
    tags: Vec<Tag>,
    state: Option<MangaState>,
    #[serde(default)]
    version: u32,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    updated_at: String,
}

impl MangaAttributes {
    /// Title in `code`, falling back to the alternative titles.
    ///
    /// With `fallback` set, any available title is returned when neither has
    /// `code`.
    pub fn localized_title(&self, code: &str, fallback: bool) -> &str {
        if self.title.contains(code) {
            return self.title.get(code, false);
        }
        if self.alt_titles.contains(code) {
            return self.alt_titles.get(code, false);
        }
        match self.title.get(code, fallback) {
            "" => self.alt_titles.get(code, fallback),
            title => title,
        }
    }
}

impl Manga {
    pub fn title(&self, code: &str, fallback: bool) -> &str {
        self.attributes.localized_title(code, fallback)
    }

    pub fn description(&self, code: &str, fallback: bool) -> &str {
        self.attributes.description.get(code, fallback)
    }

    pub fn related(&self, kind: &RelationshipType) -> impl Iterator<Item = &Relationship> + '_ {
        let kind = kind.clone();
        self.relationships.iter().filter(move |r| *r.kind() == kind)
    }

    /// Names of expanded author relationships (`includes[]=author`).
    pub fn authors(&self) -> Vec<&str> {
        self.related(&RelationshipType::Author)
            .filter_map(|r| r.as_author())
            .map(|a| a.name().as_str())
            .collect()
    }

    /// File name of the main cover, present when requested with `includes[]=cover_art`.
    pub fn cover_file_name(&self) -> Option<&str> {
        self.related(&RelationshipType::CoverArt)
            .find_map(|r| r.as_cover())
            .map(|c| c.file_name().as_str())
    }

    pub fn cover_url(&self) -> Option<String> {
        self.related(&RelationshipType::CoverArt)
            .find_map(|r| r.as_cover())
            .map(|c| c.url(&self.id))
    }
}
