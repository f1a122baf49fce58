use crate::{LocalizedText, Relationship, RelationshipType};
use getset::Getters;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct Tag {
    id: String,
    #[serde(rename = "type")]
    kind: RelationshipType,
    attributes: TagAttributes,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct TagAttributes {
    name: LocalizedText,
    #[serde(default)]
    description: LocalizedText,
    /// One of `content`, `format`, `genre` or `theme`.
    group: String,
    #[serde(default)]
    version: u32,
}

impl Tag {
    pub fn name(&self, code: &str, fallback: bool) -> &str {
        self.attributes.name.get(code, fallback)
    }
}
