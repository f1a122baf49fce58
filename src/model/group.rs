use crate::{LocalizedText, Relationship, RelationshipType};
use getset::Getters;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct ScanlationGroup {
    id: String,
    #[serde(rename = "type")]
    kind: RelationshipType,
    attributes: ScanlationGroupAttributes,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
#[getset(get = "pub")]
pub struct ScanlationGroupAttributes {
    name: String,
    #[serde(default)]
    alt_names: LocalizedText,
    website: Option<String>,
    irc_server: Option<String>,
    irc_channel: Option<String>,
    discord: Option<String>,
    contact_email: Option<String>,
    description: Option<String>,
    twitter: Option<String>,
    focused_languages: Option<Vec<String>>,
    #[serde(default)]
    locked: bool,
    #[serde(default)]
    official: bool,
    #[serde(default)]
    inactive: bool,
    publish_delay: Option<String>,
    #[serde(default)]
    version: u32,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    updated_at: String,
}

impl ScanlationGroup {
    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    pub fn leader(&self) -> Option<&Relationship> {
        self.relationships
            .iter()
            .find(|r| r.kind().as_str() == "leader")
    }
}
