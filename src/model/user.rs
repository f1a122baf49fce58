use crate::Relationship;
use crate::RelationshipType;
use getset::Getters;
use serde::Deserialize;

/// A MangaDex user.
#[derive(Debug, Clone, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct User {
    id: String,
    #[serde(rename = "type")]
    kind: RelationshipType,
    attributes: UserAttributes,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct UserAttributes {
    username: String,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    version: u32,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.attributes.roles.iter().any(|r| r == role)
    }
}
