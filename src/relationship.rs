use crate::model::{
    AuthorAttributes, CoverAttributes, MangaAttributes, MangaRelation, ScanlationGroupAttributes,
};
use getset::Getters;
use serde::de::value::StrDeserializer;
use serde::de::{Error as _, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use std::fmt;

/// Entity type tag carried by every entity and relationship.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationshipType {
    Manga,
    Chapter,
    CoverArt,
    Author,
    Artist,
    ScanlationGroup,
    Tag,
    User,
    CustomList,
    /// A tag this client does not know about yet.
    Other(String),
}

impl RelationshipType {
    pub fn as_str(&self) -> &str {
        match self {
            RelationshipType::Manga => "manga",
            RelationshipType::Chapter => "chapter",
            RelationshipType::CoverArt => "cover_art",
            RelationshipType::Author => "author",
            RelationshipType::Artist => "artist",
            RelationshipType::ScanlationGroup => "scanlation_group",
            RelationshipType::Tag => "tag",
            RelationshipType::User => "user",
            RelationshipType::CustomList => "custom_list",
            RelationshipType::Other(s) => s,
        }
    }
}

impl From<String> for RelationshipType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "manga" => RelationshipType::Manga,
            "chapter" => RelationshipType::Chapter,
            "cover_art" => RelationshipType::CoverArt,
            "author" => RelationshipType::Author,
            "artist" => RelationshipType::Artist,
            "scanlation_group" => RelationshipType::ScanlationGroup,
            "tag" => RelationshipType::Tag,
            "user" => RelationshipType::User,
            "custom_list" => RelationshipType::CustomList,
            _ => RelationshipType::Other(value),
        }
    }
}

impl From<RelationshipType> for String {
    fn from(value: RelationshipType) -> Self {
        match value {
            RelationshipType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes of an expanded relationship (`includes[]=...`), typed by the
/// relationship's tag.
#[derive(Debug, Clone)]
pub enum RelationshipAttributes {
    Manga(Box<MangaAttributes>),
    Author(AuthorAttributes),
    ScanlationGroup(Box<ScanlationGroupAttributes>),
    Cover(CoverAttributes),
    /// Undecoded attributes of any other relationship type.
    Raw(Box<RawValue>),
}

/// A reference from one entity to another.
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct Relationship {
    id: String,
    kind: RelationshipType,
    /// Relation kind for manga-to-manga relationships, e.g. `"sequel"`.
    related: Option<String>,
    attributes: Option<RelationshipAttributes>,
}

impl Relationship {
    /// Typed form of [`Relationship::related`]; `None` for unknown relations.
    pub fn relation(&self) -> Option<MangaRelation> {
        let related: StrDeserializer<'_, serde::de::value::Error> =
            self.related.as_deref()?.into_deserializer();
        MangaRelation::deserialize(related).ok()
    }

    pub fn as_manga(&self) -> Option<&MangaAttributes> {
        match &self.attributes {
            Some(RelationshipAttributes::Manga(a)) => Some(a),
            _ => None,
        }
    }

    pub fn as_author(&self) -> Option<&AuthorAttributes> {
        match &self.attributes {
            Some(RelationshipAttributes::Author(a)) => Some(a),
            _ => None,
        }
    }

    pub fn as_scanlation_group(&self) -> Option<&ScanlationGroupAttributes> {
        match &self.attributes {
            Some(RelationshipAttributes::ScanlationGroup(a)) => Some(a),
            _ => None,
        }
    }

    pub fn as_cover(&self) -> Option<&CoverAttributes> {
        match &self.attributes {
            Some(RelationshipAttributes::Cover(a)) => Some(a),
            _ => None,
        }
    }

    pub fn raw_attributes(&self) -> Option<&RawValue> {
        match &self.attributes {
            Some(RelationshipAttributes::Raw(raw)) => Some(raw),
            _ => None,
        }
    }
}

fn decode_attributes(
    kind: &RelationshipType,
    raw: Box<RawValue>,
) -> Result<RelationshipAttributes, serde_json::Error> {
    Ok(match kind {
        RelationshipType::Manga => RelationshipAttributes::Manga(serde_json::from_str(raw.get())?),
        RelationshipType::Author => {
            RelationshipAttributes::Author(serde_json::from_str(raw.get())?)
        }
        RelationshipType::ScanlationGroup => {
            RelationshipAttributes::ScanlationGroup(serde_json::from_str(raw.get())?)
        }
        RelationshipType::CoverArt => {
            RelationshipAttributes::Cover(serde_json::from_str(raw.get())?)
        }
        _ => RelationshipAttributes::Raw(raw),
    })
}

impl<'de> Deserialize<'de> for Relationship {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // The tag has to be known before the attributes can be decoded, so
        // keep them raw on the first pass.
        #[derive(Deserialize)]
        struct Tagged {
            id: String,
            #[serde(rename = "type")]
            kind: RelationshipType,
            #[serde(default)]
            related: Option<String>,
            #[serde(default)]
            attributes: Option<Box<RawValue>>,
        }

        let tagged = Tagged::deserialize(deserializer)?;
        let attributes = match tagged.attributes {
            Some(raw) => {
                let json = raw.get().to_string();
                let attributes = decode_attributes(&tagged.kind, raw).map_err(|e| {
                    D::Error::custom(format!(
                        "error decoding relationship of type {}: {e}, {json}",
                        tagged.kind
                    ))
                })?;
                Some(attributes)
            }
            None => None,
        };

        Ok(Relationship {
            id: tagged.id,
            kind: tagged.kind,
            related: tagged.related,
            attributes,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_author_dispatch() {
        let rel: Relationship =
            serde_json::from_str(r#"{"id": "u1", "type": "author", "attributes": {"name": "A"}}"#)
                .unwrap();
        assert_eq!(rel.id(), "u1");
        assert_eq!(rel.kind(), &RelationshipType::Author);
        assert_eq!(rel.as_author().unwrap().name(), "A");
        assert!(rel.as_manga().is_none());
    }

    #[test]
    fn test_unknown_type_keeps_raw_attributes() {
        let rel: Relationship = serde_json::from_str(
            r#"{"id": "x", "type": "unknown_future_type", "attributes": {"anything": [1, 2]}}"#,
        )
        .unwrap();
        assert_eq!(
            rel.kind(),
            &RelationshipType::Other("unknown_future_type".to_string())
        );
        assert_eq!(rel.raw_attributes().unwrap().get(), r#"{"anything": [1, 2]}"#);
    }

    #[test]
    fn test_known_type_without_typed_shape_is_raw() {
        let rel: Relationship =
            serde_json::from_str(r#"{"id": "x", "type": "user", "attributes": {"username": "u"}}"#)
                .unwrap();
        assert!(rel.raw_attributes().is_some());
    }

    #[test]
    fn test_missing_or_null_attributes() {
        let rel: Relationship =
            serde_json::from_str(r#"{"id": "c", "type": "cover_art"}"#).unwrap();
        assert!(rel.attributes().is_none());

        let rel: Relationship = serde_json::from_str(
            r#"{"id": "c", "type": "cover_art", "attributes": null}"#,
        )
        .unwrap();
        assert!(rel.attributes().is_none());
    }

    #[test]
    fn test_manga_relation_kind() {
        let rel: Relationship =
            serde_json::from_str(r#"{"id": "m2", "type": "manga", "related": "sequel"}"#).unwrap();
        assert_eq!(rel.related().as_deref(), Some("sequel"));
        assert_eq!(rel.relation(), Some(MangaRelation::Sequel));
    }

    #[test]
    fn test_malformed_attributes_report_tag_and_raw() {
        let err = serde_json::from_str::<Relationship>(
            r#"{"id": "a", "type": "author", "attributes": {"name": 42}}"#,
        )
        .unwrap_err()
        .to_string();
        assert!(err.contains("author"), "{err}");
        assert!(err.contains(r#"{"name": 42}"#), "{err}");
    }

    #[test]
    fn test_tag_round_trip() {
        for tag in ["manga", "cover_art", "scanlation_group", "custom_list", "new_thing"] {
            let kind = RelationshipType::from(tag.to_string());
            assert_eq!(kind.to_string(), tag);
            assert_eq!(String::from(kind), tag);
        }
    }
}
