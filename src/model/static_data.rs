use serde::{Deserialize, Serialize};

/// Version of the MangaDex API these types were written against.
pub const API_VERSION: &str = "5.10.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Demographic {
    Shounen,
    Shoujo,
    Josei,
    Seinen,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationStatus {
    Ongoing,
    Completed,
    Hiatus,
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    Reading,
    OnHold,
    PlanToRead,
    Dropped,
    ReReading,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentRating {
    Safe,
    Suggestive,
    Erotica,
    Pornographic,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MangaState {
    Draft,
    Submitted,
    Published,
    Rejected,
    #[serde(other)]
    Unknown,
}

/// How two manga relate, as found in the `related` field of a manga relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MangaRelation {
    Monochrome,
    Colored,
    Preserialization,
    Serialization,
    Prequel,
    Sequel,
    MainStory,
    SideStory,
    AdaptedFrom,
    SpinOff,
    BasedOn,
    Doujinshi,
    SameFranchise,
    SharedUniverse,
    AlternateStory,
    AlternateVersion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_unknown_values_do_not_fail() {
        let status: PublicationStatus = serde_json::from_str(r#""abandoned""#).unwrap();
        assert_eq!(status, PublicationStatus::Unknown);
        let rating: ContentRating = serde_json::from_str(r#""gore""#).unwrap();
        assert_eq!(rating, ContentRating::Unknown);
        let demographic: Demographic = serde_json::from_str(r#""kodomo""#).unwrap();
        assert_eq!(demographic, Demographic::Unknown);
        let state: MangaState = serde_json::from_str(r#""archived""#).unwrap();
        assert_eq!(state, MangaState::Unknown);
    }

    #[test]
    fn test_known_values() {
        let rating: ContentRating = serde_json::from_str(r#""pornographic""#).unwrap();
        assert_eq!(rating, ContentRating::Pornographic);
        let demographic: Demographic = serde_json::from_str(r#""josei""#).unwrap();
        assert_eq!(demographic, Demographic::Josei);
    }

    #[test]
    fn test_relation_names() {
        let rel: MangaRelation = serde_json::from_str(r#""alternate_version""#).unwrap();
        assert_eq!(rel, MangaRelation::AlternateVersion);
    }
}
