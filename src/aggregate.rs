use getset::Getters;
use serde::de::{Error as _, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;
use std::collections::HashMap;

/// One volume of `/manga/{id}/aggregate`.
#[derive(Debug, Clone, Deserialize, Getters, PartialEq)]
#[getset(get = "pub")]
pub struct Volume {
    /// Volume label, `"none"` for chapters without a volume.
    volume: String,
    count: usize,
    #[serde(deserialize_with = "chapters")]
    chapters: HashMap<String, VolumeChapter>,
}

/// Chapter entry of an aggregate volume. This is not the full [`crate::Chapter`].
#[derive(Debug, Clone, Deserialize, Getters, PartialEq, Eq)]
#[getset(get = "pub")]
pub struct VolumeChapter {
    chapter: String,
    id: String,
    count: usize,
    #[serde(default)]
    others: Vec<String>,
}

fn parse_label(label: &str) -> Option<f32> {
    label.parse::<f32>().ok()
}

impl Volume {
    pub fn number(&self) -> Option<f32> {
        parse_label(&self.volume)
    }
}

impl VolumeChapter {
    pub fn number(&self) -> Option<f32> {
        parse_label(&self.chapter)
    }
}

/// Decodes the `volumes` field: a map keyed by volume label, or `[]` when the
/// manga has no volumes. A non-empty list is rejected.
pub(crate) fn volumes<'de, D>(deserializer: D) -> Result<HashMap<String, Volume>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    let map_err = match serde_json::from_str::<HashMap<String, Volume>>(raw.get()) {
        Ok(volumes) => return Ok(volumes),
        Err(e) => e,
    };
    match serde_json::from_str::<Vec<IgnoredAny>>(raw.get()) {
        Ok(list) if list.is_empty() => Ok(HashMap::new()),
        Ok(list) => Err(D::Error::invalid_length(
            list.len(),
            &"a map of volumes or an empty list",
        )),
        Err(_) => Err(D::Error::custom(format!(
            "error decoding volumes: {map_err}, {}",
            raw.get()
        ))),
    }
}

/// Decodes the `chapters` field of a volume: a map keyed by chapter number,
/// or a list holding exactly one chapter, which is keyed by its own number.
pub(crate) fn chapters<'de, D>(deserializer: D) -> Result<HashMap<String, VolumeChapter>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    let map_err = match serde_json::from_str::<HashMap<String, VolumeChapter>>(raw.get()) {
        Ok(chapters) => return Ok(chapters),
        Err(e) => e,
    };
    match serde_json::from_str::<Vec<VolumeChapter>>(raw.get()) {
        Ok(mut list) if list.len() == 1 => {
            let chapter = list.remove(0);
            Ok(HashMap::from([(chapter.chapter.clone(), chapter)]))
        }
        Ok(list) => Err(D::Error::invalid_length(
            list.len(),
            &"a map of chapters or a list of exactly one chapter",
        )),
        Err(_) => Err(D::Error::custom(format!(
            "error decoding chapters: {map_err}, {}",
            raw.get()
        ))),
    }
}

pub trait GetChapters<'a> {
    /// All chapters of the volumes, ordered by chapter number. Chapters
    /// without a number come first.
    fn get_chapters(&self) -> Vec<&'a VolumeChapter>;
}

impl<'a, T> GetChapters<'a> for T
where
    T: IntoIterator<Item = &'a Volume> + Clone,
{
    fn get_chapters(&self) -> Vec<&'a VolumeChapter> {
        let mut chapters: Vec<&VolumeChapter> = self
            .clone()
            .into_iter()
            .flat_map(|v| v.chapters().values())
            .collect();
        chapters.sort_by(|x, y| match (x.number(), y.number()) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(c1), Some(c2)) => c1.total_cmp(&c2),
        });
        chapters
    }
}
