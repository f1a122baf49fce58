use serde::de::{Error as _, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use std::collections::HashMap;
use std::fmt;

/// Text keyed by language code, e.g. `{"en": "Frieren", "ja": "葬送のフリーレン"}`.
///
/// The API serializes these either as a flat object or as an array of
/// single-entry objects; both decode into the same value. Entries keep the
/// order in which each language code first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedText {
    entries: Vec<(String, String)>,
}

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the text for `code`.
    ///
    /// When `code` is missing and `fallback` is true, the first inserted entry
    /// is returned instead. Otherwise an empty string.
    pub fn get(&self, code: &str, fallback: bool) -> &str {
        if let Some((_, text)) = self.entries.iter().find(|(k, _)| k == code) {
            return text;
        }
        if fallback {
            if let Some((_, text)) = self.entries.first() {
                return text;
            }
        }
        ""
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == code)
    }

    /// Inserts or overwrites. Empty codes are ignored.
    pub fn insert(&mut self, code: impl Into<String>, text: impl Into<String>) {
        let code = code.into();
        if code.is_empty() {
            return;
        }
        let text = text.into();
        match self.entries.iter_mut().find(|(k, _)| *k == code) {
            Some((_, old)) => *old = text,
            None => self.entries.push((code, text)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_map(&self) -> HashMap<String, String> {
        self.entries.iter().cloned().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizedText {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut text = LocalizedText::new();
        for (k, v) in iter {
            text.insert(k, v);
        }
        text
    }
}

struct LocalizedTextVisitor;

impl<'de> Visitor<'de> for LocalizedTextVisitor {
    type Value = LocalizedText;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of language codes or a list of such maps")
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        EntriesVisitor.visit_map(map)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut text = LocalizedText::new();
        // later codes win
        while let Some(Entries(entry)) = seq.next_element::<Entries>()? {
            for (code, value) in entry.entries {
                text.insert(code, value);
            }
        }
        Ok(text)
    }
}

/// One element of the list shape. Only a map is accepted here.
struct Entries(LocalizedText);

struct EntriesVisitor;

impl<'de> Visitor<'de> for EntriesVisitor {
    type Value = LocalizedText;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of language codes")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut text = LocalizedText::new();
        while let Some((code, value)) = map.next_entry::<String, Option<String>>()? {
            if let Some(value) = value {
                text.insert(code, value);
            }
        }
        Ok(text)
    }
}

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(EntriesVisitor).map(Entries)
    }
}

fn decode_shape(json: &str) -> serde_json::Result<LocalizedText> {
    let mut de = serde_json::Deserializer::from_str(json);
    let text = (&mut de).deserialize_any(LocalizedTextVisitor)?;
    de.end()?;
    Ok(text)
}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        decode_shape(raw.get()).map_err(|e| {
            D::Error::custom(format!("error decoding localized text: {e}, {}", raw.get()))
        })
    }
}

impl Serialize for LocalizedText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}
