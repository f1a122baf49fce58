use crate::aggregate::{self, Volume};
use crate::{DexError, Result};
use getset::Getters;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;
use std::collections::HashMap;

/// Decodes `bytes` as `T`, keeping the body around for diagnostics on failure.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|source| DexError::DecodeError {
        source,
        raw: String::from_utf8_lossy(bytes).into_owned(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Ok,
    Error,
    #[serde(other)]
    Unknown,
}

/// Details of a single API error.
#[derive(Debug, Clone, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct ApiError {
    #[serde(default)]
    id: String,
    #[serde(default)]
    status: u16,
    #[serde(default)]
    title: String,
    detail: Option<String>,
}

/// Body of an errored request.
#[derive(Debug, Clone, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct ErrorResponse {
    result: ResultStatus,
    #[serde(default)]
    errors: Vec<ApiError>,
}

pub(crate) fn join_errors(errors: &[ApiError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.title, e.detail.as_deref().unwrap_or_default()))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ErrorResponse {
    /// One `title: detail` line per error.
    pub fn messages(&self) -> String {
        join_errors(&self.errors)
    }
}

/// The common `{result, data, limit, offset, total}` response.
///
/// `data` is kept undecoded; use [`Envelope::entity`] or [`Envelope::page`]
/// depending on whether the endpoint returns one entity or a list.
#[derive(Debug, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct Envelope {
    result: ResultStatus,
    response: Option<String>,
    data: Option<Box<RawValue>>,
    limit: Option<u32>,
    offset: Option<u32>,
    total: Option<u32>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct Page<T> {
    data: Vec<T>,
    limit: u32,
    offset: u32,
    total: u32,
}

impl<T> Page<T> {
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Whether more items exist past this page.
    pub fn has_more(&self) -> bool {
        self.offset as usize + self.data.len() < self.total as usize
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl Envelope {
    fn check(&self) -> Result<&RawValue> {
        if self.result == ResultStatus::Error {
            return Err(DexError::ApiError(join_errors(&self.errors)));
        }
        self.data.as_deref().ok_or(DexError::MissingData)
    }

    /// Decodes `data` as a single entity.
    pub fn entity<T: DeserializeOwned>(&self) -> Result<T> {
        decode(self.check()?.get().as_bytes())
    }

    /// Decodes `data` as a list, together with the paging fields.
    pub fn page<T: DeserializeOwned>(&self) -> Result<Page<T>> {
        let data: Vec<T> = decode(self.check()?.get().as_bytes())?;
        let len = data.len() as u32;
        Ok(Page {
            limit: self.limit.unwrap_or(len),
            offset: self.offset.unwrap_or(0),
            total: self.total.unwrap_or(len),
            data,
        })
    }
}

/// Response of `/manga/{id}/aggregate`, which does not use the common envelope.
#[derive(Debug, Clone, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct AggregateResponse {
    result: ResultStatus,
    #[serde(default, deserialize_with = "aggregate::volumes")]
    volumes: HashMap<String, Volume>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

impl AggregateResponse {
    pub fn into_volumes(self) -> Result<HashMap<String, Volume>> {
        if self.result == ResultStatus::Error {
            return Err(DexError::ApiError(join_errors(&self.errors)));
        }
        Ok(self.volumes)
    }
}
