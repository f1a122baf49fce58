mod aggregate;
mod at_home;
mod client;
mod envelope;
mod localized;
mod model;
mod relationship;
#[cfg(test)]
mod test_util;
mod url;

pub use aggregate::{GetChapters, Volume, VolumeChapter};
pub use at_home::{
    AtHomeServer, ChapterDownloadRequest, ChapterDownloader, ChapterPages, Quality,
};
pub use client::{
    AtHomeService, ChapterService, ClientConfig, ClientConfigBuilder, CoverService, DexClient,
    GroupListOptions, GroupListOptionsBuilder, GroupService, MangaService, Query, UserService,
    BASE_API, REPORT_URL,
};
pub use envelope::{
    decode, AggregateResponse, ApiError, Envelope, ErrorResponse, Page, ResultStatus,
};
pub use localized::LocalizedText;
pub use model::*;
pub use relationship::{Relationship, RelationshipAttributes, RelationshipType};
pub use url::{parse_chapter_url, parse_title_url};

#[derive(Debug, thiserror::Error)]
pub enum DexError {
    #[error(transparent)]
    RequestError(#[from] reqwest::Error),
    #[error("non-2xx status code -> ({status}) {message}")]
    StatusError { status: u16, message: String },
    #[error("api returned an error result: {0}")]
    ApiError(String),
    #[error("failed to decode response: {source}; body: {raw}")]
    DecodeError {
        #[source]
        source: serde_json::Error,
        raw: String,
    },
    #[error("response has no data field")]
    MissingData,
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("invalid url '{0}'")]
    UrlParseError(String),
    #[error("invalid configuration: {0}")]
    ConfigError(String),
}

pub type Result<T, E = DexError> = std::result::Result<T, E>;
