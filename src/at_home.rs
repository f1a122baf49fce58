use crate::envelope::{join_errors, ApiError, ResultStatus};
use crate::{DexClient, DexError, Result};
use futures::Future;
use getset::Getters;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Instant;
use tower::Service;
use tracing::debug;
use tracing::debug_span;
use tracing::instrument;
use tracing::Instrument;

/// Page image quality served by MangaDex@Home.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Data,
    DataSaver,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Data => "data",
            Quality::DataSaver => "data-saver",
        }
    }
}

/// Response of `/at-home/server/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AtHomeResponse {
    result: ResultStatus,
    base_url: Option<String>,
    chapter: Option<ChapterPages>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

impl AtHomeResponse {
    pub(crate) fn into_server(self) -> Result<AtHomeServer> {
        if self.result == ResultStatus::Error {
            return Err(DexError::ApiError(join_errors(&self.errors)));
        }
        match (self.base_url, self.chapter) {
            (Some(base_url), Some(chapter)) => Ok(AtHomeServer { base_url, chapter }),
            _ => Err(DexError::MissingData),
        }
    }
}

/// A MangaDex@Home server assigned to one chapter.
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct AtHomeServer {
    base_url: String,
    chapter: ChapterPages,
}

#[derive(Debug, Clone, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
#[getset(get = "pub")]
pub struct ChapterPages {
    hash: String,
    data: Vec<String>,
    data_saver: Vec<String>,
}

impl ChapterPages {
    pub fn files(&self, quality: Quality) -> &[String] {
        match quality {
            Quality::Data => &self.data,
            Quality::DataSaver => &self.data_saver,
        }
    }
}

impl AtHomeServer {
    pub fn page_url(&self, quality: Quality, file: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url,
            quality.as_str(),
            self.chapter.hash,
            file
        )
    }

    pub fn page_urls(&self, quality: Quality) -> Vec<String> {
        self.chapter
            .files(quality)
            .iter()
            .map(|file| self.page_url(quality, file))
            .collect()
    }
}

/// Result of a page download, sent back to MangaDex@Home.
#[derive(Debug, Serialize)]
struct Report {
    url: String,
    success: bool,
    bytes: usize,
    duration: u64,
    cached: bool,
}

impl DexClient {
    /// Downloads one page of a chapter.
    ///
    /// The outcome is reported to MangaDex@Home in a background task that is
    /// never awaited; a failed report is only logged.
    #[instrument(skip(self, server))]
    pub async fn fetch_page(
        &self,
        server: &AtHomeServer,
        quality: Quality,
        file: &str,
    ) -> Result<Vec<u8>> {
        let url = server.page_url(quality, file);
        let start = Instant::now();
        let outcome = async {
            let response = self.http().get(&url).send().await?.error_for_status()?;
            let cached = response
                .headers()
                .get("X-Cache")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.starts_with("HIT"));
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>((bytes.to_vec(), cached))
        }
        .await;

        let report = Report {
            url,
            success: outcome.is_ok(),
            bytes: outcome.as_ref().map(|(b, _)| b.len()).unwrap_or(0),
            duration: start.elapsed().as_millis() as u64,
            cached: outcome.as_ref().is_ok_and(|(_, cached)| *cached),
        };
        self.spawn_report(report);

        Ok(outcome?.0)
    }

    fn spawn_report(&self, report: Report) {
        let http = self.http().clone();
        let report_url = self.config().report_url().clone();
        let span = debug_span!("report", url = %report.url);
        tokio::spawn(
            async move {
                let body = match serde_json::to_vec(&report) {
                    Ok(body) => body,
                    Err(e) => {
                        debug!("Failed to serialize report: {e}");
                        return;
                    }
                };
                let sent = http
                    .post(report_url)
                    .header(CONTENT_TYPE, "application/json")
                    .body(body)
                    .send()
                    .await;
                if let Err(e) = sent {
                    debug!("Failed to send report: {e}");
                }
            }
            .instrument(span),
        );
    }
}

/// Downloads whole chapters into a directory.
#[derive(Debug, Clone)]
pub struct ChapterDownloader {
    client: DexClient,
}

impl ChapterDownloader {
    pub fn new(client: DexClient) -> Self {
        Self { client }
    }
}

#[derive(Debug)]
pub struct ChapterDownloadRequest {
    pub(crate) id: String,
    pub(crate) quality: Quality,
    pub(crate) path: PathBuf,
}

impl ChapterDownloadRequest {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            quality: Quality::DataSaver,
            path: PathBuf::from("."),
        }
    }

    pub fn from_url(url: &str) -> Result<Self> {
        Ok(Self::new(&crate::parse_chapter_url(url)?))
    }

    pub fn data_saver(mut self, data_saver: bool) -> Self {
        self.quality = if data_saver {
            Quality::DataSaver
        } else {
            Quality::Data
        };
        self
    }

    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }
}

impl Service<ChapterDownloadRequest> for ChapterDownloader {
    type Response = ();
    type Error = DexError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ChapterDownloadRequest) -> Self::Future {
        let client = self.client.clone();
        let span = debug_span!("chapter_downloader", id = %req.id);
        let fut = async move {
            debug!(?req);
            let server = client.at_home().server(&req.id, false).await?;
            download_chapter(&client, &server, &req.path, req.quality).await
        };

        Box::pin(fut.instrument(span))
    }
}

fn page_file_name(index: usize, width: usize, file: &str) -> String {
    let ext = if file.contains(".png") { ".png" } else { ".jpg" };
    format!("page_{index:0width$}{ext}")
}

#[instrument(skip(client, server))]
async fn download_chapter(
    client: &DexClient,
    server: &AtHomeServer,
    path: impl AsRef<Path> + Debug,
    quality: Quality,
) -> Result<()> {
    async fn download_one(
        client: &DexClient,
        server: &AtHomeServer,
        quality: Quality,
        file: &str,
        dest: PathBuf,
    ) -> Result<()> {
        debug!("Download {}", dest.display());
        let bytes = client.fetch_page(server, quality, file).await?;
        fs::write(dest, bytes)?;
        Ok(())
    }

    let path = path.as_ref();
    fs::create_dir_all(path)?;
    let files = server.chapter().files(quality);
    let width = files.len().checked_ilog10().unwrap_or(0) as usize + 1;
    let futures = files.iter().enumerate().map(|(i, file)| {
        download_one(
            client,
            server,
            quality,
            file,
            path.join(page_file_name(i, width, file)),
        )
    });
    futures::future::join_all(futures)
        .await
        .into_iter()
        .find(|x| x.is_err())
        .unwrap_or(Ok(()))
}
