use crate::at_home::{AtHomeResponse, AtHomeServer};
use crate::envelope::{decode, AggregateResponse, Envelope, ErrorResponse, Page};
use crate::{
    Chapter, Cover, DexError, Manga, Order, Result, ScanlationGroup, User, Volume,
};
use derive_builder::Builder;
use getset::Getters;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing::instrument;

pub const BASE_API: &str = "https://api.mangadex.org";
pub const REPORT_URL: &str = "https://api.mangadex.network/report";

/// Settings of a [`DexClient`].
///
/// ```
/// let config = dexclient::ClientConfigBuilder::default()
///     .user_agent("my-reader/1.0")
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url(), "https://api.mangadex.org");
/// ```
#[derive(Debug, Clone, Builder, Getters)]
#[builder(setter(into), default)]
#[getset(get = "pub")]
pub struct ClientConfig {
    base_url: String,
    /// Where page download results are reported.
    report_url: String,
    user_agent: String,
    #[builder(setter(into, strip_option))]
    timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_API.to_string(),
            report_url: REPORT_URL.to_string(),
            user_agent: concat!("dexclient/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }
}

impl From<ClientConfigBuilderError> for DexError {
    fn from(value: ClientConfigBuilderError) -> Self {
        DexError::ConfigError(value.to_string())
    }
}

/// Query string of a request, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: impl ToString, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn limit(self, limit: u32) -> Self {
        self.param("limit", limit)
    }

    pub fn offset(self, offset: u32) -> Self {
        self.param("offset", offset)
    }

    pub fn id(self, id: impl ToString) -> Self {
        self.param("ids[]", id)
    }

    /// Expands a relationship type in the response, e.g. `"cover_art"`.
    pub fn include(self, kind: impl ToString) -> Self {
        self.param("includes[]", kind)
    }

    pub fn name(self, name: impl ToString) -> Self {
        self.param("name", name)
    }

    pub fn title(self, title: impl ToString) -> Self {
        self.param("title", title)
    }

    pub fn language(self, language: impl ToString) -> Self {
        self.param("translatedLanguage[]", language)
    }

    pub fn group(self, group: impl ToString) -> Self {
        self.param("groups[]", group)
    }

    pub fn manga(self, manga: impl ToString) -> Self {
        self.param("manga[]", manga)
    }

    pub fn content_rating(self, rating: impl ToString) -> Self {
        self.param("contentRating[]", rating)
    }

    pub fn order(self, field: &str, order: Order) -> Self {
        self.param(format!("order[{field}]"), order.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Options of the scanlation group search.
#[derive(Debug, Clone, Default, Builder, Getters)]
#[builder(setter(into), default)]
#[getset(get = "pub")]
pub struct GroupListOptions {
    #[builder(setter(into, strip_option))]
    limit: Option<u32>,
    #[builder(setter(into, strip_option))]
    offset: Option<u32>,
    ids: Vec<String>,
    #[builder(setter(into, strip_option))]
    name: Option<String>,
    #[builder(setter(into, strip_option))]
    focused_language: Option<String>,
    includes: Vec<String>,
}

impl From<&GroupListOptions> for Query {
    fn from(options: &GroupListOptions) -> Self {
        let mut query = Query::new();
        if let Some(name) = &options.name {
            query = query.name(name);
        }
        if let Some(language) = &options.focused_language {
            query = query.param("focusedLanguage", language);
        }
        if let Some(limit) = options.limit {
            query = query.limit(limit);
        }
        if let Some(offset) = options.offset {
            query = query.offset(offset);
        }
        for id in &options.ids {
            query = query.id(id);
        }
        for include in &options.includes {
            query = query.include(include);
        }
        query
    }
}

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    config: ClientConfig,
}

/// Handle to the MangaDex API. Clones share one connection pool.
#[derive(Debug, Clone)]
pub struct DexClient {
    inner: Arc<Inner>,
}

fn status_error(status: StatusCode, body: &[u8]) -> DexError {
    // maintenance pages come back as plain HTML
    let message = match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(response) => response.messages(),
        Err(e) => format!("failed to decode error response (HTML response?), error: {e}"),
    };
    DexError::StatusError {
        status: status.as_u16(),
        message,
    }
}

impl DexClient {
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        if reqwest::Url::parse(&config.base_url).is_err() {
            return Err(DexError::ConfigError(format!(
                "invalid base url '{}'",
                config.base_url
            )));
        }
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            inner: Arc::new(Inner {
                http: builder.build()?,
                config,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.config.base_url.trim_end_matches('/'), path)
    }

    /// Sends a GET request and returns the body of a successful response.
    #[instrument(skip(self, query))]
    pub async fn get(&self, path: &str, query: &Query) -> Result<Vec<u8>> {
        let url = self.url(path);
        debug!(%url, query = ?query.pairs());
        let response = self
            .inner
            .http
            .get(url)
            .query(query.pairs())
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        debug!(%status, len = body.len());
        Ok(body.to_vec())
    }

    /// Sends a GET request to an endpoint using the common envelope.
    pub async fn envelope(&self, path: &str, query: &Query) -> Result<Envelope> {
        decode(&self.get(path, query).await?)
    }

    pub fn manga(&self) -> MangaService<'_> {
        MangaService { client: self }
    }

    pub fn chapter(&self) -> ChapterService<'_> {
        ChapterService { client: self }
    }

    pub fn cover(&self) -> CoverService<'_> {
        CoverService { client: self }
    }

    pub fn group(&self) -> GroupService<'_> {
        GroupService { client: self }
    }

    pub fn user(&self) -> UserService<'_> {
        UserService { client: self }
    }

    pub fn at_home(&self) -> AtHomeService<'_> {
        AtHomeService { client: self }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MangaService<'a> {
    client: &'a DexClient,
}

impl MangaService<'_> {
    /// `GET /manga/{id}`
    pub async fn get(&self, id: &str, query: &Query) -> Result<Manga> {
        self.client
            .envelope(&format!("/manga/{id}"), query)
            .await?
            .entity()
    }

    /// `GET /manga`
    pub async fn list(&self, query: &Query) -> Result<Page<Manga>> {
        self.client.envelope("/manga", query).await?.page()
    }

    /// `GET /manga/{id}/feed`
    pub async fn feed(&self, id: &str, query: &Query) -> Result<Page<Chapter>> {
        self.client
            .envelope(&format!("/manga/{id}/feed"), query)
            .await?
            .page()
    }

    /// `GET /manga/{id}/aggregate`, keyed by volume label.
    pub async fn aggregate(&self, id: &str, query: &Query) -> Result<HashMap<String, Volume>> {
        let body = self
            .client
            .get(&format!("/manga/{id}/aggregate"), query)
            .await?;
        decode::<AggregateResponse>(&body)?.into_volumes()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChapterService<'a> {
    client: &'a DexClient,
}

impl ChapterService<'_> {
    /// `GET /chapter/{id}`
    pub async fn get(&self, id: &str, query: &Query) -> Result<Chapter> {
        self.client
            .envelope(&format!("/chapter/{id}"), query)
            .await?
            .entity()
    }

    /// `GET /chapter`
    pub async fn list(&self, query: &Query) -> Result<Page<Chapter>> {
        self.client.envelope("/chapter", query).await?.page()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CoverService<'a> {
    client: &'a DexClient,
}

impl CoverService<'_> {
    /// `GET /cover/{id}`
    pub async fn get(&self, id: &str, query: &Query) -> Result<Cover> {
        self.client
            .envelope(&format!("/cover/{id}"), query)
            .await?
            .entity()
    }

    /// `GET /cover`
    pub async fn list(&self, query: &Query) -> Result<Page<Cover>> {
        self.client.envelope("/cover", query).await?.page()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GroupService<'a> {
    client: &'a DexClient,
}

impl GroupService<'_> {
    /// `GET /group/{id}`
    pub async fn get(&self, id: &str, query: &Query) -> Result<ScanlationGroup> {
        self.client
            .envelope(&format!("/group/{id}"), query)
            .await?
            .entity()
    }

    /// `GET /group`
    pub async fn list(&self, options: &GroupListOptions) -> Result<Page<ScanlationGroup>> {
        self.client
            .envelope("/group", &Query::from(options))
            .await?
            .page()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UserService<'a> {
    client: &'a DexClient,
}

impl UserService<'_> {
    /// `GET /user/{id}`
    pub async fn get(&self, id: &str) -> Result<User> {
        self.client
            .envelope(&format!("/user/{id}"), &Query::new())
            .await?
            .entity()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AtHomeService<'a> {
    client: &'a DexClient,
}

impl AtHomeService<'_> {
    /// `GET /at-home/server/{chapter_id}`: where to fetch the chapter's pages from.
    pub async fn server(&self, chapter_id: &str, force_port_443: bool) -> Result<AtHomeServer> {
        let query = Query::new().param("forcePort443", force_port_443);
        let body = self
            .client
            .get(&format!("/at-home/server/{chapter_id}"), &query)
            .await?;
        decode::<AtHomeResponse>(&body)?.into_server()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::{self, Reply};

    #[test]
    fn test_query_order() {
        let query = Query::new()
            .limit(10)
            .language("en")
            .language("fr")
            .include("cover_art")
            .order("chapter", Order::Asc);
        assert_eq!(
            query.pairs(),
            &[
                ("limit".to_string(), "10".to_string()),
                ("translatedLanguage[]".to_string(), "en".to_string()),
                ("translatedLanguage[]".to_string(), "fr".to_string()),
                ("includes[]".to_string(), "cover_art".to_string()),
                ("order[chapter]".to_string(), "asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_group_options_query() {
        let options = GroupListOptionsBuilder::default()
            .name("laughing")
            .limit(100u32)
            .ids(vec!["g1".to_string()])
            .build()
            .unwrap();
        let query = Query::from(&options);
        assert_eq!(
            query,
            Query::new().name("laughing").limit(100).id("g1")
        );
    }

    #[test]
    fn test_status_error_from_json() {
        let err = status_error(
            StatusCode::NOT_FOUND,
            br#"{"result":"error","errors":[{"id":"1","status":404,"title":"Not Found","detail":"no such manga"}]}"#,
        );
        let message = err.to_string();
        assert!(message.contains("404"), "{message}");
        assert!(message.contains("Not Found: no such manga"), "{message}");
    }

    #[test]
    fn test_status_error_from_html() {
        let err = status_error(StatusCode::SERVICE_UNAVAILABLE, b"<html>down</html>");
        match err {
            DexError::StatusError { status, message } => {
                assert_eq!(status, 503);
                assert!(message.contains("HTML response?"), "{message}");
            }
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[test]
    fn test_config() {
        let client = DexClient::with_config(
            ClientConfigBuilder::default()
                .base_url("http://localhost:8080/")
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap(),
        )
        .unwrap();
        assert_eq!(client.url("/manga"), "http://localhost:8080/manga");
        assert_eq!(*client.config().timeout(), Some(Duration::from_secs(5)));

        let bad = ClientConfigBuilder::default()
            .base_url("not a url")
            .build()
            .unwrap();
        assert!(matches!(
            DexClient::with_config(bad),
            Err(DexError::ConfigError(_))
        ));
    }

    fn client_for(base_url: &str) -> DexClient {
        DexClient::with_config(
            ClientConfigBuilder::default()
                .base_url(base_url)
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_not_found_json() {
        let (listener, url) = test_util::bind().await;
        test_util::serve(listener, |_| {
            Reply::new(
                "404 Not Found",
                "application/json",
                r#"{"result":"error","errors":[{"id":"1","status":404,"title":"Not Found","detail":"no such manga"}]}"#,
            )
        });

        let err = client_for(&url)
            .manga()
            .get("missing", &Query::new())
            .await
            .unwrap_err();
        match err {
            DexError::StatusError { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found: no such manga");
            }
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_maintenance_html() {
        let (listener, url) = test_util::bind().await;
        test_util::serve(listener, |_| {
            Reply::new(
                "503 Service Unavailable",
                "text/html",
                "<html><body>maintenance</body></html>",
            )
        });

        let err = client_for(&url)
            .get("/manga", &Query::new())
            .await
            .unwrap_err();
        match err {
            DexError::StatusError { status, message } => {
                assert_eq!(status, 503);
                assert!(message.contains("HTML response?"), "{message}");
            }
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_sends_path_and_query() {
        let (listener, url) = test_util::bind().await;
        test_util::serve(listener, |path| {
            if path == "/manga?limit=1&includes%5B%5D=cover_art" {
                Reply::new(
                    "200 OK",
                    "application/json",
                    r#"{"result":"ok","response":"collection","data":[],"limit":1,"offset":0,"total":0}"#,
                )
            } else {
                Reply::new("400 Bad Request", "text/plain", path.to_string())
            }
        });

        let page = client_for(&url)
            .manga()
            .list(&Query::new().limit(1).include("cover_art"))
            .await
            .unwrap();
        assert!(page.data().is_empty());
        assert!(!page.has_more());
    }
}
