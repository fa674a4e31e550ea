use std::time::Duration;

use chrono::prelude::*;
use compact_str::CompactString;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    dates::DateWindow,
    error::{PageviewError, Result},
};

pub const DEFAULT_BASE_URL: &str = "https://wikimedia.org/api/rest_v1/metrics/pageviews";

// Wikimedia rejects or throttles clients that do not identify themselves
// (https://meta.wikimedia.org/wiki/User-Agent_policy)
pub const DEFAULT_USER_AGENT: &str = concat!(
    "pageviews-rs/",
    env!("CARGO_PKG_VERSION"),
    " (https://example.org/pageviews-rs/; pageviews-rs@example.org)"
);

/// Where and how to reach the pageview API.
///
/// The defaults query English Wikipedia for per-article series and English Wikisource
/// for the top lists, counting user traffic from all access methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub per_article_project: String,
    pub top_project: String,
    pub access: String,
    pub agent: String,
    /// Sent as `User-Agent` with every request. Should name the application and a way to
    /// contact its operator.
    pub user_agent: String,
    /// Overall timeout of a single request. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            per_article_project: "en.wikipedia".to_string(),
            top_project: "en.wikisource".to_string(),
            access: "all-access".to_string(),
            agent: "user".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_per_article_project(mut self, project: impl Into<String>) -> Self {
        self.per_article_project = project.into();
        self
    }

    pub fn with_top_project(mut self, project: impl Into<String>) -> Self {
        self.top_project = project.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// `.../per-article/{project}/{access}/{agent}/{article}/daily/{start}/{end}`
    ///
    /// `article` must already be canonical, it is only percent-encoded here.
    pub fn per_article_url(&self, article: &str, window: &DateWindow) -> String {
        let (start, end) = window.wire_bounds();
        format!(
            "{}/per-article/{}/{}/{}/{}/daily/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.per_article_project,
            self.access,
            self.agent,
            urlencoding::encode(article),
            start,
            end
        )
    }

    /// `.../top/{project}/{access}/{year}/{month}/{day | all-days}`
    pub fn top_url(&self, period: TopPeriod) -> String {
        format!(
            "{}/top/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.top_project,
            self.access,
            period.path()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopPeriod {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
}

impl TopPeriod {
    fn path(self) -> String {
        match self {
            TopPeriod::Day(date) => {
                format!("{:04}/{:02}/{:02}", date.year(), date.month(), date.day())
            }
            TopPeriod::Month { year, month } => format!("{year:04}/{month:02}/all-days"),
        }
    }
}

/// One day of views for an article, as returned by the per-article endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRecord {
    pub article: CompactString,
    /// `YYYYMMDDHH`
    pub timestamp: String,
    pub views: u64,
}

/// Entry of a top-articles list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopArticle {
    pub article: CompactString,
    pub views: u64,
    #[serde(default)]
    pub rank: Option<u32>,
}

#[derive(Deserialize)]
struct ItemsEnvelope<T> {
    items: Vec<T>,
}

#[derive(Deserialize)]
struct TopItem {
    articles: Vec<TopArticle>,
}

/// Status and body of an HTTP response, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Performs a blocking GET.
///
/// Implementations return non-success statuses as a [`RawResponse`], only failures to
/// get any response at all are errors.
pub trait Transport {
    fn get(&self, url: &str, user_agent: &str) -> Result<RawResponse>;
}

/// [`Transport`] backed by a `ureq` agent.
///
/// The `User-Agent` is set on each request from the value the gateway passes in, the agent
/// itself only carries the timeout.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &ApiConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            agent: builder.build(),
        }
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, user_agent: &str) -> Result<RawResponse> {
        match self.agent.get(url).set("User-Agent", user_agent).call() {
            Ok(response) | Err(ureq::Error::Status(_, response)) => {
                let status = response.status();
                let body = response.into_string()?;
                Ok(RawResponse { status, body })
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(PageviewError::Transport(Box::new(transport)))
            }
        }
    }
}

/// Builds request URLs, sends them and maps responses to records or errors.
///
/// Requests go out one at a time and are never retried. The API asks clients to stay below
/// 200 requests per second, this is not enforced here.
#[derive(Debug, Clone)]
pub struct ApiGateway<T: Transport = UreqTransport> {
    config: ApiConfig,
    transport: T,
}

impl ApiGateway {
    pub fn new(config: ApiConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self { config, transport }
    }
}

impl<T: Transport> ApiGateway<T> {
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Daily view series of a canonical article name over `window`.
    pub fn daily_views(&self, article: &str, window: &DateWindow) -> Result<Vec<ViewRecord>> {
        let url = self.config.per_article_url(article, window);
        let records: Vec<ViewRecord> = self.fetch_items(&url)?;
        debug!(article, records = records.len(), "fetched daily views");
        Ok(records)
    }

    /// Server-ranked top articles of a day or a whole month.
    pub fn top_articles(&self, period: TopPeriod) -> Result<Vec<TopArticle>> {
        let url = self.config.top_url(period);
        let items: Vec<TopItem> = self.fetch_items(&url)?;

        match items.into_iter().next() {
            Some(item) => {
                debug!(?period, articles = item.articles.len(), "fetched top articles");
                Ok(item.articles)
            }
            None => {
                info!(?period, "top articles response without items");
                Ok(Vec::new())
            }
        }
    }

    fn fetch_items<I: DeserializeOwned>(&self, url: &str) -> Result<Vec<I>> {
        debug!(url, "requesting");
        let response = self.transport.get(url, &self.config.user_agent)?;

        match response.status {
            200 => {
                let envelope: ItemsEnvelope<I> = serde_json::from_str(&response.body)?;
                Ok(envelope.items)
            }
            404 => Err(PageviewError::NoData),
            429 => {
                warn!(url, "throttled by the pageview API");
                Err(PageviewError::Throttled)
            }
            status => {
                warn!(url, status, body = response.body.as_str(), "unexpected response status");
                Err(PageviewError::Upstream { status })
            }
        }
    }
}
