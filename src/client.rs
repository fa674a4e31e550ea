use chrono::prelude::*;
use compact_str::CompactString;
use tracing::{debug, instrument};

use crate::{
    api::{ApiConfig, ApiGateway, TopPeriod, Transport, UreqTransport},
    dates::{parse_timestamp, validate_date, DateWindow, Granularity},
    error::{PageviewError, Result},
    utils::{normalize_article_name, peak_view, top_n, total_views, ViewTally},
};

pub const DEFAULT_TOP_LIMIT: usize = 10;

// number of daily top lists merged into a weekly ranking
const DAYS_PER_WEEK: usize = 7;

/// Answers view count, peak date and top-N questions about encyclopedia articles.
///
/// All input is validated before a request is sent. Each call is independent: view count
/// and peak date queries send one request, monthly rankings one, weekly rankings seven.
#[derive(Debug, Clone)]
pub struct PageviewClient<T: Transport = UreqTransport> {
    gateway: ApiGateway<T>,
}

impl PageviewClient {
    pub fn new() -> Self {
        Self::with_config(ApiConfig::default())
    }

    pub fn with_config(config: ApiConfig) -> Self {
        Self {
            gateway: ApiGateway::new(config),
        }
    }
}

impl Default for PageviewClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> PageviewClient<T> {
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        Self {
            gateway: ApiGateway::with_transport(config, transport),
        }
    }

    pub fn gateway(&self) -> &ApiGateway<T> {
        &self.gateway
    }

    /// Total views of an article over the week or month containing the given day.
    ///
    /// Article names are case sensitive. For monthly totals pass `1` as `day`.
    #[instrument(skip(self))]
    pub fn get_view_count_of_article(
        &self,
        article_name: &str,
        granularity: &str,
        year: i32,
        month: u32,
        day: u32,
    ) -> Result<u64> {
        let date = validate_date(year, month, day)?;
        let window = match granularity.parse::<Granularity>()? {
            Granularity::Month => DateWindow::month_of(date)?,
            Granularity::Week => DateWindow::week_of(date),
        };
        let article = normalize_article_name(article_name)?;

        let records = self.gateway.daily_views(&article, &window)?;
        let total = total_views(&records);
        debug!(total, "summed article views");

        Ok(total)
    }

    /// Date on which the article had the most views since the backfill horizon.
    ///
    /// "Today", the last day looked at, is the current date in UTC rather than the local
    /// date, since the API counts views per UTC day.
    pub fn get_article_date_with_most_views(&self, article_name: &str) -> Result<NaiveDateTime> {
        self.get_article_date_with_most_views_until(article_name, Utc::now().date_naive())
    }

    /// Like [`Self::get_article_date_with_most_views`], looking at days up to and including `end`.
    ///
    /// When several days share the maximum, the earliest one returned by the API wins.
    #[instrument(skip(self))]
    pub fn get_article_date_with_most_views_until(
        &self,
        article_name: &str,
        end: NaiveDate,
    ) -> Result<NaiveDateTime> {
        let article = normalize_article_name(article_name)?;
        let window = DateWindow::since_backfill(end)?;

        let records = self.gateway.daily_views(&article, &window)?;
        let peak = peak_view(&records).ok_or(PageviewError::NoData)?;
        debug!(timestamp = peak.timestamp.as_str(), views = peak.views, "found peak");

        parse_timestamp(&peak.timestamp)
    }

    /// Most viewed articles of a week or a month, most viewed first.
    ///
    /// A week covers the seven days starting at the given day.
    #[instrument(skip(self))]
    pub fn get_list_of_most_viewed_articles(
        &self,
        granularity: &str,
        year: i32,
        month: u32,
        day: u32,
        limit: usize,
    ) -> Result<Vec<CompactString>> {
        validate_date(year, month, day)?;

        match granularity.parse::<Granularity>()? {
            Granularity::Month => self.get_list_of_most_viewed_articles_month(year, month, limit),
            Granularity::Week => self.get_list_of_most_viewed_articles_week(year, month, day, limit),
        }
    }

    /// The seven days starting at the given day, ranked by views summed over the days.
    ///
    /// Articles with equal totals keep the order in which they first appeared.
    #[instrument(skip(self))]
    pub fn get_list_of_most_viewed_articles_week(
        &self,
        year: i32,
        month: u32,
        day: u32,
        limit: usize,
    ) -> Result<Vec<CompactString>> {
        let start = validate_date(year, month, day)?;

        let mut tally = ViewTally::new();
        for date in start.iter_days().take(DAYS_PER_WEEK) {
            let articles = self.gateway.top_articles(TopPeriod::Day(date))?;
            tally.add_day(&articles);
        }
        debug!(distinct_articles = tally.len(), "merged daily rankings");

        Ok(tally.into_top_n(limit))
    }

    /// First `limit` entries of the server's ranking for the month.
    #[instrument(skip(self))]
    pub fn get_list_of_most_viewed_articles_month(
        &self,
        year: i32,
        month: u32,
        limit: usize,
    ) -> Result<Vec<CompactString>> {
        validate_date(year, month, 1)?;

        let articles = self
            .gateway
            .top_articles(TopPeriod::Month { year, month })?;
        Ok(top_n(&articles, limit))
    }
}
