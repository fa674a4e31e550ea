// SPDX-License-Identifier: MPL-2.0
//! # pageviews
//!
//! A small synchronous client for the [Wikimedia pageview API](https://wikitech.wikimedia.org/wiki/Analytics/AQS/Pageviews).
//!
//! ## Overview
//!
//! `pageviews` answers three questions about encyclopedia articles:
//!
//! - **View count**: how often was an article viewed during a given week or month?
//! - **Peak date**: on which day did an article get the most views since July 2015, when the API's data begins?
//! - **Top-N**: which articles were the most viewed during a given week or month?
//!
//! Every query validates its input first, then sends one (or, for weekly rankings, seven) blocking
//! HTTP requests and aggregates the returned JSON.
//!
//! ## Getting Started
//!
//! ```rust,no_run
//! use pageviews::PageviewClient;
//!
//! fn main() -> Result<(), pageviews::PageviewError> {
//!     let client = PageviewClient::new();
//!
//!     // views of the ISO week (Monday to Sunday) containing 2016-10-12
//!     let views = client.get_view_count_of_article("Albert Einstein", "week", 2016, 10, 12)?;
//!     println!("{views} views");
//!
//!     // day with the most views since the backfill horizon
//!     let peak = client.get_article_date_with_most_views("Albert Einstein")?;
//!     println!("most viewed on {}", peak.date());
//!
//!     // ten most viewed articles of October 2016
//!     for article in client.get_list_of_most_viewed_articles("month", 2016, 10, 1, 10)? {
//!         println!("{article}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Article Names
//!
//! Names are canonicalized by replacing whitespace with underscores (`"Barack Obama"` becomes
//! `"Barack_Obama"`). Letter case is **never** changed: the API treats `Barack Obama` and
//! `Barack obama` as two different articles.
//!
//! ## Modules and API
//!
//! ### `client` Module
//!
//! [`PageviewClient`] with the public queries. It is generic over the [`api::Transport`] used to
//! send requests, which defaults to a `ureq` agent.
//!
//! ### `dates` Module
//!
//! Calendar validation and the week/month windows (`DateWindow`) a query covers.
//!
//! ### `utils` Module
//!
//! Article name normalization and the summing/ranking of API records. These are plain functions and
//! can be used on records obtained elsewhere.
//!
//! ### `api` Module
//!
//! URL templates, the [`api::ApiConfig`] and the [`api::ApiGateway`] mapping HTTP statuses to errors:
//!
//! | Status | Result |
//! | --- | --- |
//! | 200 | decoded records |
//! | 404 | [`PageviewError::NoData`] (unknown article, or dates before 2015-07-01) |
//! | 429 | [`PageviewError::Throttled`] |
//! | anything else | [`PageviewError::Upstream`] |
//!
//! ## Configuration
//!
//! The API requires every client to identify itself with a `User-Agent` naming the application and
//! a contact. Set your own before sending real traffic:
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use pageviews::{ApiConfig, PageviewClient};
//!
//! let config = ApiConfig::default()
//!     .with_user_agent("MyStatsBot/1.0 (https://example.com/bot; bot@example.com)")
//!     .with_timeout(Some(Duration::from_secs(10)));
//! let client = PageviewClient::with_config(config);
//! ```
//!
//! `ApiConfig` implements `serde::Deserialize` with defaults for missing fields, so it can be embedded
//! in an application's configuration file.
//!
//! ## Limitations
//!
//! - **Rate limits**: Wikimedia asks clients to stay below 200 requests per second. The client does not
//!   enforce this and does not retry throttled requests.
//! - **Projects**: Per-article series come from English Wikipedia and top lists from English Wikisource
//!   unless configured otherwise.
//!
//! ### Logging
//!
//! Uses the `tracing` crate. Every query runs in its own span; requests are logged at `debug` level,
//! throttling and unexpected statuses at `warn` level.

pub mod api;
pub mod client;
pub mod dates;
pub mod error;
#[cfg(test)]
mod test_support;
pub mod utils;

pub use api::ApiConfig;
pub use client::{PageviewClient, DEFAULT_TOP_LIMIT};
pub use dates::{DateWindow, Granularity, InvalidDateError, BACKFILL_START};
pub use error::{PageviewError, Result};
