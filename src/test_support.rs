//! Scripted transport, response fixtures and a one-shot HTTP server on localhost.

use std::{
    cell::RefCell,
    collections::VecDeque,
    io::{BufRead, BufReader, Write},
    net::TcpListener,
    thread::{self, JoinHandle},
};

use serde_json::json;

use crate::{
    api::{RawResponse, TopArticle, Transport, ViewRecord},
    error::Result,
};

/// Answers requests with pre-recorded responses, in order, and remembers every
/// `(url, user agent)` it was asked for.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: RefCell<VecDeque<RawResponse>>,
    requests: RefCell<Vec<(String, String)>>,
}

impl MockTransport {
    pub fn new(responses: Vec<RawResponse>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.borrow().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|(url, _)| url.clone()).collect()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str, user_agent: &str) -> Result<RawResponse> {
        self.requests
            .borrow_mut()
            .push((url.to_string(), user_agent.to_string()));

        let response = self.responses.borrow_mut().pop_front();
        Ok(response.unwrap_or_else(|| panic!("unexpected request: {url}")))
    }
}

/// Serves a single HTTP/1.1 response on a local port.
///
/// Returns the base URL to point a client at and a handle yielding the request head
/// (request line and headers) the server received.
pub fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(socket.try_clone().unwrap());

        let mut head = String::new();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
            head.push_str(&line);
        }

        socket.write_all(response.as_bytes()).unwrap();
        socket.flush().unwrap();
        head
    });

    (base_url, handle)
}

pub fn ok(body: impl Into<String>) -> RawResponse {
    RawResponse {
        status: 200,
        body: body.into(),
    }
}

pub fn status(status: u16) -> RawResponse {
    RawResponse {
        status,
        body: json!({
            "type": "https://mediawiki.org/wiki/HyperSwitch/errors/not_found",
            "title": "Not found.",
            "detail": "The date(s) you used are valid, but we either do not have data for those date(s), or the project you asked for is not loaded yet.",
        })
        .to_string(),
    }
}

pub fn record(article: &str, timestamp: &str, views: u64) -> ViewRecord {
    ViewRecord {
        article: article.into(),
        timestamp: timestamp.to_string(),
        views,
    }
}

pub fn top(article: &str, views: u64) -> TopArticle {
    TopArticle {
        article: article.into(),
        views,
        rank: None,
    }
}

/// Body of a per-article response, including the fields the client ignores.
pub fn daily_views_body(records: &[ViewRecord]) -> String {
    let items: Vec<_> = records
        .iter()
        .map(|record| {
            json!({
                "project": "en.wikipedia",
                "article": record.article.as_str(),
                "granularity": "daily",
                "timestamp": record.timestamp,
                "access": "all-access",
                "agent": "user",
                "views": record.views,
            })
        })
        .collect();

    json!({ "items": items }).to_string()
}

/// Body of a top-articles response holding a single item.
pub fn top_body(articles: &[TopArticle]) -> String {
    let ranked: Vec<_> = articles
        .iter()
        .map(|article| {
            json!({
                "article": article.article.as_str(),
                "views": article.views,
                "rank": article.rank,
            })
        })
        .collect();

    json!({
        "items": [{
            "project": "en.wikisource",
            "access": "all-access",
            "year": "2016",
            "month": "10",
            "day": "all-days",
            "articles": ranked,
        }]
    })
    .to_string()
}
