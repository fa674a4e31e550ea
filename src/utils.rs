use compact_str::CompactString;
use rustc_hash::FxHashMap;

use crate::{
    api::{TopArticle, ViewRecord},
    error::{PageviewError, Result},
};

/// Canonical form of a user supplied article title.
///
/// Every run of whitespace becomes a single underscore and surrounding whitespace is
/// dropped. Letter case is kept as is: the API treats "Barack Obama" and "Barack obama"
/// as two different articles.
pub fn normalize_article_name(name: &str) -> Result<CompactString> {
    let mut words = name.split_whitespace();
    let first = words.next().ok_or(PageviewError::EmptyArticleName)?;

    let mut canonical = CompactString::from(first);
    for word in words {
        canonical.push('_');
        canonical.push_str(word);
    }
    Ok(canonical)
}

/// Sum of the views over a daily series.
///
/// # Arguments
///
/// * `records` - The daily records of one article, as returned by the per-article endpoint.
///
/// # Returns
///
/// The total number of views, `0` for an empty series.
pub fn total_views(records: &[ViewRecord]) -> u64 {
    records.iter().map(|record| record.views).sum()
}

/// Record with the most views. On ties the earliest record in `records` wins.
pub fn peak_view(records: &[ViewRecord]) -> Option<&ViewRecord> {
    records
        .iter()
        .reduce(|best, record| if record.views > best.views { record } else { best })
}

/// Names of the first `limit` articles, keeping the server's ranking.
///
/// # Arguments
///
/// * `articles` - A top list, most viewed first.
/// * `limit` - The maximum number of names to return.
///
/// # Returns
///
/// `min(limit, articles.len())` article names in their original order.
pub fn top_n(articles: &[TopArticle], limit: usize) -> Vec<CompactString> {
    articles
        .iter()
        .take(limit)
        .map(|article| article.article.clone())
        .collect()
}

/// Sums views per article over several daily top lists.
///
/// Articles are kept in the order they were first seen, so ranking the tally with a
/// stable sort breaks ties by first appearance.
#[derive(Debug, Default)]
pub struct ViewTally {
    index: FxHashMap<CompactString, usize>,
    totals: Vec<(CompactString, u64)>,
}

impl ViewTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_day(&mut self, articles: &[TopArticle]) {
        for article in articles {
            match self.index.get(&article.article) {
                Some(&i) => self.totals[i].1 += article.views,
                None => {
                    self.index.insert(article.article.clone(), self.totals.len());
                    self.totals.push((article.article.clone(), article.views));
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// `(article, total views)` sorted by descending total.
    pub fn into_ranked(self) -> Vec<(CompactString, u64)> {
        let mut totals = self.totals;
        // sort_by is stable, ties stay in first-seen order
        totals.sort_by(|a, b| b.1.cmp(&a.1));
        totals
    }

    pub fn into_top_n(self, limit: usize) -> Vec<CompactString> {
        let mut ranked = self.into_ranked();
        ranked.truncate(limit);
        ranked.into_iter().map(|(article, _)| article).collect()
    }
}
