use crate::dates::InvalidDateError;

pub type Result<T, E = PageviewError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum PageviewError {
    #[error(transparent)]
    InvalidDate(#[from] InvalidDateError),
    #[error("granularity input is incorrect, only 'week' or 'month' values are accepted (got {0:?})")]
    InvalidGranularity(String),
    #[error("article name is required")]
    EmptyArticleName,
    /// HTTP 404. The API answers this way for unknown articles as well as for
    /// ranges before the backfill horizon.
    #[error("there are no data or the data has not been loaded yet")]
    NoData,
    /// HTTP 429.
    #[error("client has made too many requests")]
    Throttled,
    #[error("unexpected response status {status} from the pageview API")]
    Upstream { status: u16 },
    #[error("request to the pageview API failed")]
    Transport(#[source] Box<ureq::Transport>),
    #[error("failed to read response body")]
    Io(#[from] std::io::Error),
    #[error("malformed response body")]
    Decode(#[from] serde_json::Error),
    #[error("invalid record timestamp {0:?}, expected YYYYMMDDHH")]
    InvalidTimestamp(String),
}

impl PageviewError {
    /// Whether the error was raised before any request was sent.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PageviewError::InvalidDate(_)
                | PageviewError::InvalidGranularity(_)
                | PageviewError::EmptyArticleName
        )
    }
}
