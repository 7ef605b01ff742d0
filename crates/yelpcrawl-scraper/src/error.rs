use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("no data-hypernova-id attribute in page")]
    MissingMarker,

    #[error("no embedded JSON text for data-hypernova-id \"{marker}\"")]
    MissingPayload { marker: String },

    #[error("embedded JSON does not parse: {source}")]
    MalformedJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected JSON shape at {path}: {reason}")]
    UnexpectedSchema { path: String, reason: String },

    #[error("unusable detail payload from {url}: {reason}")]
    DetailPayload { url: String, reason: String },

    /// Any failure inside one record's detail/fallback chain. Sibling records
    /// and the rest of the crawl are unaffected.
    #[error("record {yelp_url} failed: {source}")]
    RecordFailed {
        yelp_url: String,
        #[source]
        source: Box<ScraperError>,
    },

    #[error("pagination limit reached: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: usize },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ScraperError {
    pub(crate) fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnexpectedSchema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// `true` for errors that end the crawl rather than one record's chain.
    #[must_use]
    pub fn is_page_level(&self) -> bool {
        !matches!(self, Self::RecordFailed { .. })
    }
}
