pub mod blob;
pub mod client;
pub mod crawl;
pub mod detail;
pub mod error;
pub mod fallback;
pub(crate) mod json_path;
pub mod listing;
pub mod normalize;
pub mod pagination;
pub mod profile;
pub mod search;
pub mod types;

pub use blob::locate_json_blob;
pub use client::{PageFetcher, YelpClient};
pub use crawl::{CrawlSettings, Crawler, DEFAULT_MAX_PAGES};
pub use detail::{parse_detail_payload, resolve_detail, MAX_REVIEWS};
pub use error::ScraperError;
pub use fallback::{resolve_website_from_html, NO_PERSONAL_WEBSITE};
pub use listing::extract_listings;
pub use normalize::normalize_redirect_url;
pub use pagination::{next_cursor, read_cursor};
pub use profile::{BrowserProfile, ProfileError, RequestProfile};
pub use search::{build_search_url, detail_url, replace_start_param};
pub use types::{BusinessRecord, Listing, PaginationCursor, ReviewSummary, WebsiteResolution};
