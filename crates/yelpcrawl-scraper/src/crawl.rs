//! Crawl orchestration: results page → detail payloads → optional business
//! page → next results page.
//!
//! A crawl is a lazy stream. Each step of the underlying state machine
//! processes one results page end to end:
//!
//! 1. fetch the page and parse its embedded JSON once,
//! 2. extract listings and the next cursor from that tree,
//! 3. run every listing's detail chain concurrently (detail payload, then the
//!    business page only when the payload had no website),
//! 4. yield the page's records in completion order,
//! 5. move on to the next cursor, or finish.
//!
//! Failures inside one record's chain are yielded as
//! [`ScraperError::RecordFailed`] and do not stop the crawl. Anything that
//! breaks the results page itself is yielded once and ends the crawl, since
//! the next URL can only be derived from a page that parsed.

use futures::stream::{self, Stream, StreamExt};

use crate::blob::locate_json_blob;
use crate::client::PageFetcher;
use crate::detail::{parse_detail_payload, resolve_detail};
use crate::error::ScraperError;
use crate::fallback::resolve_website_from_html;
use crate::listing::extract_listings;
use crate::pagination::read_cursor;
use crate::search::{detail_url, replace_start_param, start_param};
use crate::types::{BusinessRecord, Listing, WebsiteResolution};

/// Page cap used when none is configured.
pub const DEFAULT_MAX_PAGES: usize = 200;

/// Per-crawl knobs.
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Scheme and host that relative listing URLs and detail paths hang off.
    pub origin: String,
    /// Detail chains in flight at once for one results page.
    pub max_concurrent_details: usize,
    /// Results pages fetched before the crawl stops with
    /// [`ScraperError::PaginationLimit`].
    pub max_pages: usize,
}

impl CrawlSettings {
    #[must_use]
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_owned(),
            max_concurrent_details: 8,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

enum CrawlState {
    AwaitingSearchPage { url: String, page: usize },
    Done,
}

/// What one results page produced.
struct PageOutcome {
    items: Vec<Result<BusinessRecord, ScraperError>>,
    next: CrawlState,
}

impl PageOutcome {
    fn failed(err: ScraperError) -> Self {
        Self {
            items: vec![Err(err)],
            next: CrawlState::Done,
        }
    }
}

pub struct Crawler<F> {
    fetcher: F,
    settings: CrawlSettings,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(fetcher: F, settings: CrawlSettings) -> Self {
        Self { fetcher, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Starts a crawl at `seed_url`, the first results page.
    ///
    /// The returned stream is finite and single-use. Dropping it stops any
    /// further fetches.
    pub fn crawl(
        &self,
        seed_url: String,
    ) -> impl Stream<Item = Result<BusinessRecord, ScraperError>> + '_ {
        let initial = CrawlState::AwaitingSearchPage {
            url: seed_url,
            page: 1,
        };
        stream::unfold(initial, move |state| async move {
            match state {
                CrawlState::Done => None,
                CrawlState::AwaitingSearchPage { url, page } => {
                    let outcome = self.process_page(url, page).await;
                    Some((stream::iter(outcome.items), outcome.next))
                }
            }
        })
        .flatten()
    }

    async fn process_page(&self, url: String, page: usize) -> PageOutcome {
        if page > self.settings.max_pages {
            tracing::warn!(max_pages = self.settings.max_pages, "page limit reached; stopping crawl");
            return PageOutcome::failed(ScraperError::PaginationLimit {
                max_pages: self.settings.max_pages,
            });
        }

        let Some(requested_start) = start_param(&url) else {
            return PageOutcome::failed(ScraperError::InvalidUrl {
                url,
                reason: "results page URL has no start=<n> parameter".to_owned(),
            });
        };

        tracing::info!(page, url = %url, "fetching results page");
        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::error!(page, url = %url, error = %e, "results page fetch failed");
                return PageOutcome::failed(e);
            }
        };

        let planned = Self::plan_page(&html, &self.settings.origin, requested_start);
        let (listings, next_start) = match planned {
            Ok(planned) => planned,
            Err(e) => {
                tracing::error!(page, url = %url, error = %e, "results page could not be parsed");
                return PageOutcome::failed(e);
            }
        };
        tracing::info!(
            page,
            listings = listings.len(),
            next_start = ?next_start,
            "extracted listings; dispatching detail fetches"
        );

        let items: Vec<Result<BusinessRecord, ScraperError>> = stream::iter(listings)
            .map(|listing| self.resolve_listing(listing))
            .buffer_unordered(self.settings.max_concurrent_details.max(1))
            .collect()
            .await;

        let next = match next_start {
            Some(start) => CrawlState::AwaitingSearchPage {
                url: replace_start_param(&url, start),
                page: page + 1,
            },
            None => {
                tracing::info!(page, "no further results pages; crawl complete");
                CrawlState::Done
            }
        };

        PageOutcome { items, next }
    }

    /// Parses a results page once and derives both its listings and the start
    /// offset of the following page.
    ///
    /// The next offset must lie past both the offset the page reports and the
    /// one that was requested, so `start` strictly increases and no results
    /// URL is fetched twice.
    fn plan_page(
        html: &str,
        origin: &str,
        requested_start: u64,
    ) -> Result<(Vec<Listing>, Option<u64>), ScraperError> {
        let page = locate_json_blob(html)?;
        let listings = extract_listings(&page, origin)?;
        let cursor = read_cursor(&page)?;

        let next_start = cursor.and_then(|c| match c.next_start() {
            Some(next) if next > c.start && next > requested_start => Some(next),
            Some(next) => {
                tracing::warn!(
                    requested_start,
                    start = c.start,
                    next,
                    page_size = c.page_size,
                    "pagination cursor does not advance; treating as last page"
                );
                None
            }
            None => None,
        });

        Ok((listings, next_start))
    }

    async fn resolve_listing(&self, listing: Listing) -> Result<BusinessRecord, ScraperError> {
        let Listing {
            mut record,
            resource_id,
        } = listing;

        match self.complete_record(&mut record, &resource_id).await {
            Ok(()) => Ok(record),
            Err(e) => {
                tracing::warn!(
                    yelp_url = %record.yelp_url,
                    resource_id = %resource_id,
                    error = %e,
                    "record detail chain failed"
                );
                Err(ScraperError::RecordFailed {
                    yelp_url: record.yelp_url,
                    source: Box::new(e),
                })
            }
        }
    }

    async fn complete_record(
        &self,
        record: &mut BusinessRecord,
        resource_id: &str,
    ) -> Result<(), ScraperError> {
        let url = detail_url(&self.settings.origin, resource_id);
        let body = self.fetcher.fetch(&url).await?;
        let detail = parse_detail_payload(&body, &url)?;

        if resolve_detail(&detail, record)? == WebsiteResolution::Unresolved {
            tracing::debug!(
                yelp_url = %record.yelp_url,
                "detail payload has no website; checking business page"
            );
            let html = self.fetcher.fetch(&record.yelp_url).await?;
            record.set_business_url(resolve_website_from_html(&html));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "crawl_test.rs"]
mod tests;
