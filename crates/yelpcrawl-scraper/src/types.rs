//! Output records and the transient values used to build them.

use serde::{Deserialize, Serialize};

/// One business from the search results, completed by the detail chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub name: String,
    pub rating: f64,
    pub number_of_reviews: u64,
    /// Fully qualified listing page URL on the site origin.
    pub yelp_url: String,
    /// External website. `None` until one of the resolvers supplies it.
    pub business_url: Option<String>,
    /// First reviews from the detail feed, in source order.
    #[serde(default)]
    pub reviews: Vec<ReviewSummary>,
}

impl BusinessRecord {
    #[must_use]
    pub fn new(name: String, rating: f64, number_of_reviews: u64, yelp_url: String) -> Self {
        Self {
            name,
            rating,
            number_of_reviews,
            yelp_url,
            business_url: None,
            reviews: Vec::new(),
        }
    }

    /// Sets the external website unless one is already present.
    ///
    /// Returns `false` when the record already had a website; it is never
    /// overwritten or cleared.
    pub fn set_business_url(&mut self, url: String) -> bool {
        if self.business_url.is_some() {
            return false;
        }
        self.business_url = Some(url);
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub reviewer: String,
    pub reviewer_location: String,
    pub review_date: String,
}

/// A freshly extracted record plus the resource id used to fetch its detail
/// payload. The id is not part of the emitted record.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub record: BusinessRecord,
    pub resource_id: String,
}

/// Joins one map marker to its hovercard entry within a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerReference {
    pub card_id: String,
    pub resource_id: String,
}

/// Offset counters read from a results page's pagination component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCursor {
    pub start: u64,
    pub total: u64,
    pub page_size: u64,
}

/// Outcome of reading the website from a detail payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebsiteResolution {
    Resolved(String),
    /// The payload had no usable website; the HTML fallback must run.
    Unresolved,
}
