//! Business listings from the results page's map section.
//!
//! The right rail's search map carries two parallel structures:
//!
//! ```text
//! searchMapProps.mapState.markers   [{ "hovercardId": "...", "resourceId": "...", ... }]
//! searchMapProps.hovercardData      { "<hovercardId>": { "name", "rating", "numReviews", "businessUrl" } }
//! ```
//!
//! Markers are joined to hovercards by id. Ad markers and the "you are here"
//! pin carry no `hovercardId` and are skipped.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ScraperError;
use crate::json_path::{dotted, typed, typed_at_path, SEARCH_PAGE_PROPS};
use crate::types::{BusinessRecord, Listing, MarkerReference};

const SEARCH_MAP_PROPS: &[&str] = &["rightRailProps", "searchMapProps"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchMapProps {
    map_state: MapState,
    hovercard_data: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct MapState {
    markers: Vec<Marker>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Marker {
    #[serde(default)]
    hovercard_id: Option<String>,
    #[serde(default)]
    resource_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Hovercard {
    name: String,
    rating: f64,
    num_reviews: u64,
    business_url: String,
}

/// Extracts one [`Listing`] per joinable marker, in marker order.
///
/// `origin` is prefixed to each hovercard's relative `businessUrl`.
///
/// # Errors
///
/// Returns [`ScraperError::UnexpectedSchema`] if the search map section is
/// missing or mis-shaped, or a referenced hovercard lacks its typed fields.
pub fn extract_listings(page: &Value, origin: &str) -> Result<Vec<Listing>, ScraperError> {
    let path: Vec<&str> = SEARCH_PAGE_PROPS
        .iter()
        .chain(SEARCH_MAP_PROPS)
        .copied()
        .collect();
    let map: SearchMapProps = typed_at_path(page, &path)?;
    let origin = origin.trim_end_matches('/');

    let mut listings = Vec::new();
    for marker in marker_references(&map.map_state) {
        let Some(card) = map.hovercard_data.get(&marker.card_id) else {
            tracing::debug!(
                card_id = %marker.card_id,
                resource_id = %marker.resource_id,
                "marker references a hovercard missing from the payload; skipping"
            );
            continue;
        };
        let card_path = format!("{}.hovercardData.{}", dotted(&path), marker.card_id);
        let card: Hovercard = typed(card, &card_path)?;

        let record = BusinessRecord::new(
            card.name,
            card.rating,
            card.num_reviews,
            format!("{origin}{}", card.business_url),
        );
        listings.push(Listing {
            record,
            resource_id: marker.resource_id,
        });
    }

    Ok(listings)
}

fn marker_references(state: &MapState) -> Vec<MarkerReference> {
    state
        .markers
        .iter()
        .filter_map(|m| {
            Some(MarkerReference {
                card_id: m.hovercard_id.clone()?,
                resource_id: m.resource_id.clone()?,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "listing_test.rs"]
mod tests;
