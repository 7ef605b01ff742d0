//! Business detail payloads (`/biz/<id>/props`).
//!
//! The detail endpoint answers with JSON directly. Two parts of it matter:
//!
//! - `bizDetailsPageProps.bizPortfolioProps.ctaProps.website`: a redirect
//!   wrapper around the business's own site. Often absent or empty.
//! - `bizDetailsPageProps.reviewFeedQueryProps.reviews`: the newest reviews.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ScraperError;
use crate::normalize::normalize_redirect_url;
use crate::types::{BusinessRecord, ReviewSummary, WebsiteResolution};

/// Reviews kept per record.
pub const MAX_REVIEWS: usize = 5;

const DETAILS_ROOT: &str = "bizDetailsPageProps";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedReview {
    user: FeedUser,
    localized_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedUser {
    markup_display_name: String,
    display_location: String,
}

/// Parses a detail response body.
///
/// # Errors
///
/// Returns [`ScraperError::DetailPayload`] if the body is blank or not JSON.
pub fn parse_detail_payload(body: &str, url: &str) -> Result<Value, ScraperError> {
    if body.trim().is_empty() {
        return Err(detail_error(url, "empty response body"));
    }
    serde_json::from_str(body).map_err(|e| detail_error(url, format!("invalid JSON: {e}")))
}

/// Fills `record` from a detail payload.
///
/// Sets `record.reviews` to the first [`MAX_REVIEWS`] feed entries and, when
/// the portfolio section carries a usable redirect link, `business_url`.
/// [`WebsiteResolution::Unresolved`] tells the caller to try the HTML page.
///
/// # Errors
///
/// Returns [`ScraperError::DetailPayload`] if `bizDetailsPageProps` or the
/// review feed is missing, or a kept review lacks reviewer fields.
pub fn resolve_detail(
    detail: &Value,
    record: &mut BusinessRecord,
) -> Result<WebsiteResolution, ScraperError> {
    let props = detail
        .get(DETAILS_ROOT)
        .filter(|v| v.is_object())
        .ok_or_else(|| detail_error(&record.yelp_url, format!("{DETAILS_ROOT} is missing")))?;

    record.reviews = read_reviews(props, &record.yelp_url)?;

    let resolution = match portfolio_website(props).and_then(normalize_redirect_url) {
        Some(url) => {
            record.set_business_url(url.clone());
            WebsiteResolution::Resolved(url)
        }
        None => WebsiteResolution::Unresolved,
    };
    Ok(resolution)
}

/// The raw call-to-action website, if the portfolio section is populated.
fn portfolio_website(props: &Value) -> Option<&str> {
    let portfolio = props.get("bizPortfolioProps")?;
    let populated = match portfolio {
        Value::Object(map) => !map.is_empty(),
        Value::Null | Value::Bool(false) => false,
        _ => true,
    };
    if !populated {
        return None;
    }
    portfolio
        .get("ctaProps")
        .and_then(|cta| cta.get("website"))
        .and_then(Value::as_str)
}

fn read_reviews(props: &Value, yelp_url: &str) -> Result<Vec<ReviewSummary>, ScraperError> {
    let feed = props
        .get("reviewFeedQueryProps")
        .and_then(|f| f.get("reviews"))
        .and_then(Value::as_array)
        .ok_or_else(|| detail_error(yelp_url, "reviewFeedQueryProps.reviews is missing"))?;

    feed.iter()
        .take(MAX_REVIEWS)
        .enumerate()
        .map(|(i, raw)| {
            let review = FeedReview::deserialize(raw)
                .map_err(|e| detail_error(yelp_url, format!("review {i}: {e}")))?;
            Ok(ReviewSummary {
                reviewer: review.user.markup_display_name,
                reviewer_location: review.user.display_location,
                review_date: review.localized_date,
            })
        })
        .collect()
}

fn detail_error(url: &str, reason: impl Into<String>) -> ScraperError {
    ScraperError::DetailPayload {
        url: url.to_owned(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record() -> BusinessRecord {
        BusinessRecord::new(
            "Golden Boy".to_owned(),
            4.0,
            88,
            "https://www.yelp.com/biz/golden-boy-sf".to_owned(),
        )
    }

    fn review(n: usize) -> Value {
        json!({
            "id": format!("rev{n}"),
            "user": {
                "markupDisplayName": format!("Reviewer {n}"),
                "displayLocation": "San Francisco, CA",
                "reviewCount": 12
            },
            "localizedDate": format!("1/{n}/2024"),
            "rating": 5
        })
    }

    fn detail(portfolio: &Value, review_count: usize) -> Value {
        let reviews: Vec<Value> = (1..=review_count).map(review).collect();
        json!({
            "bizDetailsPageProps": {
                "bizPortfolioProps": portfolio,
                "reviewFeedQueryProps": { "reviews": reviews }
            }
        })
    }

    fn portfolio(website: &str) -> Value {
        json!({ "ctaProps": { "website": website, "phone": "(415) 555-0100" } })
    }

    #[test]
    fn resolves_website_from_portfolio_redirect() {
        let payload = detail(
            &portfolio("/biz_redir?url=https%3A%2F%2Fgoldenboy.example&website_link_type=website"),
            2,
        );
        let mut rec = record();
        let resolution = resolve_detail(&payload, &mut rec).unwrap();
        assert_eq!(
            resolution,
            WebsiteResolution::Resolved("https://goldenboy.example".to_owned())
        );
        assert_eq!(rec.business_url.as_deref(), Some("https://goldenboy.example"));
    }

    #[test]
    fn website_without_redirect_pattern_is_unresolved() {
        let payload = detail(&portfolio("https://goldenboy.example"), 1);
        let mut rec = record();
        assert_eq!(
            resolve_detail(&payload, &mut rec).unwrap(),
            WebsiteResolution::Unresolved
        );
        assert!(rec.business_url.is_none());
    }

    #[test]
    fn absent_or_empty_portfolio_is_unresolved() {
        for portfolio in [json!(null), json!({})] {
            let payload = detail(&portfolio, 1);
            let mut rec = record();
            assert_eq!(
                resolve_detail(&payload, &mut rec).unwrap(),
                WebsiteResolution::Unresolved
            );
        }

        let payload = json!({
            "bizDetailsPageProps": { "reviewFeedQueryProps": { "reviews": [] } }
        });
        let mut rec = record();
        assert_eq!(
            resolve_detail(&payload, &mut rec).unwrap(),
            WebsiteResolution::Unresolved
        );
    }

    #[test]
    fn portfolio_without_cta_is_unresolved() {
        let payload = detail(&json!({ "photos": [] }), 0);
        let mut rec = record();
        assert_eq!(
            resolve_detail(&payload, &mut rec).unwrap(),
            WebsiteResolution::Unresolved
        );
    }

    #[test]
    fn keeps_at_most_five_reviews_in_source_order() {
        for (source, kept) in [(0, 0), (3, 3), (5, 5), (12, 5)] {
            let payload = detail(&json!(null), source);
            let mut rec = record();
            resolve_detail(&payload, &mut rec).unwrap();
            assert_eq!(rec.reviews.len(), kept, "source reviews: {source}");
            for (i, r) in rec.reviews.iter().enumerate() {
                assert_eq!(r.reviewer, format!("Reviewer {}", i + 1));
            }
        }
    }

    #[test]
    fn maps_review_fields() {
        let payload = detail(&json!(null), 1);
        let mut rec = record();
        resolve_detail(&payload, &mut rec).unwrap();
        assert_eq!(
            rec.reviews[0],
            ReviewSummary {
                reviewer: "Reviewer 1".to_owned(),
                reviewer_location: "San Francisco, CA".to_owned(),
                review_date: "1/1/2024".to_owned(),
            }
        );
    }

    #[test]
    fn malformed_review_beyond_the_fifth_is_ignored() {
        let mut reviews: Vec<Value> = (1..=5).map(review).collect();
        reviews.push(json!({ "broken": true }));
        let payload = json!({
            "bizDetailsPageProps": { "reviewFeedQueryProps": { "reviews": reviews } }
        });
        let mut rec = record();
        resolve_detail(&payload, &mut rec).unwrap();
        assert_eq!(rec.reviews.len(), 5);
    }

    #[test]
    fn malformed_kept_review_is_detail_payload_error() {
        let payload = json!({
            "bizDetailsPageProps": {
                "reviewFeedQueryProps": { "reviews": [{ "user": {} }] }
            }
        });
        let err = resolve_detail(&payload, &mut record()).unwrap_err();
        assert!(matches!(err, ScraperError::DetailPayload { .. }), "got: {err:?}");
    }

    #[test]
    fn missing_details_root_is_detail_payload_error() {
        let err = resolve_detail(&json!({ "other": 1 }), &mut record()).unwrap_err();
        assert!(
            matches!(err, ScraperError::DetailPayload { ref url, .. } if url.ends_with("golden-boy-sf")),
            "got: {err:?}"
        );
    }

    #[test]
    fn missing_review_feed_is_detail_payload_error() {
        let payload = json!({ "bizDetailsPageProps": { "bizPortfolioProps": null } });
        let err = resolve_detail(&payload, &mut record()).unwrap_err();
        assert!(matches!(err, ScraperError::DetailPayload { .. }), "got: {err:?}");
    }

    #[test]
    fn blank_body_is_detail_payload_error() {
        let err = parse_detail_payload("  \n", "https://www.yelp.com/biz/x/props").unwrap_err();
        assert!(matches!(err, ScraperError::DetailPayload { .. }), "got: {err:?}");
    }

    #[test]
    fn invalid_json_body_is_detail_payload_error() {
        let err = parse_detail_payload("<html>blocked</html>", "u").unwrap_err();
        assert!(
            matches!(err, ScraperError::DetailPayload { ref reason, .. } if reason.starts_with("invalid JSON")),
            "got: {err:?}"
        );
    }

    #[test]
    fn parses_json_body() {
        let value = parse_detail_payload(r#"{"bizDetailsPageProps":{}}"#, "u").unwrap();
        assert!(value["bizDetailsPageProps"].is_object());
    }
}
