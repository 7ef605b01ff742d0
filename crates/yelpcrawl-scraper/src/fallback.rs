//! Website lookup on the rendered business page.
//!
//! Used only when the detail payload had no website. The business page lays
//! the sidebar out as
//!
//! ```html
//! <p>Business website</p>
//! <p><a href="/biz_redir?url=https%3A%2F%2Fexample.com&amp;...">example.com</a></p>
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::normalize::normalize_redirect_url;

/// Stored in `business_url` when the business has no site of its own.
pub const NO_PERSONAL_WEBSITE: &str = "The business has not personal website";

const WEBSITE_LABEL: &str = "Business website";

/// Extracts the business website from its listing page HTML.
///
/// Only redirect-wrapped links count; an href without an embedded `url=`
/// target is treated as absent. Never fails: a page without the label or
/// link yields [`NO_PERSONAL_WEBSITE`].
#[must_use]
pub fn resolve_website_from_html(html: &str) -> String {
    website_href(html)
        .as_deref()
        .and_then(normalize_redirect_url)
        .unwrap_or_else(|| NO_PERSONAL_WEBSITE.to_owned())
}

/// The href of the first `<a>` anywhere inside a `<p>` sibling that follows
/// the "Business website" label.
fn website_href(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let paragraph = Selector::parse("p").expect("valid selector");
    let link = Selector::parse("a[href]").expect("valid selector");

    document
        .select(&paragraph)
        .filter(|p| has_own_text(p, WEBSITE_LABEL))
        .find_map(|label| {
            label
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .filter(|sibling| sibling.value().name() == "p")
                .find_map(|sibling| {
                    sibling
                        .select(&link)
                        .find_map(|a| a.value().attr("href"))
                })
        })
        .map(str::to_owned)
}

fn has_own_text(element: &ElementRef<'_>, needle: &str) -> bool {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .any(|text| text.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sidebar(inner: &str) -> String {
        format!(
            r#"<!DOCTYPE html><html><body><main>
<section aria-label="Location &amp; Hours"><p>Mon 11:00 AM - 10:00 PM</p></section>
<section><div>{inner}</div></section>
</main></body></html>"#
        )
    }

    #[test]
    fn returns_decoded_redirect_target() {
        let html = sidebar(
            r#"<p class="label">Business website</p>
<p class="link"><a href="/biz_redir?url=https%3A%2F%2Fgoldenboypizza.example%2F&amp;website_link_type=website&amp;src_bizid=abc" target="_blank">goldenboypizza.example</a></p>"#,
        );
        assert_eq!(resolve_website_from_html(&html), "https://goldenboypizza.example/");
    }

    #[test]
    fn skips_non_paragraph_siblings() {
        let html = sidebar(
            r#"<p>Business website</p><span>ignored</span>
<p><a href="/biz_redir?url=http%3A%2F%2Fa.example&amp;x=1">a.example</a></p>"#,
        );
        assert_eq!(resolve_website_from_html(&html), "http://a.example");
    }

    #[test]
    fn label_inside_other_text_still_matches() {
        let html = sidebar(
            r#"<p>Business website </p>
<p><a href="/biz_redir?url=https%3A%2F%2Fb.example&amp;cachebuster=9">b.example</a></p>"#,
        );
        assert_eq!(resolve_website_from_html(&html), "https://b.example");
    }

    #[test]
    fn missing_label_returns_sentinel() {
        let html = sidebar(r#"<p>Phone number</p><p><a href="tel:4155550100">(415) 555-0100</a></p>"#);
        assert_eq!(resolve_website_from_html(&html), NO_PERSONAL_WEBSITE);
    }

    #[test]
    fn label_without_link_returns_sentinel() {
        let html = sidebar(r"<p>Business website</p><p>coming soon</p>");
        assert_eq!(resolve_website_from_html(&html), NO_PERSONAL_WEBSITE);
    }

    #[test]
    fn link_nested_inside_paragraph_markup_is_found() {
        let html = sidebar(
            r#"<p>Business website</p>
<p><span><a href="/biz_redir?url=https%3A%2F%2Fc.example&amp;x=1">c</a></span></p>"#,
        );
        assert_eq!(resolve_website_from_html(&html), "https://c.example");
    }

    #[test]
    fn anchor_without_href_is_skipped() {
        let html = sidebar(
            r#"<p>Business website</p>
<p><a name="site"></a><a href="/biz_redir?url=https%3A%2F%2Fd.example&amp;x=1">d</a></p>"#,
        );
        assert_eq!(resolve_website_from_html(&html), "https://d.example");
    }

    #[test]
    fn sentinel_keeps_its_established_wording() {
        assert_eq!(NO_PERSONAL_WEBSITE, "The business has not personal website");
    }

    #[test]
    fn unwrapped_href_is_treated_as_absent() {
        let html = sidebar(
            r#"<p>Business website</p><p><a href="https://direct.example">direct.example</a></p>"#,
        );
        assert_eq!(resolve_website_from_html(&html), NO_PERSONAL_WEBSITE);
    }

    #[test]
    fn empty_document_returns_sentinel() {
        assert_eq!(resolve_website_from_html(""), NO_PERSONAL_WEBSITE);
    }
}
