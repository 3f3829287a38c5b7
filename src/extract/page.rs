use std::sync::LazyLock;

use scraper::{Html, Selector};

pub const PRICE_UNAVAILABLE: &str = "Not Available";
pub const BRAND_UNKNOWN: &str = "Unknown";

static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

/// Tab title text, trimmed. Empty when the page has no title element.
pub fn page_title(doc: &Html) -> String {
    doc.select(&TITLE_SEL)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Price and brand off the per-id product link element. The element carries
/// both as data attributes; a missing element or attribute degrades to the
/// fallback values rather than failing.
pub fn price_and_brand(doc: &Html, id: u64) -> (String, String) {
    // The id is numeric, so the selector always parses.
    let selector = Selector::parse(&format!("span.ProductLink_{id}")).unwrap();
    match doc.select(&selector).next() {
        Some(el) => {
            let price = el
                .value()
                .attr("data-price")
                .unwrap_or(PRICE_UNAVAILABLE)
                .trim()
                .to_string();
            let brand = el
                .value()
                .attr("data-brand")
                .unwrap_or(BRAND_UNKNOWN)
                .trim()
                .to_string();
            (price, brand)
        }
        None => (PRICE_UNAVAILABLE.to_string(), BRAND_UNKNOWN.to_string()),
    }
}

// ── Tests ──
