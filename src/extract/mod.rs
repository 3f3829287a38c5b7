mod page;
mod title;

pub use page::{page_title, price_and_brand, BRAND_UNKNOWN, PRICE_UNAVAILABLE};
pub use title::{classify_title, extract_model, extract_vendor, TitleClass, Vendor};

use scraper::Html;

use crate::store::GpuRecord;

/// Build a full GPU record from a parsed product page that classified as a
/// graphics card.
pub fn gpu_record(doc: &Html, id: u64, title: &str) -> GpuRecord {
    let (price, brand) = price_and_brand(doc, id);
    GpuRecord {
        id,
        price,
        vendor: extract_vendor(title),
        brand,
        model: extract_model(title),
        title: title.to_string(),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_from_full_page() {
        let doc = Html::parse_document(
            r#"<html>
                <head><title>ASUS Radeon RX 6800 Graphics Card</title></head>
                <body><span class="ProductLink_660001" data-price="479.99" data-brand="ASUS"></span></body>
            </html>"#,
        );
        let title = page_title(&doc);
        let record = gpu_record(&doc, 660001, &title);
        assert_eq!(record.id, 660001);
        assert_eq!(record.vendor, Vendor::Amd);
        assert_eq!(record.model, "6800");
        assert_eq!(record.price, "479.99");
        assert_eq!(record.brand, "ASUS");
    }

    #[test]
    fn sparse_page_still_yields_a_record() {
        let doc = Html::parse_document(
            "<html><head><title>Mystery Graphics Card</title></head><body></body></html>",
        );
        let record = gpu_record(&doc, 5, "Mystery Graphics Card");
        assert_eq!(record.vendor, Vendor::Unknown);
        assert_eq!(record.model, "Unknown");
        assert_eq!(record.price, PRICE_UNAVAILABLE);
        assert_eq!(record.brand, BRAND_UNKNOWN);
    }
}
