use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use tracing::warn;

use crate::store::{self, GpuRecord, GPU_FILE};

static NON_NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9.]").unwrap());

/// Numeric sort key for prices like "$1,599.99". "Not Available" and
/// anything else unparseable sorts last.
fn price_key(price: &str) -> f64 {
    NON_NUMERIC_RE
        .replace_all(price, "")
        .parse::<f64>()
        .unwrap_or(f64::INFINITY)
}

/// Cosmetic end-of-run pass: rewrite the GPU set ordered by vendor, then
/// model, then numeric price. A missing or unreadable set is reported and
/// left alone; only the rewrite itself can fail the run.
pub fn sort_gpu_set(dir: &Path) -> Result<usize> {
    let path = dir.join(GPU_FILE);
    if !path.exists() {
        warn!("nothing to sort: {} does not exist yet", path.display());
        return Ok(0);
    }

    let mut records: Vec<GpuRecord> = match store::read_all(&path) {
        Ok(records) => records,
        Err(err) => {
            warn!("leaving {} unsorted: {err:#}", path.display());
            return Ok(0);
        }
    };

    records.sort_by(|a, b| {
        a.vendor
            .cmp(&b.vendor)
            .then_with(|| a.model.cmp(&b.model))
            .then_with(|| price_key(&a.price).total_cmp(&price_key(&b.price)))
    });

    store::rewrite(&path, &records)?;
    Ok(records.len())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::extract::Vendor;

    fn gpu(id: u64, vendor: Vendor, model: &str, price: &str) -> GpuRecord {
        GpuRecord {
            id,
            price: price.to_string(),
            vendor,
            brand: "ASUS".to_string(),
            model: model.to_string(),
            title: format!("ASUS {model} Graphics Card"),
        }
    }

    #[test]
    fn price_key_strips_currency_noise() {
        assert_eq!(price_key("$1,599.99"), 1599.99);
        assert_eq!(price_key("549.99"), 549.99);
        assert!(price_key("Not Available").is_infinite());
        assert!(price_key("").is_infinite());
    }

    #[test]
    fn sorts_by_vendor_then_model_then_price() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(GPU_FILE);
        store::rewrite(
            &path,
            &[
                gpu(5, Vendor::Amd, "6800", "479.99"),
                gpu(1, Vendor::Nvidia, "4090", "Not Available"),
                gpu(2, Vendor::Nvidia, "4090", "$1,599.99"),
                gpu(3, Vendor::Intel, "A770", "289.99"),
                gpu(4, Vendor::Nvidia, "4070", "549.99"),
            ],
        )
        .unwrap();

        let sorted = sort_gpu_set(dir.path()).unwrap();
        assert_eq!(sorted, 5);

        let records: Vec<GpuRecord> = store::read_all(&path).unwrap();
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        // Nvidia first (4070 before 4090, priced 4090 before unpriced),
        // then AMD, then Intel.
        assert_eq!(ids, vec![4, 2, 1, 5, 3]);
    }

    #[test]
    fn missing_set_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        assert_eq!(sort_gpu_set(dir.path()).unwrap(), 0);
    }

    #[test]
    fn unreadable_set_is_left_unsorted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(GPU_FILE);
        std::fs::write(&path, "id,price,vendor,brand,model,title\nbogus row\n").unwrap();

        assert_eq!(sort_gpu_set(dir.path()).unwrap(), 0);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("bogus row"));
    }
}
