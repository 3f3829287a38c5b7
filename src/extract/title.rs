use std::fmt;

use serde::{Deserialize, Serialize};

/// Titles carrying any of these are complete systems, not bare cards.
const EXCLUSION_KEYWORDS: &[&str] = &["Laptop", "Prebuilt"];

/// Literal marketing string the catalog puts in every graphics-card page
/// title. Case-sensitive; looser markers ("GPU", "RTX") match accessory
/// listings too.
const GPU_MARKER: &str = "Graphics Card";

/// Ordered longest-first so a short token can never shadow a longer token
/// that contains it as a substring (the "580" vs "A580" class of bug).
/// `token_order_prevents_shadowing` below checks every pair.
const MODEL_TOKENS: &[&str] = &[
    // Nvidia workstation
    "A6000", "A5500", "A5000", "A4500", "A4000", "A2000",
    // AMD workstation
    "W7900", "W7800", "W7700", "W7600", "W6800", "W6600", "W6400", "W5700", "W5500",
    "TITAN",
    // Nvidia consumer
    "5090", "5080", "5070", "5060", "4090", "4080", "4070", "4060",
    "3090", "3080", "3070", "3060", "3050", "2080", "2070", "2060",
    "1660", "1650", "1630", "1080", "1070", "1060", "1050", "1030",
    // Intel Arc
    "A770", "A750", "A580", "A380", "A310", "B580", "B570",
    // AMD consumer
    "7900", "7800", "7700", "7600", "6950", "6900", "6800", "6750",
    "6700", "6650", "6600", "6500", "6400", "5700", "5600", "5500",
    "VEGA",
    // AMD Polaris three-digit models
    "590", "580", "570", "560", "550",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleClass {
    /// Prebuilt system or laptop; recorded as non-GPU.
    Excluded,
    GraphicsCard,
    NotGraphicsCard,
}

pub fn classify_title(title: &str) -> TitleClass {
    if EXCLUSION_KEYWORDS.iter().any(|kw| title.contains(kw)) {
        return TitleClass::Excluded;
    }
    if title.contains(GPU_MARKER) {
        TitleClass::GraphicsCard
    } else {
        TitleClass::NotGraphicsCard
    }
}

/// GPU silicon manufacturer. Declaration order doubles as the report sort
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Vendor {
    Nvidia,
    #[serde(rename = "AMD")]
    Amd,
    Intel,
    Unknown,
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Vendor::Nvidia => "Nvidia",
            Vendor::Amd => "AMD",
            Vendor::Intel => "Intel",
            Vendor::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

pub fn extract_vendor(title: &str) -> Vendor {
    let title = title.to_lowercase();
    if title.contains("nvidia") || title.contains("geforce") {
        Vendor::Nvidia
    } else if title.contains("amd") || title.contains("radeon") {
        Vendor::Amd
    } else if title.contains("intel") {
        Vendor::Intel
    } else {
        Vendor::Unknown
    }
}

pub fn extract_model(title: &str) -> String {
    let title = title.to_uppercase();
    MODEL_TOKENS
        .iter()
        .find(|token| title.contains(*token))
        .map(|token| token.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

// ── Tests ──
