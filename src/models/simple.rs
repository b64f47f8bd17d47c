//! Simplified output for downstream consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category used when the API reports none.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// A trending query reduced to the fields consumers care about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedTrendItem {
    pub query: String,
    pub search_volume: Option<u64>,
    pub increase_percentage: Option<f64>,
    pub category: String,
}

/// Simplified items of one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedRegion {
    pub region_name: String,
    pub region_code: String,
    pub trending_queries: Vec<SimplifiedTrendItem>,
}

/// The `_simple` output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedOutput {
    pub collection_time: DateTime<Utc>,
    pub total_items: usize,
    pub regions: Vec<SimplifiedRegion>,
}

impl SimplifiedOutput {
    /// All items, concatenated by region in configuration order.
    pub fn items(&self) -> impl Iterator<Item = &SimplifiedTrendItem> {
        self.regions.iter().flat_map(|r| r.trending_queries.iter())
    }
}
