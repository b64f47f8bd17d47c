//! Raw collection records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::models::{Config, Region};

/// Data source label written into every record.
pub const SOURCE: &str = "SerpAPI Google Trends";

/// Per-region data as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTrendRecord {
    pub region_name: String,
    pub region_code: String,
    pub collection_time: DateTime<Utc>,
    pub source: String,

    /// Raw trending items in API order; absent when trending is disabled or failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trending_searches: Option<Vec<Value>>,

    /// Why the trending call failed, when it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trending_error: Option<ErrorMarker>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyword_interest: Vec<KeywordInterest>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyword_errors: Vec<KeywordFailure>,
}

impl RawTrendRecord {
    /// Create an empty record for a region.
    pub fn new(region: &Region) -> Self {
        Self {
            region_name: region.name.clone(),
            region_code: region.code.clone(),
            collection_time: Utc::now(),
            source: SOURCE.to_string(),
            trending_searches: None,
            trending_error: None,
            keyword_interest: Vec::new(),
            keyword_errors: Vec::new(),
        }
    }

    /// Raw trending items, empty when none were collected.
    pub fn trending_items(&self) -> &[Value] {
        self.trending_searches.as_deref().unwrap_or_default()
    }
}

/// Interest-over-time result for one keyword in one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordInterest {
    pub keyword: String,
    pub timeframe: String,
    pub timeline: Vec<InterestPoint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_queries: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_topics: Option<Value>,
}

/// A single point of an interest timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestPoint {
    pub date: String,
    pub value: Option<i64>,
}

/// A keyword query that failed for a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordFailure {
    pub keyword: String,
    pub error: ErrorMarker,
}

/// Serializable description of a failed API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMarker {
    pub status: Option<u16>,
    pub message: String,
}

impl From<&AppError> for ErrorMarker {
    fn from(error: &AppError) -> Self {
        let message = match error {
            AppError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self {
            status: error.status(),
            message,
        }
    }
}

/// A region whose collection failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionFailure {
    pub region_name: String,
    pub region_code: String,
    pub collection_time: DateTime<Utc>,
    pub error: ErrorMarker,
}

/// Outcome of collecting one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum RegionOutcome {
    #[serde(rename = "ok")]
    Success(RawTrendRecord),
    #[serde(rename = "error")]
    Failed(RegionFailure),
}

impl RegionOutcome {
    /// Record a failure for a region.
    pub fn failed(region: &Region, error: ErrorMarker) -> Self {
        Self::Failed(RegionFailure {
            region_name: region.name.clone(),
            region_code: region.code.clone(),
            collection_time: Utc::now(),
            error,
        })
    }

    pub fn region_code(&self) -> &str {
        match self {
            Self::Success(record) => &record.region_code,
            Self::Failed(failure) => &failure.region_code,
        }
    }

    pub fn region_name(&self) -> &str {
        match self {
            Self::Success(record) => &record.region_name,
            Self::Failed(failure) => &failure.region_name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn record(&self) -> Option<&RawTrendRecord> {
        match self {
            Self::Success(record) => Some(record),
            Self::Failed(_) => None,
        }
    }
}

/// Top-level metadata of a collection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionMetadata {
    pub collection_time: DateTime<Utc>,
    pub keywords: Vec<String>,
    pub total_regions: usize,
    pub successful_regions: usize,
    pub failed_regions: usize,
    pub timeframe: String,
    pub trending_searches_enabled: bool,
    pub requests_made: usize,
    pub source: String,
    pub api_usage_note: String,
}

impl CollectionMetadata {
    pub fn new(config: &Config) -> Self {
        Self {
            collection_time: Utc::now(),
            keywords: config.keywords.clone(),
            total_regions: config.regions.len(),
            successful_regions: 0,
            failed_regions: 0,
            timeframe: config.timeframe.clone(),
            trending_searches_enabled: config.trending_config.enabled,
            requests_made: 0,
            source: SOURCE.to_string(),
            api_usage_note: "Each request uses your SerpAPI quota".to_string(),
        }
    }
}

/// Everything collected in one run, one entry per configured region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionResult {
    pub metadata: CollectionMetadata,
    pub regions: Vec<RegionOutcome>,
}

impl CollectionResult {
    pub fn new(metadata: CollectionMetadata) -> Self {
        Self {
            metadata,
            regions: Vec::new(),
        }
    }

    /// Append a region outcome and refresh the counters.
    pub fn push(&mut self, outcome: RegionOutcome) {
        self.regions.push(outcome);
        self.metadata.successful_regions = self.success_count();
        self.metadata.failed_regions = self.regions.len() - self.metadata.successful_regions;
    }

    /// Look up a region by code.
    pub fn get(&self, region_code: &str) -> Option<&RegionOutcome> {
        self.regions
            .iter()
            .find(|outcome| outcome.region_code().eq_ignore_ascii_case(region_code))
    }

    /// Successful region records in configuration order.
    pub fn successful(&self) -> impl Iterator<Item = &RawTrendRecord> {
        self.regions.iter().filter_map(RegionOutcome::record)
    }

    pub fn success_count(&self) -> usize {
        self.regions.iter().filter(|o| o.is_success()).count()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn region(code: &str) -> Region {
        Region::new(format!("Region {code}"), code)
    }

    #[test]
    fn outcome_is_tagged_by_status() {
        let mut record = RawTrendRecord::new(&region("PL"));
        record.trending_searches = Some(vec![json!({"query": "pogoda"})]);

        let ok = serde_json::to_value(RegionOutcome::Success(record)).unwrap();
        assert_eq!(ok["status"], "ok");
        assert_eq!(ok["region_code"], "PL");
        assert_eq!(ok["trending_searches"][0]["query"], "pogoda");

        let marker = ErrorMarker {
            status: Some(500),
            message: "boom".into(),
        };
        let failed = serde_json::to_value(RegionOutcome::failed(&region("US"), marker)).unwrap();
        assert_eq!(failed["status"], "error");
        assert_eq!(failed["error"]["status"], 500);
    }

    #[test]
    fn push_updates_counters_and_lookup() {
        let mut result = CollectionResult::new(CollectionMetadata {
            collection_time: Utc::now(),
            keywords: vec![],
            total_regions: 2,
            successful_regions: 0,
            failed_regions: 0,
            timeframe: "today 3-m".into(),
            trending_searches_enabled: true,
            requests_made: 0,
            source: SOURCE.into(),
            api_usage_note: String::new(),
        });
        result.push(RegionOutcome::Success(RawTrendRecord::new(&region("PL"))));
        result.push(RegionOutcome::failed(
            &region("US"),
            ErrorMarker {
                status: None,
                message: "timeout".into(),
            },
        ));

        assert_eq!(result.len(), 2);
        assert_eq!(result.metadata.successful_regions, 1);
        assert_eq!(result.metadata.failed_regions, 1);
        assert!(result.get("pl").is_some_and(RegionOutcome::is_success));
        assert!(result.get("US").is_some_and(|o| !o.is_success()));
        assert!(result.get("DE").is_none());
    }

    #[test]
    fn error_marker_from_api_error_keeps_status() {
        let marker = ErrorMarker::from(&AppError::api(Some(429), "quota exceeded"));
        assert_eq!(marker.status, Some(429));
        assert_eq!(marker.message, "quota exceeded");
    }
}
