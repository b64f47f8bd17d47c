// src/services/client.rs

//! SerpAPI Google Trends client.
//!
//! Two engines are used:
//! - `google_trends_trending_now` for the trending searches of a region
//! - `google_trends` (TIMESERIES) for the interest over time of a keyword
//!
//! Each call is a single GET request. Failures are returned to the caller
//! as [`AppError::Api`] without any retry.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::models::{Config, InterestPoint, KeywordInterest, clamp_count};
use crate::utils::http::create_async_client;
use crate::utils::parse_count;

const TRENDING_ENGINE: &str = "google_trends_trending_now";
const INTEREST_ENGINE: &str = "google_trends";

/// Longest slice of a failed response body kept in an error message.
const MAX_ERROR_BODY: usize = 300;

/// Query operations against the search-trends API.
#[async_trait]
pub trait TrendsApi: Send + Sync {
    /// Fetch at most `count` (clamped to 1..=25) trending searches for a region.
    async fn fetch_trending(&self, region_code: &str, count: u32) -> Result<Vec<Value>>;

    /// Fetch interest over time for one keyword in a region.
    async fn fetch_keyword_interest(
        &self,
        keyword: &str,
        region_code: &str,
    ) -> Result<KeywordInterest>;
}

/// HTTP implementation of [`TrendsApi`] backed by SerpAPI.
pub struct SerpApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeframe: String,
}

impl SerpApiClient {
    /// Create a client from the validated configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: create_async_client(&config.http)?,
            base_url: config.http.base_url.clone(),
            api_key: config.api_key.clone(),
            timeframe: config.timeframe.clone(),
        })
    }

    /// Issue one search request and return the HTTP status with the JSON
    /// object body.
    async fn search(&self, params: &[(&str, &str)]) -> Result<(u16, Map<String, Value>)> {
        let response = self
            .client
            .get(&self.base_url)
            .query(params)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::api(None, e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::api(Some(status.as_u16()), e.without_url()))?;

        if !status.is_success() {
            return Err(AppError::api(
                Some(status.as_u16()),
                error_message(&body).unwrap_or_else(|| status.to_string()),
            ));
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            AppError::api(Some(status.as_u16()), format!("malformed response body: {e}"))
        })?;

        let Value::Object(object) = value else {
            return Err(AppError::api(
                Some(status.as_u16()),
                "malformed response body: expected a JSON object",
            ));
        };

        if let Some(message) = object.get("error").and_then(Value::as_str) {
            return Err(AppError::api(Some(status.as_u16()), message));
        }

        Ok((status.as_u16(), object))
    }
}

#[async_trait]
impl TrendsApi for SerpApiClient {
    async fn fetch_trending(&self, region_code: &str, count: u32) -> Result<Vec<Value>> {
        log::debug!("GET {TRENDING_ENGINE} geo={region_code}");
        let (status, mut body) = self
            .search(&[("engine", TRENDING_ENGINE), ("geo", region_code)])
            .await?;

        let Some(Value::Array(mut items)) = body.remove("trending_searches") else {
            return Err(AppError::api(
                Some(status),
                "response has no trending_searches array",
            ));
        };

        items.truncate(usize::from(clamp_count(count)));
        Ok(items)
    }

    async fn fetch_keyword_interest(
        &self,
        keyword: &str,
        region_code: &str,
    ) -> Result<KeywordInterest> {
        log::debug!("GET {INTEREST_ENGINE} q={keyword:?} geo={region_code}");
        let (_, mut body) = self
            .search(&[
                ("engine", INTEREST_ENGINE),
                ("q", keyword),
                ("geo", region_code),
                ("date", self.timeframe.as_str()),
                ("data_type", "TIMESERIES"),
            ])
            .await?;

        let timeline = body
            .get("interest_over_time")
            .and_then(|iot| iot.get("timeline_data"))
            .and_then(Value::as_array)
            .map(|points| points.iter().filter_map(parse_point).collect())
            .unwrap_or_default();

        Ok(KeywordInterest {
            keyword: keyword.to_string(),
            timeframe: self.timeframe.clone(),
            timeline,
            related_queries: body.remove("related_queries").filter(|v| !v.is_null()),
            related_topics: body.remove("related_topics").filter(|v| !v.is_null()),
        })
    }
}

/// Convert one `timeline_data` entry, skipping entries without a date.
fn parse_point(point: &Value) -> Option<InterestPoint> {
    let date = point.get("date").and_then(Value::as_str)?;
    let first = point.get("values").and_then(|v| v.get(0));

    let value = first.and_then(|v| {
        v.get("extracted_value")
            .and_then(parse_count)
            .or_else(|| match v.get("value").and_then(Value::as_str) {
                Some("<1") => Some(0),
                Some(s) => parse_count(&Value::String(s.to_string())),
                None => None,
            })
    });

    Some(InterestPoint {
        date: date.to_string(),
        value: value.and_then(|v| i64::try_from(v).ok()),
    })
}

/// Best-effort message from an error body.
fn error_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Some(message.to_string());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_ERROR_BODY).collect())
}
