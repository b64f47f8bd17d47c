// src/pipeline/collect.rs

//! Region-by-region trend collection.

use std::time::Duration;

use crate::models::{
    CollectionMetadata, CollectionResult, Config, ErrorMarker, KeywordFailure, RawTrendRecord,
    Region, RegionOutcome,
};
use crate::services::TrendsApi;

/// Sequential collector that paces its requests.
struct Collector<'a> {
    api: &'a dyn TrendsApi,
    config: &'a Config,
    delay: Duration,
    requests: usize,
}

impl<'a> Collector<'a> {
    fn new(api: &'a dyn TrendsApi, config: &'a Config) -> Self {
        Self {
            api,
            config,
            delay: Duration::from_millis(config.http.request_delay_ms),
            requests: 0,
        }
    }

    /// Sleep before every request but the first.
    async fn pace(&mut self) {
        if self.requests > 0 && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.requests += 1;
    }

    async fn collect_region(&mut self, region: &Region) -> RegionOutcome {
        let mut record = RawTrendRecord::new(region);

        if self.config.trending_config.enabled {
            self.pace().await;
            match self
                .api
                .fetch_trending(&region.code, self.config.trending_config.count)
                .await
            {
                Ok(items) => {
                    log::info!(
                        "Collected {} trending searches for {} ({})",
                        items.len(),
                        region.name,
                        region.code
                    );
                    record.trending_searches = Some(items);
                }
                Err(error) => {
                    log::warn!(
                        "Trending searches failed for {} ({}): {}",
                        region.name,
                        region.code,
                        error
                    );
                    record.trending_error = Some(ErrorMarker::from(&error));
                }
            }
        }

        for keyword in &self.config.keywords {
            self.pace().await;
            match self.api.fetch_keyword_interest(keyword, &region.code).await {
                Ok(interest) => {
                    log::info!(
                        "Collected interest over time for {:?} in {} ({} points)",
                        keyword,
                        region.code,
                        interest.timeline.len()
                    );
                    record.keyword_interest.push(interest);
                }
                Err(error) => {
                    log::warn!(
                        "Keyword {:?} failed for {} ({}): {}",
                        keyword,
                        region.name,
                        region.code,
                        error
                    );
                    record.keyword_errors.push(KeywordFailure {
                        keyword: keyword.clone(),
                        error: ErrorMarker::from(&error),
                    });
                }
            }
        }

        if record.trending_searches.is_none() && record.keyword_interest.is_empty() {
            if let Some(error) = all_calls_failed(&record) {
                return RegionOutcome::failed(region, error);
            }
        }

        RegionOutcome::Success(record)
    }
}

/// Combined marker for a region where every attempted call failed.
///
/// Returns `None` when no call was attempted for the region.
fn all_calls_failed(record: &RawTrendRecord) -> Option<ErrorMarker> {
    let mut failures: Vec<(String, &ErrorMarker)> = Vec::new();
    if let Some(error) = &record.trending_error {
        failures.push(("trending".to_string(), error));
    }
    for failure in &record.keyword_errors {
        failures.push((format!("keyword {:?}", failure.keyword), &failure.error));
    }

    let (_, first) = failures.first()?;
    let message = failures
        .iter()
        .map(|(call, e)| format!("{call}: {}", e.message))
        .collect::<Vec<_>>()
        .join("; ");

    Some(ErrorMarker {
        status: first.status,
        message: format!("all queries failed ({message})"),
    })
}

/// Collect every configured region, in order, into one result.
///
/// API failures are recorded per region and never abort the collection.
pub async fn collect(api: &dyn TrendsApi, config: &Config) -> CollectionResult {
    let mut collector = Collector::new(api, config);
    let mut result = CollectionResult::new(CollectionMetadata::new(config));
    let total = config.regions.len();

    if !config.trending_config.enabled {
        log::info!("Trending searches disabled, skipping trending requests");
    }

    for (i, region) in config.regions.iter().enumerate() {
        log::info!(
            "Processing region {}/{}: {} ({})",
            i + 1,
            total,
            region.name,
            region.code
        );
        let outcome = collector.collect_region(region).await;
        result.push(outcome);
    }

    result.metadata.requests_made = collector.requests;
    result
}
