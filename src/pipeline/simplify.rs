// src/pipeline/simplify.rs

//! Projection of raw collection results into the simplified schema.

use serde_json::Value;

use crate::models::{
    CollectionResult, RawTrendRecord, SimplifiedOutput, SimplifiedRegion, SimplifiedTrendItem,
    UNKNOWN_CATEGORY,
};
use crate::utils::{parse_count, parse_percentage};

/// Reduce a collection result to the simplified output.
///
/// Only successful regions are included, in configuration order, with items
/// in the order the API returned them. Duplicates across regions are kept.
pub fn simplify(result: &CollectionResult) -> SimplifiedOutput {
    let regions: Vec<SimplifiedRegion> = result.successful().map(simplify_region).collect();
    let total_items = regions.iter().map(|r| r.trending_queries.len()).sum();

    SimplifiedOutput {
        collection_time: result.metadata.collection_time,
        total_items,
        regions,
    }
}

fn simplify_region(record: &RawTrendRecord) -> SimplifiedRegion {
    SimplifiedRegion {
        region_name: record.region_name.clone(),
        region_code: record.region_code.clone(),
        trending_queries: record.trending_items().iter().map(simplify_item).collect(),
    }
}

/// Project one raw trending item. Missing or unparsable fields become null.
pub fn simplify_item(raw: &Value) -> SimplifiedTrendItem {
    SimplifiedTrendItem {
        query: raw
            .get("query")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        search_volume: raw.get("search_volume").and_then(parse_count),
        increase_percentage: raw.get("increase_percentage").and_then(parse_percentage),
        category: category(raw).unwrap_or(UNKNOWN_CATEGORY).to_string(),
    }
}

/// First category name, whether reported as objects or plain strings.
fn category(raw: &Value) -> Option<&str> {
    let first = raw.get("categories")?.as_array()?.first()?;
    first
        .get("name")
        .and_then(Value::as_str)
        .or_else(|| first.as_str())
        .filter(|name| !name.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CollectionMetadata, Config, ErrorMarker, Region, RegionOutcome};
    use serde_json::json;

    fn record(code: &str, items: Vec<Value>) -> RawTrendRecord {
        let mut record = RawTrendRecord::new(&Region::new(format!("Region {code}"), code));
        record.trending_searches = Some(items);
        record
    }

    fn result_with(outcomes: Vec<RegionOutcome>) -> CollectionResult {
        let config = Config::from_json(
            r#"{"api_key": "k", "regions": [{"name": "Polska", "code": "PL"}]}"#,
        )
        .unwrap();
        let mut result = CollectionResult::new(CollectionMetadata::new(&config));
        for outcome in outcomes {
            result.push(outcome);
        }
        result
    }

    #[test]
    fn projects_all_fields() {
        let item = simplify_item(&json!({
            "query": "mecz polska",
            "search_volume": 200000,
            "increase_percentage": 1000,
            "categories": [{"id": 17, "name": "Sports"}, {"id": 4, "name": "Other"}],
            "trend_breakdown": ["polska mecz"]
        }));
        assert_eq!(
            item,
            SimplifiedTrendItem {
                query: "mecz polska".into(),
                search_volume: Some(200_000),
                increase_percentage: Some(1000.0),
                category: "Sports".into(),
            }
        );
    }

    #[test]
    fn parses_display_strings() {
        let item = simplify_item(&json!({
            "query": "weather",
            "search_volume": "50K+",
            "increase_percentage": "+300%",
            "categories": ["Climate"]
        }));
        assert_eq!(item.search_volume, Some(50_000));
        assert_eq!(item.increase_percentage, Some(300.0));
        assert_eq!(item.category, "Climate");
    }

    #[test]
    fn missing_fields_become_null_or_unknown() {
        let item = simplify_item(&json!({"query": "x", "search_volume": "n/a", "categories": []}));
        assert_eq!(item.search_volume, None);
        assert_eq!(item.increase_percentage, None);
        assert_eq!(item.category, UNKNOWN_CATEGORY);

        let item = simplify_item(&json!({}));
        assert_eq!(item.query, "");
        assert_eq!(item.category, UNKNOWN_CATEGORY);
    }

    #[test]
    fn skips_failed_regions_and_keeps_order() {
        let result = result_with(vec![
            RegionOutcome::Success(record("PL", vec![json!({"query": "a"}), json!({"query": "b"})])),
            RegionOutcome::failed(
                &Region::new("United States", "US"),
                ErrorMarker {
                    status: Some(500),
                    message: "boom".into(),
                },
            ),
            RegionOutcome::Success(record("DE", vec![json!({"query": "a"})])),
        ]);

        let simple = simplify(&result);
        let codes: Vec<&str> = simple.regions.iter().map(|r| r.region_code.as_str()).collect();
        assert_eq!(codes, vec!["PL", "DE"]);

        let queries: Vec<&str> = simple.items().map(|i| i.query.as_str()).collect();
        assert_eq!(queries, vec!["a", "b", "a"]);
        assert_eq!(simple.total_items, 3);
        assert_eq!(simple.collection_time, result.metadata.collection_time);
    }

    #[test]
    fn is_deterministic() {
        let result = result_with(vec![RegionOutcome::Success(record(
            "PL",
            (0..10)
                .map(|i| json!({"query": format!("q{i}"), "search_volume": format!("{i}K+")}))
                .collect(),
        ))]);
        assert_eq!(simplify(&result), simplify(&result));
    }

    #[test]
    fn region_without_trending_data_has_no_items() {
        let bare = RawTrendRecord::new(&Region::new("Polska", "PL"));
        let mut trending_failed = RawTrendRecord::new(&Region::new("United States", "US"));
        trending_failed.trending_error = Some(ErrorMarker {
            status: Some(500),
            message: "boom".into(),
        });

        let simple = simplify(&result_with(vec![
            RegionOutcome::Success(bare),
            RegionOutcome::Success(trending_failed),
        ]));
        assert_eq!(simple.regions.len(), 2);
        assert_eq!(simple.total_items, 0);
    }
}
