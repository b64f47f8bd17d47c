// src/utils/parse.rs

//! Lenient parsing of the numeric fields the trends API reports.
//!
//! The API reports volumes and percentages either as JSON numbers or as
//! display strings such as `"200K+"` or `"+1,000%"`. Anything unparsable
//! becomes `None`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9][0-9,]*(?:\.[0-9]+)?)\s*([KkMmBb]?)\s*\+?\s*$").unwrap()
});

static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?)\s*([0-9][0-9,]*(?:\.[0-9]+)?)\s*%?\s*$").unwrap()
});

/// Parse a non-negative count such as a search volume.
pub fn parse_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => parse_count_str(s),
        _ => None,
    }
}

fn parse_count_str(s: &str) -> Option<u64> {
    let caps = COUNT_RE.captures(s)?;
    let number: f64 = caps[1].replace(',', "").parse().ok()?;
    let multiplier = match caps.get(2).map(|m| m.as_str()) {
        Some("K" | "k") => 1_000.0,
        Some("M" | "m") => 1_000_000.0,
        Some("B" | "b") => 1_000_000_000.0,
        _ => 1.0,
    };
    Some((number * multiplier).round() as u64)
}

/// Parse a signed percentage such as an increase.
pub fn parse_percentage(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_percentage_str(s),
        _ => None,
    }
}

fn parse_percentage_str(s: &str) -> Option<f64> {
    let caps = PERCENT_RE.captures(s)?;
    let number: f64 = caps[2].replace(',', "").parse().ok()?;
    Some(if &caps[1] == "-" { -number } else { number })
}
