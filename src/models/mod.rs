// src/models/mod.rs

//! Domain models for the collector.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod simple;
mod trend;

// Re-export all public types
pub use config::{
    Config, HttpConfig, LoggingConfig, MAX_TRENDING_COUNT, Region, TrendingConfig, clamp_count,
};
pub use simple::{SimplifiedOutput, SimplifiedRegion, SimplifiedTrendItem, UNKNOWN_CATEGORY};
pub use trend::{
    CollectionMetadata, CollectionResult, ErrorMarker, InterestPoint, KeywordFailure,
    KeywordInterest, RawTrendRecord, RegionFailure, RegionOutcome, SOURCE,
};
