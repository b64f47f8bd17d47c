//! Service layer for the collector.
//!
//! - Trends API access (`TrendsApi`, `SerpApiClient`)

mod client;

pub use client::{SerpApiClient, TrendsApi};
