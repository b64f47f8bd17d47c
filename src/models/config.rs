//! Application configuration structures.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Upper bound on trending items the API reports per region.
pub const MAX_TRENDING_COUNT: u8 = 25;

/// Root application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// SerpAPI key
    #[serde(default, alias = "serpapi_key")]
    pub api_key: String,

    /// Keywords for interest-over-time queries
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Regions to collect, in output order
    #[serde(default)]
    pub regions: Vec<Region>,

    /// Path of the raw output file
    #[serde(default = "defaults::output_file")]
    pub output_file: String,

    /// Date range for interest-over-time queries
    #[serde(default = "defaults::timeframe")]
    pub timeframe: String,

    /// Trending searches settings
    #[serde(default, alias = "trending_searches")]
    pub trending_config: TrendingConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::config(format!("invalid TOML: {e}")))?;
        config.normalized().validated()
    }

    /// Parse and validate a JSON document.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| AppError::config(format!("invalid JSON: {e}")))?;
        config.normalized().validated()
    }

    fn normalized(mut self) -> Self {
        self.api_key = self.api_key.trim().to_string();
        for region in &mut self.regions {
            region.name = region.name.trim().to_string();
            region.code = region.code.trim().to_ascii_uppercase();
        }
        self
    }

    fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::config("api_key is missing or empty"));
        }
        if self.regions.is_empty() {
            return Err(AppError::config("No regions defined"));
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            if region.name.trim().is_empty() {
                return Err(AppError::config(format!(
                    "region {:?} has an empty name",
                    region.code
                )));
            }
            if !region.has_valid_code() {
                return Err(AppError::config(format!(
                    "region {:?} has invalid code {:?} (expected ISO 3166 alpha-2)",
                    region.name, region.code
                )));
            }
            if !seen.insert(region.code.to_ascii_uppercase()) {
                return Err(AppError::config(format!(
                    "region code {} is listed more than once",
                    region.code
                )));
            }
        }

        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(AppError::config("keywords must not contain blank entries"));
        }

        let count = self.trending_config.count;
        if count == 0 || count > u32::from(MAX_TRENDING_COUNT) {
            return Err(AppError::config(format!(
                "trending_config.count must be in 1..={MAX_TRENDING_COUNT}, got {count}"
            )));
        }
        if self.output_file.trim().is_empty() {
            return Err(AppError::config("output_file is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::config("http.timeout_secs must be > 0"));
        }
        if url::Url::parse(&self.http.base_url).is_err() {
            return Err(AppError::config(format!(
                "http.base_url {:?} is not a valid URL",
                self.http.base_url
            )));
        }
        Ok(())
    }
}

/// Clamp a requested item count into the range the API supports.
pub fn clamp_count(count: u32) -> u8 {
    count.clamp(1, u32::from(MAX_TRENDING_COUNT)) as u8
}

/// A region to collect trends for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Display name (e.g., "Polska")
    pub name: String,

    /// ISO 3166 alpha-2 code (e.g., "PL")
    pub code: String,
}

impl Region {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }

    fn has_valid_code(&self) -> bool {
        self.code.len() == 2 && self.code.chars().all(|c| c.is_ascii_alphabetic())
    }
}

/// Trending searches settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingConfig {
    /// Whether trending searches are collected at all
    #[serde(default = "defaults::trending_enabled")]
    pub enabled: bool,

    /// Maximum number of items kept per region
    #[serde(default = "defaults::trending_count")]
    pub count: u32,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::trending_enabled(),
            count: defaults::trending_count(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// SerpAPI search endpoint
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Pause between consecutive API requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,

    /// Log file appended to alongside stderr; empty disables it
    #[serde(default = "defaults::log_file")]
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            file: defaults::log_file(),
        }
    }
}

mod defaults {
    pub fn output_file() -> String {
        "trends_data.json".into()
    }
    pub fn timeframe() -> String {
        "today 3-m".into()
    }

    // Trending defaults
    pub fn trending_enabled() -> bool {
        true
    }
    pub fn trending_count() -> u32 {
        20
    }

    // HTTP defaults
    pub fn base_url() -> String {
        "https://serpapi.com/search.json".into()
    }
    pub fn timeout() -> u64 {
        20
    }
    pub fn user_agent() -> String {
        concat!("trends-collector/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn request_delay() -> u64 {
        2000
    }

    pub fn log_level() -> String {
        "info".into()
    }
    pub fn log_file() -> String {
        "trends_collector.log".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        api_key = "secret"

        [[regions]]
        name = "Polska"
        code = "PL"
    "#;

    #[test]
    fn minimal_config_takes_defaults() {
        let config = Config::from_toml(MINIMAL).unwrap();
        assert_eq!(config.api_key, "secret");
        assert!(config.keywords.is_empty());
        assert!(config.trending_config.enabled);
        assert_eq!(config.trending_config.count, 20);
        assert_eq!(config.output_file, "trends_data.json");
        assert_eq!(config.timeframe, "today 3-m");
        assert_eq!(config.http.base_url, "https://serpapi.com/search.json");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "trends_collector.log");
    }

    #[test]
    fn empty_log_file_is_kept() {
        let config = Config::from_toml(&format!("{MINIMAL}\n[logging]\nfile = \"\"\n")).unwrap();
        assert!(config.logging.file.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn accepts_legacy_key_names_and_ignores_unknown_fields() {
        let config = Config::from_toml(
            r#"
            serpapi_key = "legacy"
            unused_setting = 42

            [trending_searches]
            enabled = false
            count = 10

            [[regions]]
            name = "Deutschland"
            code = "de"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_key, "legacy");
        assert!(!config.trending_config.enabled);
        assert_eq!(config.trending_config.count, 10);
        assert_eq!(config.regions[0].code, "DE");
    }

    #[test]
    fn rejects_missing_api_key() {
        let err = Config::from_toml(
            r#"
            [[regions]]
            name = "Polska"
            code = "PL"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn rejects_blank_api_key() {
        let err = Config::from_json(r#"{"api_key": "   ", "regions": [{"name": "US", "code": "US"}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn rejects_out_of_range_count() {
        let mut config = Config::from_toml(MINIMAL).unwrap();
        config.trending_config.count = 26;
        assert!(config.validate().is_err());
        config.trending_config.count = 0;
        assert!(config.validate().is_err());
        config.trending_config.count = 25;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_duplicate_and_malformed_region_codes() {
        let mut config = Config::from_toml(MINIMAL).unwrap();
        config.regions.push(Region::new("Poland again", "PL"));
        assert!(config.validate().is_err());

        config.regions.pop();
        config.regions.push(Region::new("Nowhere", "XYZ"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_regions() {
        let err = Config::from_json(r#"{"api_key": "k"}"#).unwrap_err();
        assert!(err.to_string().contains("regions"));
    }

    #[test]
    fn clamp_count_bounds() {
        assert_eq!(clamp_count(0), 1);
        assert_eq!(clamp_count(5), 5);
        assert_eq!(clamp_count(100), 25);
    }
}
