// src/config.rs

//! Configuration loading utilities.
//!
//! The collector looks for `config.toml` in the working directory first and
//! falls back to `config.json`. Both are parsed into the same validated
//! [`Config`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::Config;

/// Commented configuration file name (preferred).
pub const TOML_CONFIG_FILE: &str = "config.toml";

/// Plain configuration file name (fallback).
pub const JSON_CONFIG_FILE: &str = "config.json";

/// Locate the configuration file inside `dir`.
pub fn config_path(dir: &Path) -> Result<PathBuf> {
    let toml_path = dir.join(TOML_CONFIG_FILE);
    if toml_path.is_file() {
        return Ok(toml_path);
    }

    let json_path = dir.join(JSON_CONFIG_FILE);
    if json_path.is_file() {
        return Ok(json_path);
    }

    Err(AppError::config(format!(
        "no {TOML_CONFIG_FILE} or {JSON_CONFIG_FILE} found in {}",
        dir.display()
    )))
}

/// Load and validate configuration from `dir`.
pub fn load_config(dir: &Path) -> Result<Config> {
    let path = config_path(dir)?;
    load_config_file(&path)
}

/// Load and validate a specific configuration file, picking the parser
/// from the extension.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::config(format!("cannot read {}: {e}", path.display())))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config = if is_json {
        Config::from_json(&content)
    } else {
        Config::from_toml(&content)
    };

    config.map_err(|e| match e {
        AppError::Config(message) => {
            AppError::config(format!("{}: {message}", path.display()))
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TOML_CONFIG: &str = r#"
        # primary config
        api_key = "from-toml"

        [[regions]]
        name = "Polska"
        code = "PL"
    "#;

    const JSON_CONFIG: &str =
        r#"{"api_key": "from-json", "regions": [{"name": "United States", "code": "US"}]}"#;

    #[test]
    fn prefers_toml_over_json() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(TOML_CONFIG_FILE), TOML_CONFIG).unwrap();
        fs::write(tmp.path().join(JSON_CONFIG_FILE), JSON_CONFIG).unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.api_key, "from-toml");
    }

    #[test]
    fn falls_back_to_json() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(JSON_CONFIG_FILE), JSON_CONFIG).unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.api_key, "from-json");
        assert_eq!(config.regions[0].code, "US");
    }

    #[test]
    fn missing_files_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(tmp.path()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(TOML_CONFIG_FILE), "api_key = ").unwrap();

        let err = load_config(tmp.path()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains(TOML_CONFIG_FILE));
    }
}
