//! Runtime configuration read from the environment.

use std::env;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::DEFAULT_CURRENCY_PREFIX;

/// Snapshot file used when `CATALOG_PATH` is not set.
pub const DEFAULT_CATALOG_PATH: &str = "catalog.json";

/// Errors raised while reading configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a date in YYYY-MM-DD format, got `{value}`")]
    InvalidDate { key: &'static str, value: String },
}

/// Settings for the command line front end.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    pub currency_prefix: String,
    /// Fixed "today" used for lifecycle and pricing; defaults to the local date.
    pub pricing_date: Option<NaiveDate>,
}

impl AppConfig {
    /// Read the configuration from process environment variables.
    ///
    /// Call `dotenvy::dotenv()` beforehand to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let catalog_path = value("CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));
        let currency_prefix =
            value("CURRENCY_PREFIX").unwrap_or_else(|| DEFAULT_CURRENCY_PREFIX.to_string());

        let pricing_date = match value("PRICING_DATE") {
            Some(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                ConfigError::InvalidDate {
                    key: "PRICING_DATE",
                    value: raw.clone(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            catalog_path,
            currency_prefix,
            pricing_date,
        })
    }

    /// The calendar day promotions are evaluated against.
    pub fn today(&self) -> NaiveDate {
        self.pricing_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("config");

        assert_eq!(config.catalog_path, PathBuf::from(DEFAULT_CATALOG_PATH));
        assert_eq!(config.currency_prefix, DEFAULT_CURRENCY_PREFIX);
        assert!(config.pricing_date.is_none());
    }

    #[test]
    fn reads_explicit_values() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CATALOG_PATH", "/srv/catalog.json"),
            ("CURRENCY_PREFIX", "$"),
            ("PRICING_DATE", "2025-06-15"),
        ]))
        .expect("config");

        assert_eq!(config.catalog_path, PathBuf::from("/srv/catalog.json"));
        assert_eq!(config.currency_prefix, "$");
        assert_eq!(
            config.today(),
            NaiveDate::from_ymd_opt(2025, 6, 15).expect("date")
        );
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config =
            AppConfig::from_lookup(lookup(&[("CURRENCY_PREFIX", "  "), ("PRICING_DATE", "")]))
                .expect("config");

        assert_eq!(config.currency_prefix, DEFAULT_CURRENCY_PREFIX);
        assert!(config.pricing_date.is_none());
    }

    #[test]
    fn invalid_pricing_date_is_rejected() {
        let result = AppConfig::from_lookup(lookup(&[("PRICING_DATE", "15/06/2025")]));

        assert_eq!(
            result,
            Err(ConfigError::InvalidDate {
                key: "PRICING_DATE",
                value: "15/06/2025".to_string(),
            })
        );
    }
}
