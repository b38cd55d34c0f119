use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::api::coingecko::{API_BASE_URL, ASSET_ID, DEFAULT_TIMEOUT};
use crate::derived::STRIKE_TARGET_PRICE;
use crate::utils::Section;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub asset_id: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            asset_id: ASSET_ID.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub section: Section,
    pub strike_target_price: f64,
    /// RFC 3339 or `YYYY-MM-DD`; the countdown target when none is given.
    pub strike_date: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            section: Section::Report,
            strike_target_price: STRIKE_TARGET_PRICE,
            strike_date: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        fs::write(path, config_str)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.timeout_secs == 0 {
            anyhow::bail!("api.timeout_secs must be greater than zero");
        }
        if self.api.asset_id.trim().is_empty() {
            anyhow::bail!("api.asset_id must not be empty");
        }
        if !(self.report.strike_target_price.is_finite() && self.report.strike_target_price > 0.0) {
            anyhow::bail!("report.strike_target_price must be a positive number");
        }
        Ok(())
    }

    /// Applies `TXC_API_KEY` and `TXC_API_BASE_URL` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("TXC_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.api.api_key = Some(key);
        }
        if let Some(url) = lookup("TXC_API_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.api.asset_id, "texitcoin");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.report.strike_target_price, 16.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            timeout_secs = 3

            [report]
            section = "strike"
            strike_date = "2026-06-30"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.timeout_secs, 3);
        assert_eq!(config.api.asset_id, "texitcoin");
        assert_eq!(config.report.section, Section::Strike);
        assert_eq!(config.report.strike_date.as_deref(), Some("2026-06-30"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("txc-report-config-{}.toml", std::process::id()));
        let mut config = Config::default();
        config.report.strike_date = Some("2026-12-01".to_string());
        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [("TXC_API_KEY", "secret"), ("TXC_API_BASE_URL", "")]
            .into_iter()
            .collect();
        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.api.api_key.as_deref(), Some("secret"));
        assert_eq!(config.api.base_url, API_BASE_URL);
    }
}
