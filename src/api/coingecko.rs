use chrono::{DateTime, TimeZone, Utc};
use log::{info, warn};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::api::{ReqwestTransport, Transport};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::metrics;
use crate::models::{MarketChart, PricePoint, PriceQuote, FALLBACK_QUOTE};

pub const API_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const ASSET_ID: &str = "texitcoin";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_HISTORY_DAYS: u32 = 365;

const SIMPLE_PRICE: &str = "simple_price";
const MARKET_CHART: &str = "market_chart";
const COIN_INFO: &str = "coin_info";

/// One entry of the `/simple/price` response.
#[derive(Debug, Deserialize, Clone, Default)]
struct SimplePriceEntry {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
    usd_24h_vol: Option<f64>,
    usd_market_cap: Option<f64>,
}

impl SimplePriceEntry {
    /// Missing figures are taken from the fallback snapshot; a missing 24h
    /// change means no change is known.
    fn into_quote(self, fetched_at: DateTime<Utc>) -> PriceQuote {
        PriceQuote {
            price: self.usd.unwrap_or(FALLBACK_QUOTE.price),
            change_24h: self.usd_24h_change.unwrap_or(0.0),
            volume_24h: self.usd_24h_vol.unwrap_or(FALLBACK_QUOTE.volume_24h),
            market_cap: self.usd_market_cap.unwrap_or(FALLBACK_QUOTE.market_cap),
            last_updated: fetched_at,
            is_live: true,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct MarketChartResponse {
    #[serde(default)]
    prices: Option<Vec<(f64, f64)>>,
    #[serde(default)]
    market_caps: Option<Vec<(f64, f64)>>,
    #[serde(default)]
    total_volumes: Option<Vec<(f64, f64)>>,
}

impl MarketChartResponse {
    fn into_chart(self) -> Result<MarketChart> {
        Ok(MarketChart {
            prices: to_points(self.prices, "prices")?,
            market_caps: to_points(self.market_caps, "market_caps")?,
            volumes: to_points(self.total_volumes, "total_volumes")?,
        })
    }
}

fn to_points(raw: Option<Vec<(f64, f64)>>, field: &str) -> Result<Vec<PricePoint>> {
    raw.unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, (ts, value))| {
            let timestamp = Utc
                .timestamp_millis_opt(ts as i64)
                .single()
                .ok_or_else(|| {
                    Error::MalformedResponse(format!("Invalid timestamp in {}[{}]: {}", field, i, ts))
                })?;
            Ok(PricePoint { timestamp, value })
        })
        .collect()
}

/// Read-only CoinGecko client for a single asset.
pub struct CoinGeckoClient<T = ReqwestTransport> {
    transport: T,
    base_url: String,
    asset_id: String,
}

impl<T> fmt::Debug for CoinGeckoClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoinGeckoClient")
            .field("base_url", &self.base_url)
            .field("asset_id", &self.asset_id)
            .finish()
    }
}

impl CoinGeckoClient<ReqwestTransport> {
    /// Client for the public API with the default timeout.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let transport = ReqwestTransport::new(DEFAULT_TIMEOUT, api_key.as_deref())?;
        Ok(Self::with_transport(transport, API_BASE_URL, ASSET_ID))
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout(), config.api_key.as_deref())?;
        Ok(Self::with_transport(
            transport,
            config.base_url.clone(),
            config.asset_id.clone(),
        ))
    }
}

impl<T: Transport> CoinGeckoClient<T> {
    pub fn with_transport(
        transport: T,
        base_url: impl Into<String>,
        asset_id: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            asset_id: asset_id.into(),
        }
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        let url = Url::parse_with_params(&format!("{}/{}", self.base_url, path), params)
            .map_err(|e| Error::Config(format!("Invalid API URL {}: {}", self.base_url, e)))?;
        Ok(url.to_string())
    }

    pub fn price_url(&self) -> Result<String> {
        self.endpoint(
            "simple/price",
            &[
                ("ids", self.asset_id.as_str()),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
                ("include_market_cap", "true"),
                ("include_24hr_vol", "true"),
            ],
        )
    }

    pub fn history_url(&self, days: u32) -> Result<String> {
        let days = days.to_string();
        self.endpoint(
            &format!("coins/{}/market_chart", self.asset_id),
            &[("vs_currency", "usd"), ("days", days.as_str())],
        )
    }

    pub fn coin_info_url(&self) -> Result<String> {
        self.endpoint(
            &format!("coins/{}", self.asset_id),
            &[
                ("localization", "false"),
                ("tickers", "false"),
                ("community_data", "false"),
                ("developer_data", "false"),
            ],
        )
    }

    async fn get_json<R: DeserializeOwned>(&self, url: &str, endpoint: &str) -> Result<R> {
        metrics::FETCH_ATTEMPTS.with_label_values(&[endpoint]).inc();
        let timer = metrics::FETCH_LATENCY
            .with_label_values(&[endpoint])
            .start_timer();
        let response = self.transport.get(url).await;
        timer.observe_duration();

        let response = response?;
        if !response.is_success() {
            return Err(Error::HttpStatus(response.status));
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Live quote, or an error describing why none is available.
    pub async fn try_fetch_price(&self) -> Result<PriceQuote> {
        let url = self.price_url()?;
        let mut data: HashMap<String, SimplePriceEntry> = self.get_json(&url, SIMPLE_PRICE).await?;
        let entry = data.remove(&self.asset_id).ok_or_else(|| {
            Error::MalformedResponse(format!("No {} data in response", self.asset_id))
        })?;
        Ok(entry.into_quote(Utc::now()))
    }

    /// Live quote, or [`FALLBACK_QUOTE`] when the request or response is
    /// unusable. Never fails.
    pub async fn fetch_price(&self) -> PriceQuote {
        match self.try_fetch_price().await {
            Ok(quote) => {
                info!("Fetched live {} price: {}", self.asset_id, quote.price);
                metrics::LAST_PRICE.set(quote.price);
                quote
            }
            Err(e) => {
                warn!("CoinGecko price unavailable ({}), using fallback data", e);
                metrics::FETCH_FALLBACKS
                    .with_label_values(&[SIMPLE_PRICE, e.kind()])
                    .inc();
                FALLBACK_QUOTE.clone()
            }
        }
    }

    pub async fn try_fetch_history(&self, days: u32) -> Result<MarketChart> {
        let url = self.history_url(days)?;
        let response: MarketChartResponse = self.get_json(&url, MARKET_CHART).await?;
        response.into_chart()
    }

    /// Market chart for the last `days` days; `None` when it could not be
    /// fetched.
    pub async fn fetch_history(&self, days: u32) -> Option<MarketChart> {
        match self.try_fetch_history(days).await {
            Ok(chart) => Some(chart),
            Err(e) => {
                warn!("Failed to fetch {}-day history for {}: {}", days, self.asset_id, e);
                metrics::FETCH_FALLBACKS
                    .with_label_values(&[MARKET_CHART, e.kind()])
                    .inc();
                None
            }
        }
    }

    /// Raw coin metadata; `None` when it could not be fetched.
    pub async fn fetch_coin_info(&self) -> Option<serde_json::Value> {
        let result = match self.coin_info_url() {
            Ok(url) => self.get_json::<serde_json::Value>(&url, COIN_INFO).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(info) => Some(info),
            Err(e) => {
                warn!("Failed to fetch coin info for {}: {}", self.asset_id, e);
                metrics::FETCH_FALLBACKS
                    .with_label_values(&[COIN_INFO, e.kind()])
                    .inc();
                None
            }
        }
    }
}
