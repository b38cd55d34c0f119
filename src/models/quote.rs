use chrono::{DateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// A single USD quote for the tracked asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: f64,
    /// Signed 24h change, in percent.
    pub change_24h: f64,
    pub volume_24h: f64,
    pub market_cap: f64,
    pub last_updated: DateTime<Utc>,
    /// `true` when the quote came from the network, `false` for the fallback.
    pub is_live: bool,
}

impl PriceQuote {
    pub fn source(&self) -> &'static str {
        if self.is_live {
            "coingecko"
        } else {
            "fallback"
        }
    }
}

lazy_static! {
    /// Snapshot taken on Feb 4, 2026. Served whenever the live quote is unavailable.
    pub static ref FALLBACK_QUOTE: PriceQuote = PriceQuote {
        price: 0.81,
        change_24h: -10.57,
        volume_24h: 260_000.0,
        market_cap: 46_200_000.0,
        last_updated: Utc.with_ymd_and_hms(2026, 2, 4, 0, 0, 0).unwrap(),
        is_live: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Price, market cap and volume series as returned by one market-chart call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketChart {
    pub prices: Vec<PricePoint>,
    pub market_caps: Vec<PricePoint>,
    pub volumes: Vec<PricePoint>,
}

impl MarketChart {
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty() && self.market_caps.is_empty() && self.volumes.is_empty()
    }

    pub fn first_price(&self) -> Option<&PricePoint> {
        self.prices.first()
    }

    pub fn last_price(&self) -> Option<&PricePoint> {
        self.prices.last()
    }

    /// Lowest and highest price in the series.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        self.prices.iter().map(|p| p.value).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}
