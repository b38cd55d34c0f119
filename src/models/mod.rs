pub mod quote;

pub use quote::{MarketChart, PricePoint, PriceQuote, FALLBACK_QUOTE};
