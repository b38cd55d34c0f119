use lazy_static::lazy_static;
use prometheus::{
    Encoder, Gauge, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref FETCH_ATTEMPTS: IntCounterVec = IntCounterVec::new(
        Opts::new("txc_fetch_attempts_total", "Total number of CoinGecko requests"),
        &["endpoint"]
    ).unwrap();

    pub static ref FETCH_FALLBACKS: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "txc_fetch_fallbacks_total",
            "Requests answered with fallback data or no data"
        ),
        &["endpoint", "reason"]
    ).unwrap();

    pub static ref FETCH_LATENCY: HistogramVec = HistogramVec::new(
        HistogramOpts::new("txc_fetch_latency_seconds", "CoinGecko request latency in seconds")
            .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["endpoint"]
    ).unwrap();

    pub static ref LAST_PRICE: Gauge = Gauge::new(
        "txc_last_price_usd",
        "Most recent live TXC price in USD"
    ).unwrap();
}

/// Registers every collector with [`REGISTRY`]. Safe to call more than once.
pub fn init() -> Result<(), prometheus::Error> {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(FETCH_ATTEMPTS.clone()),
        Box::new(FETCH_FALLBACKS.clone()),
        Box::new(FETCH_LATENCY.clone()),
        Box::new(LAST_PRICE.clone()),
    ];
    for collector in collectors {
        match REGISTRY.register(collector) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Text exposition of everything registered.
pub fn render() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent_and_renders() {
        init().unwrap();
        init().unwrap();

        FETCH_ATTEMPTS.with_label_values(&["simple_price"]).inc();
        FETCH_FALLBACKS
            .with_label_values(&["simple_price", "timeout"])
            .inc();

        let text = render().unwrap();
        assert!(text.contains("txc_fetch_attempts_total"));
        assert!(text.contains("reason=\"timeout\""));
    }
}
