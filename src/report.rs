//! Plain-text rendering of quotes and metrics for the command line.

use chrono::{DateTime, Utc};

use crate::derived::{
    calculate_deviation, countdown_to, days_until, Countdown, OtcProjection,
};
use crate::models::{MarketChart, PriceQuote};
use crate::utils::{
    format_currency, format_date, format_number, format_relative_days, format_relative_time,
    format_roi, pad_zero, DateStyle, FormatProfile,
};

pub fn render_quote(quote: &PriceQuote, profile: FormatProfile, now: DateTime<Utc>) -> String {
    let mut lines = vec![
        format!(
            "TXC/USD     {}  ({} 24h)  [{}]",
            format_currency(quote.price, 4),
            profile.percent(quote.change_24h),
            quote.source()
        ),
        format!("Market cap  {}", profile.compact_currency(quote.market_cap)),
        format!("Volume 24h  {}", profile.compact_currency(quote.volume_24h)),
        format!(
            "Updated     {} ({})",
            format_date(quote.last_updated, DateStyle::Medium),
            format_relative_time(quote.last_updated, now)
        ),
    ];
    if !quote.is_live {
        lines.push("Live data unavailable; showing the last known snapshot.".to_string());
    }
    lines.join("\n")
}

pub fn render_history(chart: Option<&MarketChart>, days: u32, profile: FormatProfile) -> String {
    let chart = match chart {
        Some(chart) => chart,
        None => return "No historical data available.".to_string(),
    };
    let (first, last) = match (chart.first_price(), chart.last_price()) {
        (Some(first), Some(last)) => (first, last),
        _ => return format!("No price points in the last {} days.", days),
    };

    let mut lines = vec![
        format!(
            "{} price points, {} to {}",
            format_number(chart.prices.len() as f64, 0),
            format_date(first.timestamp, DateStyle::Medium),
            format_date(last.timestamp, DateStyle::Medium)
        ),
        format!(
            "Open {}  Last {}",
            format_currency(first.value, 4),
            format_currency(last.value, 4)
        ),
    ];
    if first.value != 0.0 {
        lines.push(format!(
            "Change over period  {}",
            profile.percent(calculate_deviation(last.value, first.value))
        ));
    }
    if let Some((low, high)) = chart.price_range() {
        lines.push(format!(
            "Range  {} - {}",
            format_currency(low, 4),
            format_currency(high, 4)
        ));
    }
    if let Some(cap) = chart.market_caps.last() {
        lines.push(format!("Market cap  {}", profile.compact_currency(cap.value)));
    }
    lines.join("\n")
}

pub fn format_countdown(countdown: &Countdown) -> String {
    format!(
        "{}d {}h {}m {}s",
        countdown.days,
        pad_zero(countdown.hours, 2),
        pad_zero(countdown.minutes, 2),
        pad_zero(countdown.seconds, 2)
    )
}

pub fn render_countdown(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let countdown = countdown_to(target, now);
    let headline = if countdown.is_finished() {
        "Strike date reached".to_string()
    } else {
        format!("{} remaining", format_countdown(&countdown))
    };
    format!(
        "{}\nTarget  {} ({}, {} days)",
        headline,
        format_date(target, DateStyle::Long),
        format_relative_days(target, now),
        days_until(target, now)
    )
}

/// `source` names where the price came from (`coingecko`, `fallback`, ...).
pub fn render_gap(
    price: f64,
    target: f64,
    gap: f64,
    source: &str,
    profile: FormatProfile,
) -> String {
    format!(
        "Price {} [{}] vs target {}: {} reality gap",
        format_currency(price, 4),
        source,
        format_currency(target, 2),
        profile.percent(gap)
    )
}

pub fn render_otc(projection: &OtcProjection) -> String {
    let (roi, sentiment) = format_roi(projection.roi);
    [
        format!("Coins     {}", format_number(projection.coins, 0)),
        format!("Proceeds  {}", format_currency(projection.proceeds, 2)),
        format!("Profit    {}", format_currency(projection.profit, 2)),
        format!("ROI       {} ({})", roi, sentiment.roi_class()),
    ]
    .join("\n")
}
