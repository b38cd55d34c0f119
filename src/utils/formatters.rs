//! Display formatting for quotes, dates and metrics.
//!
//! Everything here is pure and fixed to US English conventions. Dates are
//! rendered in UTC.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 86_400_000;

// Largest scale a Decimal can carry.
const MAX_DECIMALS: usize = 28;

const COMPACT_UNITS: [(f64, &str); 5] = [
    (1.0, ""),
    (1e3, "K"),
    (1e6, "M"),
    (1e9, "B"),
    (1e12, "T"),
];

/// Site section whose display conventions are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Report,
    Strike,
}

impl Section {
    pub fn profile(self) -> FormatProfile {
        match self {
            Section::Report => FormatProfile {
                currency_decimals: 2,
                percent_decimals: 2,
                compact_fraction_digits: 2,
            },
            Section::Strike => FormatProfile {
                currency_decimals: 2,
                percent_decimals: 1,
                compact_fraction_digits: 1,
            },
        }
    }
}

/// Default precisions for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatProfile {
    pub currency_decimals: usize,
    pub percent_decimals: usize,
    pub compact_fraction_digits: usize,
}

impl FormatProfile {
    pub fn currency(&self, value: f64) -> String {
        format_currency(value, self.currency_decimals)
    }

    pub fn percent(&self, value: f64) -> String {
        format_percent(value, self.percent_decimals)
    }

    pub fn compact(&self, value: f64) -> String {
        format_compact(value, self.compact_fraction_digits)
    }

    /// Compact magnitude with a dollar sign, e.g. `$46.2M`.
    pub fn compact_currency(&self, value: f64) -> String {
        let compact = self.compact(value.abs());
        if value < 0.0 {
            format!("-${}", compact)
        } else {
            format!("${}", compact)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `Feb 4`
    Short,
    /// `Feb 4, 2026`
    #[default]
    Medium,
    /// `Wednesday, February 4, 2026`
    Long,
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Fixed-point text with halves rounded away from zero (`2.5` -> `3`).
/// Values outside Decimal's range keep the default float formatting.
fn to_fixed(value: f64, decimals: usize) -> String {
    // Negative zero prints unsigned.
    let value = if value == 0.0 { 0.0 } else { value };
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let rounded = exact.round_dp_with_strategy(
                decimals.min(MAX_DECIMALS) as u32,
                RoundingStrategy::MidpointAwayFromZero,
            );
            format!("{:.*}", decimals, rounded)
        }
        None => format!("{:.*}", decimals, value),
    }
}

fn trim_fraction(text: String) -> String {
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Rounds to `decimals` places and groups the integer part, e.g. `1,234.50`.
pub fn format_number(value: f64, decimals: usize) -> String {
    let fixed = to_fixed(value.abs(), decimals);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::new();
    // A value that rounds to zero is shown unsigned.
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// `$1,234.57`; negatives render as `-$5.00`.
pub fn format_currency(value: f64, decimals: usize) -> String {
    let number = format_number(value, decimals);
    match number.strip_prefix('-') {
        Some(abs) => format!("-${}", abs),
        None => format!("${}", number),
    }
}

/// Compact notation with K/M/B/T suffixes and at most `max_fraction_digits`
/// decimals, trailing zeros dropped: `46.2M`, `260K`, `0.81`.
pub fn format_compact(value: f64, max_fraction_digits: usize) -> String {
    let abs = value.abs();
    let mut unit = COMPACT_UNITS
        .iter()
        .rposition(|(scale, _)| abs >= *scale)
        .unwrap_or(0);

    let text = loop {
        let (scale, suffix) = COMPACT_UNITS[unit];
        let scaled = trim_fraction(to_fixed(abs / scale, max_fraction_digits));
        // Rounding can carry into the next unit (999.99K -> 1M).
        let carried = scaled.parse::<f64>().map(|v| v >= 1000.0).unwrap_or(false);
        if carried && unit + 1 < COMPACT_UNITS.len() {
            unit += 1;
            continue;
        }
        break format!("{}{}", scaled, suffix);
    };

    if value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", text)
    } else {
        text
    }
}

/// Signed percentage: `+5.0%`, `-10.57%`. Zero counts as positive.
pub fn format_percent(value: f64, decimals: usize) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{}{}%", sign, to_fixed(value, decimals))
}

pub fn format_date(date: DateTime<Utc>, style: DateStyle) -> String {
    let pattern = match style {
        DateStyle::Short => "%b %-d",
        DateStyle::Medium => "%b %-d, %Y",
        DateStyle::Long => "%A, %B %-d, %Y",
    };
    date.format(pattern).to_string()
}

/// How long ago `date` was, relative to `now`. Anything a week or older is
/// shown as a medium date.
pub fn format_relative_time(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_ms = (now - date).num_milliseconds();
    let minutes = diff_ms.div_euclid(MS_PER_MINUTE);
    let hours = minutes.div_euclid(60);
    let days = hours.div_euclid(24);

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        format_date(date, DateStyle::Medium)
    }
}

/// Day-granular phrasing used on the strike page: `in 12 days`, `tomorrow`,
/// `in 5 hours`, `now`, `yesterday`, `3 days ago`.
pub fn format_relative_days(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_ms = (date - now).num_milliseconds();
    let days = diff_ms.div_euclid(MS_PER_DAY);
    let hours = diff_ms.div_euclid(MS_PER_HOUR);

    match days {
        d if d > 1 => format!("in {} days", d),
        1 => "tomorrow".to_string(),
        0 if hours == 1 => "in 1 hour".to_string(),
        0 if hours > 0 => format!("in {} hours", hours),
        0 if hours == 0 => "now".to_string(),
        -1 => "yesterday".to_string(),
        d if d < -1 => format!("{} days ago", d.abs()),
        _ => format_date(date, DateStyle::Short),
    }
}

/// Parses RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::InvalidInput(format!("Unrecognised date: {:?}", input)))
}

pub fn pad_zero(value: i64, width: usize) -> String {
    format!("{:0width$}", value, width = width)
}

/// Whether a figure reads as good or bad news.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Favorable,
    Unfavorable,
}

impl Sentiment {
    /// Non-negative values are favorable unless `inverse` is set.
    pub fn of(value: f64, inverse: bool) -> Self {
        if (value >= 0.0) != inverse {
            Sentiment::Favorable
        } else {
            Sentiment::Unfavorable
        }
    }

    pub fn value_class(self) -> &'static str {
        match self {
            Sentiment::Favorable => "text-safe",
            Sentiment::Unfavorable => "text-warning",
        }
    }

    pub fn roi_class(self) -> &'static str {
        match self {
            Sentiment::Favorable => "text-success",
            Sentiment::Unfavorable => "text-danger",
        }
    }
}

/// ROI as a one-decimal signed percentage with its sentiment.
pub fn format_roi(roi: f64) -> (String, Sentiment) {
    (format_percent(roi, 1), Sentiment::of(roi, false))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Unknown labels are treated as medium risk.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "low" => RiskLevel::Low,
            "medium-high" | "high" => RiskLevel::High,
            _ => RiskLevel::Medium,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            RiskLevel::Low => "risk-low",
            RiskLevel::Medium => "risk-medium",
            RiskLevel::High => "risk-high",
        }
    }
}
