pub mod formatters;

pub use formatters::{
    format_compact, format_currency, format_date, format_number, format_percent,
    format_relative_days, format_relative_time, format_roi, pad_zero, parse_date, DateStyle,
    FormatProfile, RiskLevel, Section, Sentiment,
};
