use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::api::coingecko::DEFAULT_HISTORY_DAYS;
use crate::utils::Section;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print prometheus metrics after the command finishes
    #[arg(long)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Current TXC quote (falls back to the last snapshot when offline)
    Price {
        /// Print the quote as JSON
        #[arg(long)]
        json: bool,
        /// Display conventions to use; defaults to the configured section
        #[arg(long, value_enum)]
        section: Option<Section>,
    },
    /// Market chart summary for the last N days
    History {
        #[arg(long, default_value_t = DEFAULT_HISTORY_DAYS)]
        days: u32,
    },
    /// Time left until the strike date
    Countdown {
        /// RFC 3339 timestamp or YYYY-MM-DD; defaults to report.strike_date
        #[arg(long)]
        target: Option<String>,
    },
    /// Gap between the price and the strike target
    Gap {
        /// Use this price instead of fetching one
        #[arg(long)]
        price: Option<f64>,
    },
    /// Projected profit of an OTC purchase
    Otc {
        #[arg(long)]
        investment: f64,
        #[arg(long)]
        cost_basis: f64,
        /// Defaults to the strike target price
        #[arg(long)]
        exit_price: Option<f64>,
    },
}
